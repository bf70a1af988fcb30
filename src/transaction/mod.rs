//! Transaction data for the sales dashboard.
//!
//! This module contains everything needed before aggregation:
//! - The raw and prepared transaction models
//! - Parsing of timestamps and amounts
//! - Loading and caching the CSV transaction log
//! - Date-range and exact-date selection

mod models;
mod range;
mod source;

pub use models::{
    RawTransaction, ThreeHourBucket, Transaction, YearMonth, normalize_amount, parse_timestamp,
    prepare,
};
pub use range::{
    DateRange, Selection, date_bounds, filter_by_date, filter_by_range, format_date_param,
    parse_date_param,
};
pub use source::{TransactionSource, load_transactions, read_transactions};

#[cfg(test)]
pub(crate) use models::raw;
#[cfg(test)]
pub(crate) use source::test_utils;
