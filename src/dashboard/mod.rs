//! Dashboard module
//!
//! Provides the reporting pages: an overview of the whole data set, daily,
//! monthly and customer breakdowns, and a sales analysis page filtered by a
//! range of dates.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod sales;
mod tables;

pub use handlers::{get_customers_page, get_daily_page, get_dashboard_page, get_monthly_page};
pub use sales::get_sales_page;
