//! Date-range and exact-date selection of transactions.

use std::fmt::Display;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::transaction::models::Transaction;

/// The format used by `<input type="date">` and in query strings.
pub const DATE_INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// An inclusive range of calendar dates where `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Create a range, swapping the bounds if they are given in the wrong order.
    pub fn new(start: Date, end: Date) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Build the range selected by the user.
    ///
    /// Missing bounds default to the edges of `bounds`, and both dates are
    /// clamped into `bounds`. If `end` falls before `start`, `end` is moved up
    /// to `start`.
    pub fn clamped(start: Option<Date>, end: Option<Date>, bounds: DateRange) -> Self {
        let start = bounds.clamp(start.unwrap_or(bounds.start));
        let end = bounds.clamp(end.unwrap_or(bounds.end)).max(start);

        Self { start, end }
    }

    /// The first date in the range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last date in the range.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` lies within the range, inclusive of both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Move `date` to the nearest date within the range.
    pub fn clamp(&self, date: Date) -> Date {
        date.clamp(self.start, self.end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// The subset of transactions a page displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every transaction dated within the range.
    Range(DateRange),
    /// Every transaction dated on a single day.
    Exact(Date),
}

impl Selection {
    /// Whether a transaction dated `date` belongs to the selection.
    pub fn includes(&self, date: Date) -> bool {
        match self {
            Selection::Range(range) => range.contains(date),
            Selection::Exact(exact) => *exact == date,
        }
    }

    /// Get the transactions in the selection, keeping their order.
    ///
    /// Transactions without a valid date are never selected.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| transaction.date().is_some_and(|date| self.includes(date)))
            .collect()
    }
}

/// Get the earliest and latest transaction dates.
///
/// Returns `None` if no transaction has a valid date.
pub fn date_bounds(transactions: &[Transaction]) -> Option<DateRange> {
    let mut dates = transactions.iter().filter_map(Transaction::date);
    let first = dates.next()?;

    let (start, end) = dates.fold((first, first), |(start, end), date| {
        (start.min(date), end.max(date))
    });

    Some(DateRange { start, end })
}

/// Get the transactions dated within `range`.
pub fn filter_by_range(transactions: &[Transaction], range: DateRange) -> Vec<&Transaction> {
    Selection::Range(range).apply(transactions)
}

/// Get the transactions dated on `date`.
pub fn filter_by_date(transactions: &[Transaction], date: Date) -> Vec<&Transaction> {
    Selection::Exact(date).apply(transactions)
}

/// Parse a date query parameter such as "2024-05-01".
///
/// Empty strings are treated as missing. Unparsable values are logged and
/// treated as missing so the page falls back to its default.
pub fn parse_date_param(name: &str, value: Option<&str>) -> Option<Date> {
    let value = value.map(str::trim).filter(|value| !value.is_empty())?;

    Date::parse(value, DATE_INPUT_FORMAT)
        .inspect_err(|error| {
            tracing::warn!("ignoring invalid date \"{value}\" for query parameter {name}: {error}")
        })
        .ok()
}

/// Format a date for `<input type="date">` values and query strings.
pub fn format_date_param(date: Date) -> String {
    date.format(DATE_INPUT_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
