//! Defines the transaction models and the functions that prepare raw CSV rows
//! for aggregation.

use std::fmt::Display;

use serde::Deserialize;
use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

// ============================================================================
// MODELS
// ============================================================================

/// A row exactly as it appears in the transaction log.
///
/// Every field is kept as text so that formatted amounts such as "1,234.50"
/// reach [normalize_amount] untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTransaction {
    /// The opaque transaction identifier.
    #[serde(rename = "Unique Code")]
    pub id: String,
    /// The user that made the purchase.
    #[serde(rename = "Username")]
    pub username: String,
    /// The date in the format `DD/MM/YYYY`.
    #[serde(rename = "Date")]
    pub date: String,
    /// The time in the format `hh:mm:ss AM|PM`.
    #[serde(rename = "Time")]
    pub time: String,
    /// The amount, optionally with comma thousands separators.
    #[serde(rename = "Amount")]
    pub amount: String,
}

/// A transaction after its timestamp and amount have been parsed.
///
/// Fields that could not be parsed are `None`. These rows stay in the data
/// set but are skipped by any computation that needs the missing field.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The opaque transaction identifier.
    pub id: String,
    /// The user that made the purchase.
    pub username: String,
    /// When the purchase happened, if the date and time could be parsed.
    pub timestamp: Option<PrimitiveDateTime>,
    /// The purchase amount, if it could be parsed.
    pub amount: Option<f64>,
}

impl Transaction {
    /// The calendar date of the transaction.
    pub fn date(&self) -> Option<Date> {
        self.timestamp.map(|timestamp| timestamp.date())
    }

    /// The time of day of the transaction.
    pub fn time(&self) -> Option<Time> {
        self.timestamp.map(|timestamp| timestamp.time())
    }

    /// The hour of the day, 0-23.
    pub fn hour(&self) -> Option<u8> {
        self.timestamp.map(|timestamp| timestamp.hour())
    }

    /// The year and month of the transaction.
    pub fn month(&self) -> Option<YearMonth> {
        self.date().map(YearMonth::from)
    }

    /// The three hour interval the transaction falls in.
    pub fn three_hour_bucket(&self) -> Option<ThreeHourBucket> {
        self.hour().map(ThreeHourBucket::from_hour)
    }
}

/// A calendar month used as a grouping key, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Create a key for `month` (1-12) of `year`.
    pub fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A three hour interval of the day identified by its starting hour.
///
/// The starting hour is always one of 0, 3, 6, ..., 21.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreeHourBucket(u8);

impl ThreeHourBucket {
    /// The number of intervals in a day.
    pub const COUNT: u8 = 8;

    /// Get the interval that contains `hour`.
    pub fn from_hour(hour: u8) -> Self {
        Self(hour - hour % 3)
    }

    /// All intervals of the day in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(|index| Self(index * 3))
    }

    /// The first hour of the interval.
    pub fn start_hour(self) -> u8 {
        self.0
    }

    /// A label such as "09:00 - 12:00".
    pub fn label(self) -> String {
        format!("{:02}:00 - {:02}:00", self.0, self.0 + 3)
    }
}

// ============================================================================
// PREPARATION
// ============================================================================

const TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[day padding:none]/[month padding:none]/[year] [hour repr:12 padding:none]:[minute]:[second] [period case_sensitive:false]"
);

/// Parse the date and time columns of a row into a timestamp.
///
/// The two strings are joined with a single space and must match
/// `day/month/year hour:minute:second AM|PM` exactly. Returns `None` for
/// anything else, e.g. "23:30:00 PM".
pub fn parse_timestamp(date: &str, time: &str) -> Option<PrimitiveDateTime> {
    let text = format!("{date} {time}");

    PrimitiveDateTime::parse(&text, TIMESTAMP_FORMAT)
        .inspect_err(|error| tracing::trace!("could not parse timestamp \"{text}\": {error}"))
        .ok()
}

/// Parse an amount such as "1,234.50" into a number.
///
/// Commas are removed before parsing. Returns `None` if the remaining text
/// is not a finite number.
pub fn normalize_amount(amount: &str) -> Option<f64> {
    let cleaned = amount.replace(',', "");

    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Prepare a single row.
pub fn prepare_transaction(raw: RawTransaction) -> Transaction {
    let timestamp = parse_timestamp(&raw.date, &raw.time);
    let amount = normalize_amount(&raw.amount);

    Transaction {
        id: raw.id,
        username: raw.username,
        timestamp,
        amount,
    }
}

/// Prepare every row, keeping the input order.
///
/// No rows are dropped: the output always has as many rows as the input.
pub fn prepare(raw_transactions: Vec<RawTransaction>) -> Vec<Transaction> {
    raw_transactions
        .into_iter()
        .map(prepare_transaction)
        .collect()
}

#[cfg(test)]
pub(crate) fn raw(username: &str, date: &str, time: &str, amount: &str) -> RawTransaction {
    RawTransaction {
        id: format!("{username}-{date}-{time}"),
        username: username.to_owned(),
        date: date.to_owned(),
        time: time.to_owned(),
        amount: amount.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::{
        ThreeHourBucket, YearMonth, normalize_amount, parse_timestamp, prepare, raw,
    };

    #[test]
    fn parses_twelve_hour_timestamp() {
        assert_eq!(
            parse_timestamp("01/05/2024", "10:00:00 AM"),
            Some(datetime!(2024-05-01 10:00:00))
        );
        assert_eq!(
            parse_timestamp("15/12/2023", "11:59:30 PM"),
            Some(datetime!(2023-12-15 23:59:30))
        );
    }

    #[test]
    fn midnight_and_noon_map_to_correct_hours() {
        assert_eq!(
            parse_timestamp("01/05/2024", "12:15:00 AM"),
            Some(datetime!(2024-05-01 00:15:00))
        );
        assert_eq!(
            parse_timestamp("01/05/2024", "12:15:00 PM"),
            Some(datetime!(2024-05-01 12:15:00))
        );
    }

    #[test]
    fn accepts_unpadded_day_month_and_hour() {
        assert_eq!(
            parse_timestamp("1/5/2024", "9:05:00 am"),
            Some(datetime!(2024-05-01 09:05:00))
        );
    }

    #[test]
    fn rejects_malformed_timestamps() {
        assert_eq!(parse_timestamp("01/05/2024", "23:30:00 PM"), None);
        assert_eq!(parse_timestamp("2024-05-01", "10:00:00 AM"), None);
        assert_eq!(parse_timestamp("31/02/2024", "10:00:00 AM"), None);
        assert_eq!(parse_timestamp("01/05/2024", "10:00:00"), None);
        assert_eq!(parse_timestamp("01/05/2024", ""), None);
        assert_eq!(parse_timestamp("", ""), None);
    }

    #[test]
    fn normalizes_amounts() {
        assert_eq!(normalize_amount("1234.50"), Some(1234.50));
        assert_eq!(normalize_amount("1,234.50"), Some(1234.50));
        assert_eq!(normalize_amount("1,000,000"), Some(1_000_000.0));
        assert_eq!(normalize_amount(" 42 "), Some(42.0));
        assert_eq!(normalize_amount("-5.25"), Some(-5.25));
        assert_eq!(normalize_amount("0"), Some(0.0));
    }

    #[test]
    fn invalid_amounts_are_missing() {
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("abc"), None);
        assert_eq!(normalize_amount("SGD 12.00"), None);
        assert_eq!(normalize_amount("NaN"), None);
        assert_eq!(normalize_amount("inf"), None);
    }

    #[test]
    fn three_hour_bucket_is_hour_minus_remainder() {
        for hour in 0..24 {
            let bucket = ThreeHourBucket::from_hour(hour);

            assert_eq!(bucket.start_hour(), hour - hour % 3);
            assert!(bucket.start_hour() <= 21);
            assert_eq!(bucket.start_hour() % 3, 0);
        }
    }

    #[test]
    fn three_hour_bucket_labels_are_zero_padded() {
        let labels: Vec<String> = ThreeHourBucket::all().map(ThreeHourBucket::label).collect();

        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], "00:00 - 03:00");
        assert_eq!(labels[3], "09:00 - 12:00");
        assert_eq!(labels[7], "21:00 - 24:00");
    }

    #[test]
    fn year_month_displays_as_key() {
        assert_eq!(YearMonth::from(date!(2024 - 05 - 17)).to_string(), "2024-05");
        assert!(YearMonth::new(2023, 12) < YearMonth::new(2024, 1));
    }

    #[test]
    fn prepare_keeps_invalid_rows() {
        let prepared = prepare(vec![
            raw("A", "01/05/2024", "10:00:00 AM", "100"),
            raw("B", "01/05/2024", "23:30:00 PM", "50"),
            raw("C", "02/05/2024", "01:00:00 PM", "n/a"),
        ]);

        assert_eq!(prepared.len(), 3);

        assert_eq!(prepared[0].hour(), Some(10));
        assert_eq!(
            prepared[0].three_hour_bucket(),
            Some(ThreeHourBucket::from_hour(9))
        );
        assert_eq!(prepared[0].month(), Some(YearMonth::new(2024, 5)));
        assert_eq!(prepared[0].amount, Some(100.0));

        assert_eq!(prepared[1].username, "B");
        assert_eq!(prepared[1].timestamp, None);
        assert_eq!(prepared[1].date(), None);
        assert_eq!(prepared[1].hour(), None);
        assert_eq!(prepared[1].amount, Some(50.0));

        assert_eq!(prepared[2].date(), Some(date!(2024 - 05 - 02)));
        assert_eq!(prepared[2].hour(), Some(13));
        assert_eq!(prepared[2].amount, None);
    }
}
