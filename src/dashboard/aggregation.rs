//! Transaction data aggregation for tables, tiles and charts.
//!
//! Every reducer takes the selected transactions and returns rows ordered the
//! way they are displayed. Missing amounts are skipped by sums, and missing
//! timestamps are skipped by the date and hour groupings.

use std::collections::{BTreeMap, HashMap, HashSet};

use time::Date;

use crate::transaction::{ThreeHourBucket, Transaction, YearMonth};

/// Totals over a set of transactions.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SalesSummary {
    /// Sum of the valid amounts.
    pub total_amount: f64,
    /// Number of transactions, including those with an invalid amount.
    pub transaction_count: usize,
    /// Number of distinct users.
    pub unique_users: usize,
}

/// Totals for one group of transactions, e.g. a day or a month.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PeriodSummary<K> {
    pub key: K,
    pub total_amount: f64,
    pub transaction_count: usize,
    pub unique_users: usize,
}

/// Totals for the transactions of one user.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct UserSummary {
    pub username: String,
    pub total_amount: f64,
    pub transaction_count: usize,
    /// Number of distinct days the user made a purchase.
    pub active_days: usize,
}

/// Accumulates the metrics shared by the period reducers.
#[derive(Default)]
struct Accumulator<'a> {
    total_amount: f64,
    transaction_count: usize,
    users: HashSet<&'a str>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, transaction: &'a Transaction) {
        self.total_amount += transaction.amount.unwrap_or(0.0);
        self.transaction_count += 1;
        self.users.insert(transaction.username.as_str());
    }

    fn finish<K>(self, key: K) -> PeriodSummary<K> {
        PeriodSummary {
            key,
            total_amount: self.total_amount,
            transaction_count: self.transaction_count,
            unique_users: self.users.len(),
        }
    }
}

/// Calculates the totals shown in the summary tiles.
pub(super) fn summarize(transactions: &[&Transaction]) -> SalesSummary {
    let mut accumulator = Accumulator::default();

    for &transaction in transactions {
        accumulator.add(transaction);
    }

    SalesSummary {
        total_amount: accumulator.total_amount,
        transaction_count: accumulator.transaction_count,
        unique_users: accumulator.users.len(),
    }
}

/// Groups transactions by a key and sorts the groups by key.
///
/// Transactions for which `key` returns `None` are skipped.
fn summarize_by<'a, K, F>(transactions: &[&'a Transaction], key: F) -> Vec<PeriodSummary<K>>
where
    K: Ord,
    F: Fn(&Transaction) -> Option<K>,
{
    let mut groups: BTreeMap<K, Accumulator<'a>> = BTreeMap::new();

    for &transaction in transactions {
        if let Some(key) = key(transaction) {
            groups.entry(key).or_default().add(transaction);
        }
    }

    groups
        .into_iter()
        .map(|(key, accumulator)| accumulator.finish(key))
        .collect()
}

/// Totals per calendar date in ascending order.
pub(super) fn daily_summaries(transactions: &[&Transaction]) -> Vec<PeriodSummary<Date>> {
    summarize_by(transactions, Transaction::date)
}

/// Totals per month in ascending order.
pub(super) fn monthly_summaries(transactions: &[&Transaction]) -> Vec<PeriodSummary<YearMonth>> {
    summarize_by(transactions, Transaction::month)
}

/// Totals for each hour of the day.
///
/// Always returns 24 rows, one per hour from 0 to 23, with zeroes for hours
/// that have no transactions.
pub(super) fn hourly_summaries(transactions: &[&Transaction]) -> Vec<PeriodSummary<u8>> {
    let mut totals: BTreeMap<u8, PeriodSummary<u8>> = summarize_by(transactions, Transaction::hour)
        .into_iter()
        .map(|summary| (summary.key, summary))
        .collect();

    (0..24)
        .map(|hour| totals.remove(&hour).unwrap_or_else(|| empty_summary(hour)))
        .collect()
}

/// Totals for each three hour interval of the day.
///
/// Always returns 8 rows, starting with the 00:00 - 03:00 interval.
pub(super) fn three_hour_summaries(
    transactions: &[&Transaction],
) -> Vec<PeriodSummary<ThreeHourBucket>> {
    let mut totals: HashMap<ThreeHourBucket, PeriodSummary<ThreeHourBucket>> =
        summarize_by(transactions, Transaction::three_hour_bucket)
            .into_iter()
            .map(|summary| (summary.key, summary))
            .collect();

    ThreeHourBucket::all()
        .map(|bucket| {
            totals
                .remove(&bucket)
                .unwrap_or_else(|| empty_summary(bucket))
        })
        .collect()
}

fn empty_summary<K>(key: K) -> PeriodSummary<K> {
    PeriodSummary {
        key,
        total_amount: 0.0,
        transaction_count: 0,
        unique_users: 0,
    }
}

/// Totals per user, most transactions first.
///
/// Users with the same number of transactions are sorted by name.
pub(super) fn user_summaries(transactions: &[&Transaction]) -> Vec<UserSummary> {
    let mut groups: HashMap<&str, (f64, usize, HashSet<Date>)> = HashMap::new();

    for transaction in transactions {
        let (total_amount, transaction_count, active_days) = groups
            .entry(transaction.username.as_str())
            .or_default();

        *total_amount += transaction.amount.unwrap_or(0.0);
        *transaction_count += 1;

        if let Some(date) = transaction.date() {
            active_days.insert(date);
        }
    }

    let mut summaries: Vec<UserSummary> = groups
        .into_iter()
        .map(
            |(username, (total_amount, transaction_count, active_days))| UserSummary {
                username: username.to_owned(),
                total_amount,
                transaction_count,
                active_days: active_days.len(),
            },
        )
        .collect();

    summaries.sort_by(|a, b| {
        b.transaction_count
            .cmp(&a.transaction_count)
            .then_with(|| a.username.cmp(&b.username))
    });

    summaries
}

/// The user with the most transactions and their transaction count.
///
/// Ties go to the user whose name sorts first. Returns `None` if there are
/// no transactions.
pub(super) fn most_frequent_user(transactions: &[&Transaction]) -> Option<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        *counts.entry(transaction.username.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .min_by(|(name_a, count_a), (name_b, count_b)| {
            count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
        })
        .map(|(username, count)| (username.to_owned(), count))
}
