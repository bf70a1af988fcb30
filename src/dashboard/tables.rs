//! Table views for dashboard data display.
//!
//! Provides HTML tables for the daily, monthly and per-user summaries and
//! for listing individual transactions.

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    dashboard::aggregation::{PeriodSummary, UserSummary},
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, format_count,
        format_currency,
    },
    transaction::{Transaction, YearMonth},
};

const TABLE_NUMBER_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";
const TABLE_NUMBER_HEADER_STYLE: &str = "px-6 py-3 text-right";
const TABLE_TEXT_HEADER_STYLE: &str = "px-6 py-3";

const TIME_FORMAT: &[BorrowedFormatItem] = format_description!("[hour]:[minute]:[second]");

/// Wraps a table with a heading and the shared container styles.
fn table_section(id: &str, heading: &str, table: Markup) -> Markup {
    html! {
        section id=(id) class="w-full mb-8" {
            h3 class="text-xl font-semibold mb-4" { (heading) }

            div class="overflow-x-auto rounded-lg shadow" {
                table class=(TABLE_STYLE) { (table) }
            }
        }
    }
}

/// Renders the header row shared by the period tables.
fn period_table_header(key_title: &str) -> Markup {
    html! {
        thead class=(TABLE_HEADER_STYLE) {
            tr {
                th scope="col" class=(TABLE_TEXT_HEADER_STYLE) { (key_title) }
                th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Total Sales" }
                th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Transactions" }
                th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Unique Users" }
            }
        }
    }
}

fn period_table_body<K: ToString>(rows: &[PeriodSummary<K>]) -> Markup {
    html! {
        tbody {
            @for row in rows {
                tr class=(TABLE_ROW_STYLE) {
                    th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                        (row.key.to_string())
                    }
                    td class=(TABLE_NUMBER_CELL_STYLE) { (format_currency(row.total_amount)) }
                    td class=(TABLE_NUMBER_CELL_STYLE) { (format_count(row.transaction_count)) }
                    td class=(TABLE_NUMBER_CELL_STYLE) { (format_count(row.unique_users)) }
                }
            }
        }
    }
}

/// Renders a table with the sales totals for each date.
pub(super) fn daily_table(daily: &[PeriodSummary<Date>]) -> Markup {
    table_section(
        "daily-table",
        "Daily Sales",
        html! {
            (period_table_header("Date"))
            (period_table_body(daily))
        },
    )
}

/// Renders a table with the sales totals for each month.
pub(super) fn monthly_table(monthly: &[PeriodSummary<YearMonth>]) -> Markup {
    table_section(
        "monthly-table",
        "Monthly Summary",
        html! {
            (period_table_header("Month"))
            (period_table_body(monthly))
        },
    )
}

/// Renders a table with the totals for each user, in the order given.
pub(super) fn user_table(users: &[UserSummary]) -> Markup {
    table_section(
        "user-table",
        "User Analysis",
        html! {
            thead class=(TABLE_HEADER_STYLE) {
                tr {
                    th scope="col" class=(TABLE_TEXT_HEADER_STYLE) { "Username" }
                    th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Total Sales" }
                    th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Transactions" }
                    th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Active Days" }
                }
            }
            tbody {
                @for user in users {
                    tr class=(TABLE_ROW_STYLE) {
                        th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                            (user.username)
                        }
                        td class=(TABLE_NUMBER_CELL_STYLE) { (format_currency(user.total_amount)) }
                        td class=(TABLE_NUMBER_CELL_STYLE) { (format_count(user.transaction_count)) }
                        td class=(TABLE_NUMBER_CELL_STYLE) { (format_count(user.active_days)) }
                    }
                }
            }
        },
    )
}

/// Renders a table listing each transaction in the order given.
///
/// Missing dates, times and amounts are shown as "-".
pub(super) fn transactions_table(transactions: &[&Transaction]) -> Markup {
    table_section(
        "transactions-table",
        "Transaction Details",
        html! {
            thead class=(TABLE_HEADER_STYLE) {
                tr {
                    th scope="col" class=(TABLE_TEXT_HEADER_STYLE) { "Unique Code" }
                    th scope="col" class=(TABLE_TEXT_HEADER_STYLE) { "Username" }
                    th scope="col" class=(TABLE_TEXT_HEADER_STYLE) { "Date" }
                    th scope="col" class=(TABLE_TEXT_HEADER_STYLE) { "Time" }
                    th scope="col" class=(TABLE_NUMBER_HEADER_STYLE) { "Amount" }
                }
            }
            tbody {
                @for transaction in transactions {
                    tr class=(TABLE_ROW_STYLE) {
                        td class=(TABLE_CELL_STYLE) { (transaction.id) }
                        td class=(TABLE_CELL_STYLE) { (transaction.username) }
                        td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                            (display_or_dash(transaction.date().map(|date| date.to_string())))
                        }
                        td class=(TABLE_CELL_STYLE) { (display_or_dash(format_time(transaction))) }
                        td class=(TABLE_NUMBER_CELL_STYLE) {
                            (display_or_dash(transaction.amount.map(format_currency)))
                        }
                    }
                }
            }
        },
    )
}

fn format_time(transaction: &Transaction) -> Option<String> {
    transaction
        .time()
        .and_then(|time| time.format(TIME_FORMAT).ok())
}

fn display_or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_owned())
}
