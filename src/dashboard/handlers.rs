//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The state shared by the dashboard handlers
//! - Route handlers for the dashboard, daily, monthly and customer pages
//! - Shared page layout and "no data" views

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{
            daily_summaries, hourly_summaries, monthly_summaries, most_frequent_user,
            summarize, three_hour_summaries, user_summaries,
        },
        cards::{most_frequent_user_card_view, summary_cards_view, summary_with_top_user_cards_view},
        charts::{
            DashboardChart, charts_script, charts_view, daily_count_chart, hourly_count_chart,
            monthly_sales_chart, three_hour_count_chart,
        },
        tables::{monthly_table, transactions_table, user_table},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    transaction::{
        DateRange, Transaction, TransactionSource, date_bounds, filter_by_date,
        format_date_param, parse_date_param,
    },
};

/// The state needed for displaying the dashboard pages.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The transaction log to report on.
    pub transactions: TransactionSource,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

impl DashboardState {
    /// Load the prepared transactions.
    ///
    /// Failures are logged by [TransactionSource::load].
    pub(super) fn load(&self) -> Result<Arc<[Transaction]>, Error> {
        self.transactions.load()
    }
}

/// Query parameters for the daily analysis page.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    /// The date to analyse in the format `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Display an overview of the whole data set.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);
    let transactions = state.load()?;

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, "Dashboard", &state).into_response());
    }

    let all: Vec<&Transaction> = transactions.iter().collect();
    let summary = summarize(&all);
    let top_user = most_frequent_user(&all);

    let charts = [
        DashboardChart::new(
            "daily-transactions-chart",
            daily_count_chart(&daily_summaries(&all)),
        ),
        DashboardChart::new(
            "hourly-transactions-chart",
            hourly_count_chart(&hourly_summaries(&all)),
        ),
    ];

    let content = html!(
        (summary_with_top_user_cards_view(&summary, top_user.as_ref()))
        (charts_view(&charts))
    );

    Ok(page_view(nav_bar, "Dashboard", None, &content, &charts).into_response())
}

/// Display the transactions of a single day.
///
/// The day defaults to the latest date in the data set and is clamped to the
/// dates in the data set.
pub async fn get_daily_page(
    State(state): State<DashboardState>,
    Query(query): Query<DateQuery>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::DAILY_VIEW);
    let transactions = state.load()?;

    let Some(bounds) = date_bounds(&transactions) else {
        return Ok(dashboard_no_data_view(nav_bar, "Daily Analysis", &state).into_response());
    };

    let date = parse_date_param("date", query.date.as_deref())
        .map(|date| bounds.clamp(date))
        .unwrap_or(bounds.end());

    let form = date_form(&bounds, date);
    let subtitle = date.to_string();
    let selected = filter_by_date(&transactions, date);

    if selected.is_empty() {
        let content = html!(
            (form)
            (no_data_notice("No data available for the selected date"))
        );

        return Ok(
            page_view(nav_bar, "Daily Analysis", Some(&subtitle), &content, &[]).into_response(),
        );
    }

    let charts = [
        DashboardChart::new(
            "hourly-transactions-chart",
            hourly_count_chart(&hourly_summaries(&selected)),
        ),
        DashboardChart::new(
            "three-hour-transactions-chart",
            three_hour_count_chart(&three_hour_summaries(&selected)),
        ),
    ];

    let content = html!(
        (form)
        (summary_cards_view(&summarize(&selected)))
        (charts_view(&charts))
        (transactions_table(&selected))
    );

    Ok(page_view(nav_bar, "Daily Analysis", Some(&subtitle), &content, &charts).into_response())
}

/// Display the sales totals for each month.
pub async fn get_monthly_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::MONTHLY_VIEW);
    let transactions = state.load()?;

    let all: Vec<&Transaction> = transactions.iter().collect();
    let monthly = monthly_summaries(&all);

    if monthly.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, "Monthly Analysis", &state).into_response());
    }

    let charts = [DashboardChart::new(
        "monthly-sales-chart",
        monthly_sales_chart(&monthly),
    )];

    let content = html!(
        (monthly_table(&monthly))
        (charts_view(&charts))
    );

    Ok(page_view(nav_bar, "Monthly Analysis", None, &content, &charts).into_response())
}

/// Display the totals for each customer.
pub async fn get_customers_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW);
    let transactions = state.load()?;

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, "Customer Details", &state).into_response());
    }

    let all: Vec<&Transaction> = transactions.iter().collect();
    let top_user = most_frequent_user(&all);

    let content = html!(
        (most_frequent_user_card_view(top_user.as_ref()))
        (user_table(&user_summaries(&all)))
    );

    Ok(page_view(nav_bar, "Customer Details", None, &content, &[]).into_response())
}

/// Renders a page with a heading, the page content and the chart scripts.
///
/// # Arguments
/// * `nav_bar` - Navigation bar component
/// * `title` - The page title and heading
/// * `subtitle` - Text shown under the heading, e.g. the selected dates
/// * `content` - The tiles, tables and charts for the page
/// * `charts` - The charts rendered in `content`, used to build the scripts
pub(super) fn page_view(
    nav_bar: NavBar<'_>,
    title: &str,
    subtitle: Option<&str>,
    content: &Markup,
    charts: &[DashboardChart],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full mb-6"
            {
                h2 class="text-2xl font-bold" { (title) }

                @if let Some(subtitle) = subtitle {
                    p class="text-sm text-gray-600 dark:text-gray-400" { (subtitle) }
                }
            }

            (content)
        }
    );

    let scripts = if charts.is_empty() {
        Vec::new()
    } else {
        vec![HeadElement::echarts(), charts_script(charts)]
    };

    base(title, &scripts, &content)
}

/// Renders a notice in place of the tiles, tables and charts.
pub(super) fn no_data_notice(message: &str) -> Markup {
    html!(
        div
            id="no-data"
            class="w-full p-4 text-center rounded-lg bg-blue-50 text-blue-800
                dark:bg-gray-800 dark:text-blue-400"
            role="status"
        {
            (message)
        }
    )
}

/// Renders a page when the transaction log has no usable rows.
///
/// # Arguments
/// * `nav_bar` - Navigation bar component
/// * `title` - The page title
/// * `state` - Used to point the user at the data file
pub(super) fn dashboard_no_data_view(
    nav_bar: NavBar,
    title: &str,
    state: &DashboardState,
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let path = state.transactions.path().display().to_string();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once " code { (path) } " has some
                transactions with valid dates."
            }
        }
    );

    base(title, &[], &content)
}

/// Renders the exact date picker for the daily analysis page.
fn date_form(bounds: &DateRange, date: time::Date) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::DAILY_VIEW)
            class="w-full mb-6 flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    value=(format_date_param(date))
                    min=(format_date_param(bounds.start()))
                    max=(format_date_param(bounds.end()))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
        }
    )
}
