//! The sales analysis page: every table and chart for a range of dates.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    dashboard::{
        aggregation::{
            daily_summaries, hourly_summaries, monthly_summaries, summarize,
            three_hour_summaries, user_summaries,
        },
        cards::summary_cards_view,
        charts::{DashboardChart, charts_view, hourly_sales_chart, three_hour_sales_chart},
        handlers::{DashboardState, dashboard_no_data_view, no_data_notice, page_view},
        tables::{daily_table, monthly_table, transactions_table, user_table},
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    navigation::NavBar,
    transaction::{DateRange, date_bounds, filter_by_range, format_date_param, parse_date_param},
};

/// Query parameters for the sales analysis page.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    /// The first date to include in the format `YYYY-MM-DD`.
    pub start: Option<String>,
    /// The last date to include in the format `YYYY-MM-DD`.
    pub end: Option<String>,
}

/// Display the sales for a range of dates.
///
/// Missing dates default to the first and last dates in the data set, and
/// both dates are clamped to the dates in the data set.
pub async fn get_sales_page(
    State(state): State<DashboardState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::SALES_VIEW);
    let transactions = state.load()?;

    let Some(bounds) = date_bounds(&transactions) else {
        return Ok(dashboard_no_data_view(nav_bar, "Sales Analysis", &state).into_response());
    };

    let range = DateRange::clamped(
        parse_date_param("start", query.start.as_deref()),
        parse_date_param("end", query.end.as_deref()),
        bounds,
    );

    let form = date_range_form(&bounds, &range);
    let subtitle = range.to_string();
    let selected = filter_by_range(&transactions, range);

    if selected.is_empty() {
        let content = html!(
            (form)
            (no_data_notice("No data available for the selected date range"))
        );

        return Ok(
            page_view(nav_bar, "Sales Analysis", Some(&subtitle), &content, &[]).into_response(),
        );
    }

    let charts = [
        DashboardChart::new(
            "hourly-sales-chart",
            hourly_sales_chart(&hourly_summaries(&selected)),
        ),
        DashboardChart::new(
            "three-hour-sales-chart",
            three_hour_sales_chart(&three_hour_summaries(&selected)),
        ),
    ];

    let content = html!(
        (form)
        (summary_cards_view(&summarize(&selected)))
        (daily_table(&daily_summaries(&selected)))
        (monthly_table(&monthly_summaries(&selected)))
        (user_table(&user_summaries(&selected)))
        (transactions_table(&selected))
        (charts_view(&charts))
    );

    Ok(page_view(nav_bar, "Sales Analysis", Some(&subtitle), &content, &charts).into_response())
}

/// Renders the start and end date pickers.
///
/// Both pickers are limited to `bounds`, and the end picker cannot go
/// before the selected start date.
fn date_range_form(bounds: &DateRange, range: &DateRange) -> Markup {
    let min = format_date_param(bounds.start());
    let max = format_date_param(bounds.end());
    let start = format_date_param(range.start());

    html!(
        form
            method="get"
            action=(endpoints::SALES_VIEW)
            class="w-full mb-6 flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "Start date" }
                input
                    type="date"
                    name="start"
                    id="start"
                    value=(start)
                    min=(min)
                    max=(max)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "End date" }
                input
                    type="date"
                    name="end"
                    id="end"
                    value=(format_date_param(range.end()))
                    min=(start)
                    max=(max)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    )
}
