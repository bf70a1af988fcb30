//! Chart generation and rendering for the dashboard pages.
//!
//! This module creates interactive ECharts visualizations from aggregated
//! transaction data:
//! - **Sales by Hour** and **Sales in 3-Hour Intervals**: summed amounts
//! - **Transactions per Hour** and **Transactions per 3-Hour Interval**: counts
//! - **Daily Transactions**: transaction count per date as a line
//! - **Monthly Sales**: summed amounts per month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Line, bar::Bar},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    dashboard::aggregation::PeriodSummary,
    html::HeadElement,
    transaction::{ThreeHourBucket, YearMonth},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(super) fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders the HTML containers for dashboard charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
///
/// # Arguments
/// * `charts` - The charts to generate initialization scripts for
///
/// # Returns
/// HeadElement containing the initialization JavaScript.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn hour_label(hour: u8) -> String {
    format!("{hour:02}:00")
}

pub(super) fn hourly_sales_chart(hourly: &[PeriodSummary<u8>]) -> Chart {
    let labels = hourly.iter().map(|row| hour_label(row.key)).collect();
    let values = hourly.iter().map(|row| row.total_amount).collect();

    sales_bar_chart("Sales by Hour", labels, values)
}

pub(super) fn three_hour_sales_chart(buckets: &[PeriodSummary<ThreeHourBucket>]) -> Chart {
    let labels = buckets.iter().map(|row| row.key.label()).collect();
    let values = buckets.iter().map(|row| row.total_amount).collect();

    sales_bar_chart("Sales in 3-Hour Intervals", labels, values)
}

pub(super) fn monthly_sales_chart(monthly: &[PeriodSummary<YearMonth>]) -> Chart {
    let labels = monthly.iter().map(|row| row.key.to_string()).collect();
    let values = monthly.iter().map(|row| row.total_amount).collect();

    sales_bar_chart("Monthly Sales", labels, values)
}

pub(super) fn hourly_count_chart(hourly: &[PeriodSummary<u8>]) -> Chart {
    let labels = hourly.iter().map(|row| hour_label(row.key)).collect();
    let values = hourly.iter().map(transaction_count).collect();

    count_chart("Transactions per Hour", labels)
        .series(Bar::new().name("Transactions").data(values))
}

pub(super) fn three_hour_count_chart(buckets: &[PeriodSummary<ThreeHourBucket>]) -> Chart {
    let labels = buckets.iter().map(|row| row.key.label()).collect();
    let values = buckets.iter().map(transaction_count).collect();

    count_chart("Transactions per 3-Hour Interval", labels)
        .series(Bar::new().name("Transactions").data(values))
}

pub(super) fn daily_count_chart(daily: &[PeriodSummary<Date>]) -> Chart {
    let labels = daily.iter().map(|row| row.key.to_string()).collect();
    let values = daily.iter().map(transaction_count).collect();

    count_chart("Daily Transactions", labels)
        .series(Line::new().name("Transactions").data(values))
}

fn transaction_count<K>(row: &PeriodSummary<K>) -> i64 {
    row.transaction_count as i64
}

fn sales_bar_chart(title: &str, labels: Vec<String>, values: Vec<f64>) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Sales").data(values))
}

fn count_chart(title: &str, labels: Vec<String>) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const numberFormatter = new Intl.NumberFormat('en-US', {
              minimumFractionDigits: 2,
              maximumFractionDigits: 2
            });
            return (number === null || number === undefined)
                ? \"-\"
                : 'SGD ' + numberFormatter.format(number);",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{
        dashboard::aggregation::{hourly_summaries, three_hour_summaries},
        transaction::{Transaction, prepare, raw},
    };

    use super::{
        DashboardChart, charts_script, charts_view, hourly_count_chart, hourly_sales_chart,
        three_hour_sales_chart,
    };

    fn sample() -> Vec<Transaction> {
        prepare(vec![
            raw("alice", "01/05/2024", "10:00:00 AM", "100"),
            raw("bob", "01/05/2024", "10:30:00 AM", "50.5"),
        ])
    }

    #[test]
    fn hourly_sales_chart_has_every_hour() {
        let transactions = sample();
        let selected: Vec<&Transaction> = transactions.iter().collect();

        let options = hourly_sales_chart(&hourly_summaries(&selected)).to_string();

        assert!(options.contains("Sales by Hour"));
        assert!(options.contains("\"00:00\""));
        assert!(options.contains("\"23:00\""));
        assert!(options.contains("150.5"));
    }

    #[test]
    fn three_hour_chart_uses_interval_labels() {
        let transactions = sample();
        let selected: Vec<&Transaction> = transactions.iter().collect();

        let options = three_hour_sales_chart(&three_hour_summaries(&selected)).to_string();

        assert!(options.contains("Sales in 3-Hour Intervals"));
        assert!(options.contains("09:00 - 12:00"));
        assert!(options.contains("21:00 - 24:00"));
    }

    #[test]
    fn count_chart_has_title() {
        let transactions = sample();
        let selected: Vec<&Transaction> = transactions.iter().collect();

        let options = hourly_count_chart(&hourly_summaries(&selected)).to_string();

        assert!(options.contains("Transactions per Hour"));
    }

    #[test]
    fn renders_container_and_script_for_each_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let markup = charts_view(&charts).into_string();
        assert!(markup.contains("id=\"first-chart\""));
        assert!(markup.contains("id=\"second-chart\""));

        let crate::html::HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };
        assert!(script.0.contains("getElementById(\"first-chart\")"));
        assert!(script.0.contains("getElementById(\"second-chart\")"));
    }
}
