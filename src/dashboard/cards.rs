//! Metric tiles shown at the top of the dashboard pages.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::SalesSummary,
    html::{format_count, format_currency},
};

/// A single labelled metric.
struct Tile<'a> {
    label: &'a str,
    value: String,
    detail: Option<String>,
}

impl Tile<'_> {
    fn into_html(self) -> Markup {
        html! {
            div
                class="bg-white dark:bg-gray-800 border border-gray-200
                       dark:border-gray-700 rounded-lg p-4 shadow-md
                       flex flex-col justify-between"
                aria-label=(format!("{}: {}", self.label, self.value))
            {
                h4 class="text-sm font-semibold text-gray-600 dark:text-gray-400 mb-2" {
                    (self.label)
                }

                div class="text-3xl font-bold truncate" title=(self.value) {
                    (self.value)
                }

                @if let Some(detail) = self.detail {
                    div class="text-sm text-gray-600 dark:text-gray-400 mt-1" {
                        (detail)
                    }
                }
            }
        }
    }
}

fn tiles_view(tiles: Vec<Tile>) -> Markup {
    html! {
        section id="metrics" class="w-full mx-auto mb-8" {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4" {
                @for tile in tiles {
                    (tile.into_html())
                }
            }
        }
    }
}

fn summary_tiles(summary: &SalesSummary) -> Vec<Tile<'static>> {
    vec![
        Tile {
            label: "Total Sales",
            value: format_currency(summary.total_amount),
            detail: None,
        },
        Tile {
            label: "Total Transactions",
            value: format_count(summary.transaction_count),
            detail: None,
        },
        Tile {
            label: "Unique Users",
            value: format_count(summary.unique_users),
            detail: None,
        },
    ]
}

fn most_frequent_user_tile(most_frequent_user: Option<&(String, usize)>) -> Tile<'static> {
    match most_frequent_user {
        Some((username, count)) => Tile {
            label: "Most Frequent User",
            value: username.clone(),
            detail: Some(format!("{} transactions", format_count(*count))),
        },
        None => Tile {
            label: "Most Frequent User",
            value: "-".to_owned(),
            detail: None,
        },
    }
}

/// Renders the total sales, transaction count and unique user tiles.
pub(super) fn summary_cards_view(summary: &SalesSummary) -> Markup {
    tiles_view(summary_tiles(summary))
}

/// Renders the summary tiles followed by a tile for the most frequent user.
pub(super) fn summary_with_top_user_cards_view(
    summary: &SalesSummary,
    most_frequent_user: Option<&(String, usize)>,
) -> Markup {
    let mut tiles = summary_tiles(summary);
    tiles.push(most_frequent_user_tile(most_frequent_user));

    tiles_view(tiles)
}

/// Renders a lone tile for the most frequent user.
pub(super) fn most_frequent_user_card_view(most_frequent_user: Option<&(String, usize)>) -> Markup {
    tiles_view(vec![most_frequent_user_tile(most_frequent_user)])
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::dashboard::aggregation::SalesSummary;

    use super::{most_frequent_user_card_view, summary_cards_view, summary_with_top_user_cards_view};

    fn tile_labels(markup: maud::Markup) -> Vec<String> {
        let html = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("[aria-label]").unwrap();

        html.select(&selector)
            .filter_map(|tile| tile.value().attr("aria-label"))
            .map(str::to_owned)
            .collect()
    }

    fn summary() -> SalesSummary {
        SalesSummary {
            total_amount: 1234.5,
            transaction_count: 1500,
            unique_users: 3,
        }
    }

    #[test]
    fn renders_summary_tiles() {
        let labels = tile_labels(summary_cards_view(&summary()));

        assert_eq!(
            labels,
            vec![
                "Total Sales: SGD 1,234.50",
                "Total Transactions: 1,500",
                "Unique Users: 3"
            ]
        );
    }

    #[test]
    fn renders_most_frequent_user_tile() {
        let top_user = ("alice".to_owned(), 12);

        let labels = tile_labels(summary_with_top_user_cards_view(&summary(), Some(&top_user)));

        assert_eq!(labels.len(), 4);
        assert_eq!(labels[3], "Most Frequent User: alice");
    }

    #[test]
    fn renders_placeholder_without_users() {
        let labels = tile_labels(most_frequent_user_card_view(None));

        assert_eq!(labels, vec!["Most Frequent User: -"]);
    }
}
