//! The URIs of the dashboard pages.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The overview of the whole data set.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for analysing the transactions of a single day.
pub const DAILY_VIEW: &str = "/daily";
/// The page showing totals per month.
pub const MONTHLY_VIEW: &str = "/monthly";
/// The page showing totals per customer.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The date-range filtered sales analysis page.
pub const SALES_VIEW: &str = "/sales";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
