//! The API endpoints URIs.

/// The route that populates the database from the seed source.
pub const INIT: &str = "/api/init";
/// The route for listing a page of a month's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for a month's sales totals.
pub const STATISTICS: &str = "/api/statistics";
/// The route for a month's price histogram.
pub const BAR_CHART: &str = "/api/bar-chart";
/// The route for a month's category distribution.
pub const PIE_CHART: &str = "/api/pie-chart";
/// The route for the transactions and every chart of a month at once.
pub const COMBINED: &str = "/api/combined";
