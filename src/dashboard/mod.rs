//! Dashboard module
//!
//! Provides the monthly sales statistics, the bar and pie chart data and the
//! combined view of a month.

mod aggregation;
mod combined;
mod handlers;

pub use aggregation::{
    BarChartEntry, PRICE_BUCKETS, PriceBucket, Statistics, get_bar_chart, get_pie_chart,
    get_statistics,
};
pub use combined::{CombinedView, get_combined};
pub use handlers::{
    MonthParams, bar_chart_endpoint, combined_endpoint, pie_chart_endpoint, statistics_endpoint,
};
