//! Gathers the transactions and every chart of a month in one response.

use serde::{Deserialize, Serialize};
use time::Month;
use tokio::task::spawn_blocking;

use crate::{
    Error,
    dashboard::aggregation::{
        BarChartEntry, Statistics, get_bar_chart, get_pie_chart, get_statistics,
    },
    models::TransactionRecord,
    pagination::Page,
    stores::{CategoryCount, TransactionStore},
    transaction::list_transactions,
};

/// The first page of a month's transactions together with its aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedView {
    /// The first page of transactions.
    pub transactions: Vec<TransactionRecord>,
    /// The sales totals.
    pub statistics: Statistics,
    /// The price histogram.
    pub bar_chart_data: Vec<BarChartEntry>,
    /// The category distribution.
    pub pie_chart_data: Vec<CategoryCount>,
}

/// Build the [CombinedView] of `month`, listing the transactions on `page`.
///
/// The four parts are computed concurrently on the blocking thread pool.
///
/// # Errors
/// Returns the first error of any part. No partial view is returned.
pub async fn get_combined<S>(store: &S, month: Month, page: Page) -> Result<CombinedView, Error>
where
    S: TransactionStore + Clone + Send + 'static,
{
    let transactions = {
        let store = store.clone();
        spawn_blocking(move || list_transactions(&store, month, None, page))
    };
    let statistics = {
        let store = store.clone();
        spawn_blocking(move || get_statistics(&store, month))
    };
    let bar_chart_data = {
        let store = store.clone();
        spawn_blocking(move || get_bar_chart(&store, month))
    };
    let pie_chart_data = {
        let store = store.clone();
        spawn_blocking(move || get_pie_chart(&store, month))
    };

    let (transactions, statistics, bar_chart_data, pie_chart_data) = tokio::try_join!(
        flatten(transactions),
        flatten(statistics),
        flatten(bar_chart_data),
        flatten(pie_chart_data),
    )?;

    Ok(CombinedView {
        transactions,
        statistics,
        bar_chart_data,
        pie_chart_data,
    })
}

async fn flatten<T>(task: tokio::task::JoinHandle<Result<T, Error>>) -> Result<T, Error> {
    task.await?
}
