//! Monthly sales aggregates for the dashboard charts.
//!
//! Provides the sales statistics, the price histogram for the bar chart and
//! the category distribution for the pie chart. Every aggregate is scoped to
//! a calendar month of any year.

use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    Error,
    stores::{CategoryCount, PriceRange, TransactionQuery, TransactionStore},
};

/// Sales totals for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of the sold transactions.
    pub total_sale_amount: f64,
    /// The number of sold transactions.
    pub total_sold_items: u64,
    /// The number of transactions that were not sold.
    pub total_not_sold_items: u64,
}

/// The number of transactions in one price bucket of the bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarChartEntry {
    /// The label of the price bucket, e.g. "101-200".
    pub range: String,
    /// The number of transactions priced within the bucket.
    pub count: u64,
}

/// A labelled price range of the bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    /// The label shown on the chart.
    pub label: &'static str,
    /// The prices counted in the bucket.
    pub range: PriceRange,
}

const fn bucket(label: &'static str, above: Option<f64>, up_to: Option<f64>) -> PriceBucket {
    PriceBucket {
        label,
        range: PriceRange { above, up_to },
    }
}

/// The price buckets of the bar chart, in display order.
///
/// The buckets do not overlap and cover every price, so their counts always
/// add up to the number of transactions in the month.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    bucket("0-100", None, Some(100.0)),
    bucket("101-200", Some(100.0), Some(200.0)),
    bucket("201-300", Some(200.0), Some(300.0)),
    bucket("301-400", Some(300.0), Some(400.0)),
    bucket("401-500", Some(400.0), Some(500.0)),
    bucket("501-600", Some(500.0), Some(600.0)),
    bucket("601-700", Some(600.0), Some(700.0)),
    bucket("701-800", Some(700.0), Some(800.0)),
    bucket("801-900", Some(800.0), Some(900.0)),
    bucket("901-above", Some(900.0), None),
];

/// Calculate the sales totals for `month`.
///
/// # Errors
/// Returns an error if a store query fails.
pub fn get_statistics<S>(store: &S, month: Month) -> Result<Statistics, Error>
where
    S: TransactionStore,
{
    let sold = TransactionQuery::in_month(month).sold(true);
    let not_sold = TransactionQuery::in_month(month).sold(false);

    Ok(Statistics {
        total_sale_amount: store.sum_price(&sold)?,
        total_sold_items: store.count(&sold)?,
        total_not_sold_items: store.count(&not_sold)?,
    })
}

/// Count the transactions of `month` in each of the [PRICE_BUCKETS].
///
/// Every bucket is listed, including empty ones.
///
/// # Errors
/// Returns an error if a store query fails.
pub fn get_bar_chart<S>(store: &S, month: Month) -> Result<Vec<BarChartEntry>, Error>
where
    S: TransactionStore,
{
    PRICE_BUCKETS
        .iter()
        .map(|bucket| {
            let query = TransactionQuery::in_month(month).price_range(bucket.range);

            Ok(BarChartEntry {
                range: bucket.label.to_owned(),
                count: store.count(&query)?,
            })
        })
        .collect()
}

/// Count the transactions of `month` in each category that occurs in it.
///
/// # Errors
/// Returns an error if the store query fails.
pub fn get_pie_chart<S>(store: &S, month: Month) -> Result<Vec<CategoryCount>, Error>
where
    S: TransactionStore,
{
    store.count_by_category(month)
}
