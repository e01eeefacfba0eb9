//! Dashboard HTTP handlers.
//!
//! Each handler takes the month from the `month` query parameter and responds
//! with JSON, or with the endpoint's plain text failure message.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{get_bar_chart, get_pie_chart, get_statistics},
        combined::get_combined,
    },
    month::require_month,
    pagination::Page,
    stores::TransactionStore,
};

/// The query parameters shared by the dashboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    /// The month to aggregate, see [crate::month::parse_month].
    pub month: Option<String>,
}

fn month_from(params: Result<Query<MonthParams>, QueryRejection>) -> Result<Month, Error> {
    let Query(params) = params?;
    require_month(params.month.as_deref())
}

fn respond<T: Serialize>(result: Result<T, Error>, failure_message: &'static str) -> Response {
    match result {
        Ok(data) => Json(data).into_response(),
        Err(error) => error.into_failure_response(failure_message),
    }
}

/// A route handler that returns the sales totals of a month.
pub async fn statistics_endpoint<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Response
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    let result =
        month_from(params).and_then(|month| get_statistics(&state.transaction_store, month));

    respond(result, "Error fetching statistics.")
}

/// A route handler that returns the price histogram of a month.
pub async fn bar_chart_endpoint<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Response
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    let result =
        month_from(params).and_then(|month| get_bar_chart(&state.transaction_store, month));

    respond(result, "Error fetching bar chart data.")
}

/// A route handler that returns the category distribution of a month.
pub async fn pie_chart_endpoint<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Response
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    let result =
        month_from(params).and_then(|month| get_pie_chart(&state.transaction_store, month));

    respond(result, "Error fetching pie chart data.")
}

/// A route handler that returns the first page of a month's transactions
/// together with all of its aggregates.
pub async fn combined_endpoint<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Response
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    let result = match month_from(params) {
        Ok(month) => {
            let page = Page::first(&state.pagination_config);
            get_combined(&state.transaction_store, month, page).await
        }
        Err(error) => Err(error),
    };

    respond(result, "Error fetching combined data.")
}
