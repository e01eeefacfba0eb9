//! The route handler for listing a month's transactions as JSON.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error, models::TransactionRecord, month::require_month, pagination::Page,
    stores::TransactionStore, transaction::list_transactions,
};

/// The query parameters for the transactions endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListParams {
    /// The month to list, see [crate::month::parse_month].
    pub month: Option<String>,
    /// Only list transactions whose title, description or price contains this text.
    pub search: Option<String>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The maximum number of transactions on the page.
    #[serde(rename = "perPage")]
    pub per_page: Option<u64>,
}

/// A route handler that returns one page of a month's transactions.
pub async fn transactions_endpoint<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Response
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    match fetch_transactions(&state, params) {
        Ok(records) => Json(records).into_response(),
        Err(error) => error.into_failure_response("Error fetching transactions."),
    }
}

fn fetch_transactions<S>(
    state: &AppState<S>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<Vec<TransactionRecord>, Error>
where
    S: TransactionStore + Send + Sync,
{
    let Query(params) = params?;
    let month = require_month(params.month.as_deref())?;
    let page = Page::new(params.page, params.per_page, &state.pagination_config)?;

    list_transactions(
        &state.transaction_store,
        month,
        params.search.as_deref(),
        page,
    )
}
