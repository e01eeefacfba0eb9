//! Seeds the transaction store from a remote JSON document.
//!
//! The seed source returns a JSON array of transactions. Seeding is
//! idempotent: transactions whose ID is already stored are skipped.

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, models::TransactionRecord, stores::TransactionStore};

/// The seed data used when no other source is configured.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Where to fetch the seed data from.
#[derive(Debug, Clone)]
pub struct SeedSource {
    url: String,
    client: reqwest::Client,
}

impl SeedSource {
    /// Create a seed source for `url` whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns [Error::SeedRequest] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::SeedRequest(error.to_string()))?;

        Ok(Self {
            url: url.to_owned(),
            client,
        })
    }

    /// The URL the seed data is fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the seed data.
    ///
    /// # Errors
    /// Returns [Error::SeedRequest] if the request fails or the response
    /// status is not a success, or [Error::SeedDecode] if the body is not a
    /// JSON array of transactions.
    pub async fn fetch(&self) -> Result<Vec<TransactionRecord>, Error> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| Error::SeedRequest(error.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|error| Error::SeedRequest(error.to_string()))?;

        serde_json::from_slice(&body).map_err(|error| Error::SeedDecode(error.to_string()))
    }
}

/// Fetch the seed data from `seed_source` and insert it into `store`.
///
/// Returns the number of transactions that were added to the store.
///
/// # Errors
/// Returns an error if the seed data cannot be fetched or decoded, or if the
/// store rejects the insert. Nothing is inserted in either case.
pub async fn seed_transactions<S>(seed_source: &SeedSource, store: &S) -> Result<usize, Error>
where
    S: TransactionStore + Clone + Send + 'static,
{
    let records = seed_source.fetch().await?;
    let fetched_count = records.len();
    tracing::info!("Fetched {fetched_count} transactions from {}", seed_source.url());

    let mut store = store.clone();
    let inserted_count = tokio::task::spawn_blocking(move || store.insert_many(records)).await??;

    tracing::info!(
        "Inserted {inserted_count} new transactions, skipped {} already stored",
        fetched_count - inserted_count
    );

    Ok(inserted_count)
}

/// A route handler that populates the transaction store from the seed source.
pub async fn init_endpoint<S>(State(state): State<AppState<S>>) -> Response
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    match seed_transactions(&state.seed_source, &state.transaction_store).await {
        Ok(_) => (StatusCode::OK, "Database initialized with seed data.").into_response(),
        Err(error) => error.into_failure_response("Error initializing database."),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use time::Month;

    use crate::{
        Error, build_router, endpoints,
        seed::{SeedSource, seed_transactions},
        stores::{MemoryTransactionStore, TransactionQuery, TransactionStore},
        test_utils::{spawn_seed_server, sqlite_app_state, unreachable_seed_source},
    };

    const SEED_JSON: &str = r#"[
        {"id": 1, "title": "Bike", "description": "", "price": 150, "dateOfSale": "2021-03-05", "category": "sport", "sold": true, "image": "bike.jpg"},
        {"id": 2, "title": "Pen", "description": "", "price": 5, "dateOfSale": "2021-03-20", "category": "office", "sold": false, "image": "pen.jpg"},
        {"id": 3, "title": "Lamp", "description": "Desk lamp", "price": 40.5, "dateOfSale": "2022-07-01T09:30:00+02:00", "category": "home", "sold": true, "image": "lamp.jpg"}
    ]"#;

    async fn seed_source_serving(status: StatusCode, body: &str) -> SeedSource {
        let url = spawn_seed_server(status, body.to_owned()).await;
        SeedSource::new(&url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_decodes_seed_data() {
        let seed_source = seed_source_serving(StatusCode::OK, SEED_JSON).await;

        let records = seed_source.fetch().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].title, "Lamp");
        assert_eq!(records[2].sale_month(), Month::July);
    }

    #[tokio::test]
    async fn fetch_fails_on_error_status() {
        let seed_source = seed_source_serving(StatusCode::NOT_FOUND, "[]").await;

        let result = seed_source.fetch().await;

        assert!(matches!(result, Err(Error::SeedRequest(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn fetch_fails_on_malformed_payload() {
        let seed_source = seed_source_serving(StatusCode::OK, r#"{"not": "a list"}"#).await;

        let result = seed_source.fetch().await;

        assert!(matches!(result, Err(Error::SeedDecode(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn fetch_fails_when_source_is_unreachable() {
        let result = unreachable_seed_source().fetch().await;

        assert!(matches!(result, Err(Error::SeedRequest(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate_transactions() {
        let seed_source = seed_source_serving(StatusCode::OK, SEED_JSON).await;
        let store = MemoryTransactionStore::new();

        let first = seed_transactions(&seed_source, &store).await.unwrap();
        let second = seed_transactions(&seed_source, &store).await.unwrap();

        assert_eq!(first, 3);
        assert_eq!(second, 0);
        assert_eq!(store.count(&TransactionQuery::in_month(Month::March)).unwrap(), 2);
    }

    #[tokio::test]
    async fn malformed_payload_inserts_nothing() {
        let seed_source = seed_source_serving(
            StatusCode::OK,
            r#"[{"id": 1, "price": 1, "dateOfSale": "2021-03-05"}, {"id": 2, "price": "free", "dateOfSale": "2021-03-05"}]"#,
        )
        .await;
        let store = MemoryTransactionStore::new();

        let result = seed_transactions(&seed_source, &store).await;

        assert!(matches!(result, Err(Error::SeedDecode(_))), "got {result:?}");
        assert_eq!(store.count(&TransactionQuery::in_month(Month::March)).unwrap(), 0);
    }

    #[tokio::test]
    async fn non_finite_price_is_a_decode_error() {
        let seed_source = seed_source_serving(
            StatusCode::OK,
            r#"[{"id": 1, "price": 1, "dateOfSale": "2021-03-05"}, {"id": 2, "price": "NaN", "dateOfSale": "2021-03-05"}]"#,
        )
        .await;
        let store = sqlite_app_state(Vec::new(), unreachable_seed_source()).transaction_store;

        let result = seed_transactions(&seed_source, &store).await;

        assert!(matches!(result, Err(Error::SeedDecode(_))), "got {result:?}");
        assert_eq!(store.count(&TransactionQuery::in_month(Month::March)).unwrap(), 0);
    }

    #[tokio::test]
    async fn init_endpoint_seeds_the_database() {
        let seed_source = seed_source_serving(StatusCode::OK, SEED_JSON).await;
        let state = sqlite_app_state(Vec::new(), seed_source);
        let store = state.transaction_store.clone();
        let server = TestServer::new(build_router(state)).expect("Could not create test server.");

        let response = server.get(endpoints::INIT).await;

        response.assert_status_ok();
        response.assert_text("Database initialized with seed data.");
        assert_eq!(store.count(&TransactionQuery::in_month(Month::March)).unwrap(), 2);
        assert_eq!(store.count(&TransactionQuery::in_month(Month::July)).unwrap(), 1);
    }

    #[tokio::test]
    async fn init_endpoint_can_be_called_again() {
        let seed_source = seed_source_serving(StatusCode::OK, SEED_JSON).await;
        let state = sqlite_app_state(Vec::new(), seed_source);
        let store = state.transaction_store.clone();
        let server = TestServer::new(build_router(state)).expect("Could not create test server.");

        server.get(endpoints::INIT).await.assert_status_ok();
        server.get(endpoints::INIT).await.assert_status_ok();

        assert_eq!(store.count(&TransactionQuery::in_month(Month::March)).unwrap(), 2);
    }

    #[tokio::test]
    async fn init_endpoint_reports_generic_failure() {
        let state = sqlite_app_state(Vec::new(), unreachable_seed_source());
        let server = TestServer::new(build_router(state)).expect("Could not create test server.");

        let response = server.get(endpoints::INIT).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Error initializing database.");
    }
}
