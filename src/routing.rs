//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState,
    dashboard::{bar_chart_endpoint, combined_endpoint, pie_chart_endpoint, statistics_endpoint},
    endpoints,
    seed::init_endpoint,
    stores::TransactionStore,
    transaction::transactions_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::INIT, get(init_endpoint::<S>))
        .route(endpoints::TRANSACTIONS, get(transactions_endpoint::<S>))
        .route(endpoints::STATISTICS, get(statistics_endpoint::<S>))
        .route(endpoints::BAR_CHART, get(bar_chart_endpoint::<S>))
        .route(endpoints::PIE_CHART, get(pie_chart_endpoint::<S>))
        .route(endpoints::COMBINED, get(combined_endpoint::<S>))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found.").into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{
        build_router, endpoints,
        test_utils::{scenario_records, sqlite_app_state, unreachable_seed_source},
    };

    fn server() -> TestServer {
        let state = sqlite_app_state(scenario_records(), unreachable_seed_source());
        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = server().get("/api/unknown").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text("Not found.");
    }

    #[tokio::test]
    async fn read_endpoints_only_accept_get() {
        let server = server();

        for endpoint in [
            endpoints::INIT,
            endpoints::TRANSACTIONS,
            endpoints::STATISTICS,
            endpoints::BAR_CHART,
            endpoints::PIE_CHART,
            endpoints::COMBINED,
        ] {
            let response = server.post(endpoint).await;

            response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        }
    }
}
