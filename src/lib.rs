//! A JSON API for a monthly sales dashboard.
//!
//! The API loads a list of product transactions from a remote JSON document
//! into a database and answers questions about the transactions sold in a
//! calendar month: which were sold, the sales totals, a price histogram and
//! the split by category.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
pub mod dashboard;
pub mod endpoints;
mod error;
mod logging;
pub mod models;
pub mod month;
pub mod pagination;
mod routing;
pub mod seed;
pub mod stores;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, SeedSource};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
