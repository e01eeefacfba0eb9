//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

pub mod transaction;

pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize, pagination::PaginationConfig, seed::SeedSource};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteTransactionStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database if they do not exist yet.
///
/// # Errors
/// Returns an error if the tables cannot be created.
pub fn create_app_state(
    db_connection: Connection,
    pagination_config: PaginationConfig,
    seed_source: SeedSource,
) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let transaction_store = SQLiteTransactionStore::new(connection);

    Ok(AppState::new(
        transaction_store,
        pagination_config,
        seed_source,
    ))
}
