//! Implements a struct that holds the state of the REST server.

use crate::{pagination::PaginationConfig, seed::SeedSource, stores::TransactionStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S>
where
    S: TransactionStore + Send + Sync,
{
    /// The store for managing [transactions](crate::models::TransactionRecord).
    pub transaction_store: S,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
    /// Where the init endpoint fetches its seed data from.
    pub seed_source: SeedSource,
}

impl<S> AppState<S>
where
    S: TransactionStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(
        transaction_store: S,
        pagination_config: PaginationConfig,
        seed_source: SeedSource,
    ) -> Self {
        Self {
            transaction_store,
            pagination_config,
            seed_source,
        }
    }
}
