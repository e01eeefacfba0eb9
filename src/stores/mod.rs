//! Contains the transaction store trait and its implementations.
//!
//! The HTTP layer only talks to a [TransactionStore], so the query and
//! aggregation logic can run against SQLite in production and against the
//! in-memory store in tests.

mod memory;
mod transaction;

pub mod sqlite;

pub use memory::MemoryTransactionStore;
pub use transaction::{CategoryCount, PriceRange, TransactionQuery, TransactionStore};
