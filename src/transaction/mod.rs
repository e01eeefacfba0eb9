//! Listing the transactions sold in a month.
//!
//! This module contains:
//! - The query that selects one page of a month's transactions
//! - The route handler for the transactions endpoint

mod list_endpoint;
mod query;

pub use list_endpoint::{TransactionListParams, transactions_endpoint};
pub use query::list_transactions;
