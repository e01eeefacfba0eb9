//! This module defines the domain data types.

pub use transaction::{
    TransactionId, TransactionRecord, format_date_of_sale, parse_date_of_sale,
};

mod transaction;
