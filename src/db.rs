/*! This module defines the traits for mapping domain models to the application's SQLite database. */

use rusqlite::{Connection, Error, Row, Transaction as SqlTransaction};

use crate::models::TransactionRecord;

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type the row is mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains the
    /// columns in the order given by the select statements of the store.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for the domain models.
///
/// Existing tables and their data are left untouched, so this is safe to
/// call on every start up.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    TransactionRecord::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
