//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{Type, Value},
};
use time::Month;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{TransactionRecord, format_date_of_sale, parse_date_of_sale},
    month::month_index,
    stores::transaction::{CategoryCount, TransactionQuery, TransactionStore},
};

/// Stores transactions in a SQLite database.
///
/// Besides the record fields, each row keeps the sale month and the price
/// text so that month filters and free text search run inside SQLite.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The table must already exist, see [crate::db::initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

const SELECT_COLUMNS: &str = "id, title, description, price, date_of_sale, category, sold";

impl CreateTable for TransactionRecord {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    price REAL NOT NULL,
                    price_text TEXT NOT NULL,
                    date_of_sale TEXT NOT NULL,
                    sale_month INTEGER NOT NULL,
                    category TEXT NOT NULL,
                    sold INTEGER NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for TransactionRecord {
    type ReturnType = Self;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let date_index = 4;
        let raw_date: String = row.get(date_index)?;
        let date_of_sale = parse_date_of_sale(&raw_date).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(date_index, Type::Text, Box::new(error))
        })?;

        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            date_of_sale,
            category: row.get(5)?,
            sold: row.get(6)?,
        })
    }
}

/// Build the WHERE clause for the filters of `query` along with its parameters.
fn where_clause(query: &TransactionQuery) -> (String, Vec<Value>) {
    let mut clause_parts = vec!["sale_month = ?1".to_owned()];
    let mut parameters = vec![Value::Integer(month_index(query.month))];

    if let Some(needle) = query.search_needle() {
        let position = parameters.len() + 1;
        clause_parts.push(format!(
            "(instr(lower(title), ?{position}) > 0 \
            OR instr(lower(description), ?{position}) > 0 \
            OR instr(lower(price_text), ?{position}) > 0)"
        ));
        parameters.push(Value::Text(needle));
    }

    if let Some(sold) = query.sold {
        clause_parts.push(format!("sold = ?{}", parameters.len() + 1));
        parameters.push(Value::Integer(i64::from(sold)));
    }

    if let Some(price_range) = query.price_range {
        if let Some(above) = price_range.above {
            clause_parts.push(format!("price > ?{}", parameters.len() + 1));
            parameters.push(Value::Real(above));
        }

        if let Some(up_to) = price_range.up_to {
            clause_parts.push(format!("price <= ?{}", parameters.len() + 1));
            parameters.push(Value::Real(up_to));
        }
    }

    (format!("WHERE {}", clause_parts.join(" AND ")), parameters)
}

/// Convert a count or offset to the integer type SQLite uses.
fn to_sql_integer(value: u64, name: &str) -> Result<i64, Error> {
    i64::try_from(value).map_err(|_| Error::InvalidQuery(format!("{name} {value} is too large")))
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert the records in a single SQL transaction.
    ///
    /// Records with an ID that is already in the database are ignored.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an unexpected SQL error, in
    /// which case none of the records are inserted.
    fn insert_many(&mut self, records: Vec<TransactionRecord>) -> Result<usize, Error> {
        let connection = self.lock()?;

        let tx = connection.unchecked_transaction()?;
        let mut inserted_count = 0;

        let mut stmt = tx.prepare(
            "INSERT INTO \"transaction\"
                (id, title, description, price, price_text, date_of_sale, sale_month, category, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO NOTHING",
        )?;

        for record in records {
            let date_of_sale = format_date_of_sale(record.date_of_sale).map_err(|error| {
                Error::SeedDecode(format!(
                    "the sale date of transaction {} cannot be stored: {error}",
                    record.id
                ))
            })?;

            inserted_count += stmt.execute((
                record.id,
                &record.title,
                &record.description,
                record.price,
                record.price_text(),
                date_of_sale,
                month_index(record.sale_month()),
                &record.category,
                record.sold,
            ))?;
        }

        drop(stmt);

        tx.commit()?;
        Ok(inserted_count)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<TransactionRecord>, Error> {
        let (where_clause, mut parameters) = where_clause(query);
        let mut query_string_parts = vec![
            format!("SELECT {SELECT_COLUMNS} FROM \"transaction\""),
            where_clause,
            "ORDER BY id ASC".to_owned(),
        ];

        if query.limit.is_some() || query.offset > 0 {
            // SQLite treats a negative limit as no limit.
            let limit = match query.limit {
                Some(limit) => to_sql_integer(limit, "limit")?,
                None => -1,
            };

            query_string_parts.push(format!(
                "LIMIT ?{} OFFSET ?{}",
                parameters.len() + 1,
                parameters.len() + 2
            ));
            parameters.push(Value::Integer(limit));
            parameters.push(Value::Integer(to_sql_integer(query.offset, "offset")?));
        }

        let query_string = query_string_parts.join(" ");

        self.lock()?
            .prepare(&query_string)?
            .query_map(params_from_iter(parameters.iter()), TransactionRecord::map_row)?
            .map(|maybe_record| maybe_record.map_err(Error::from))
            .collect()
    }

    fn count(&self, query: &TransactionQuery) -> Result<u64, Error> {
        let (where_clause, parameters) = where_clause(query);
        let query_string = format!("SELECT COUNT(*) FROM \"transaction\" {where_clause}");

        let count: i64 = self.lock()?.query_row(
            &query_string,
            params_from_iter(parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(count.unsigned_abs())
    }

    fn sum_price(&self, query: &TransactionQuery) -> Result<f64, Error> {
        let (where_clause, parameters) = where_clause(query);
        let query_string =
            format!("SELECT COALESCE(SUM(price), 0.0) FROM \"transaction\" {where_clause}");

        let total = self.lock()?.query_row(
            &query_string,
            params_from_iter(parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(total)
    }

    fn count_by_category(&self, month: Month) -> Result<Vec<CategoryCount>, Error> {
        self.lock()?
            .prepare(
                "SELECT category, COUNT(*) FROM \"transaction\"
                 WHERE sale_month = ?1
                 GROUP BY category
                 ORDER BY MIN(id) ASC",
            )?
            .query_map([month_index(month)], |row| {
                let count: i64 = row.get(1)?;

                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: count.unsigned_abs(),
                })
            })?
            .map(|maybe_count| maybe_count.map_err(Error::from))
            .collect()
    }
}
