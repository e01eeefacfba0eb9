//! Implements a transaction store that keeps records in memory.

use std::sync::{Arc, RwLock};

use time::Month;

use crate::{
    Error,
    models::TransactionRecord,
    stores::transaction::{CategoryCount, TransactionQuery, TransactionStore},
};

/// Keeps transactions in a shared vector, sorted by ID.
///
/// Clones share the same records. Useful for tests and short lived demos
/// where a database is not needed.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionStore {
    records: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl MemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn matching<'a>(
        records: &'a [TransactionRecord],
        query: &'a TransactionQuery,
    ) -> impl Iterator<Item = &'a TransactionRecord> + 'a {
        records.iter().filter(move |record| query.matches(record))
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn insert_many(&mut self, records: Vec<TransactionRecord>) -> Result<usize, Error> {
        let mut stored = self.records.write().map_err(|_| Error::DatabaseLockError)?;
        let mut inserted_count = 0;

        for record in records {
            if let Err(position) = stored.binary_search_by_key(&record.id, |existing| existing.id) {
                stored.insert(position, record);
                inserted_count += 1;
            }
        }

        Ok(inserted_count)
    }

    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<TransactionRecord>, Error> {
        let records = self.records.read().map_err(|_| Error::DatabaseLockError)?;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(Self::matching(&records, query)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, query: &TransactionQuery) -> Result<u64, Error> {
        let records = self.records.read().map_err(|_| Error::DatabaseLockError)?;

        Ok(Self::matching(&records, query).count() as u64)
    }

    fn sum_price(&self, query: &TransactionQuery) -> Result<f64, Error> {
        let records = self.records.read().map_err(|_| Error::DatabaseLockError)?;

        Ok(Self::matching(&records, query)
            .map(|record| record.price)
            .sum())
    }

    fn count_by_category(&self, month: Month) -> Result<Vec<CategoryCount>, Error> {
        let records = self.records.read().map_err(|_| Error::DatabaseLockError)?;
        let mut counts: Vec<CategoryCount> = Vec::new();

        for record in records.iter().filter(|record| record.is_in_month(month)) {
            match counts
                .iter_mut()
                .find(|count| count.category == record.category)
            {
                Some(count) => count.count += 1,
                None => counts.push(CategoryCount {
                    category: record.category.clone(),
                    count: 1,
                }),
            }
        }

        Ok(counts)
    }
}
