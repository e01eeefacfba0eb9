//! Defines the transaction store trait.

use serde::{Deserialize, Serialize};
use time::Month;

use crate::{Error, models::TransactionRecord};

/// Handles the storage and retrieval of transaction records.
///
/// Implementations return query results ordered by ID, ascending.
pub trait TransactionStore {
    /// Insert many records in a single operation.
    ///
    /// Records whose ID already exists in the store are skipped, so importing
    /// the same records twice does not duplicate them.
    ///
    /// Returns the number of records that were added.
    fn insert_many(&mut self, records: Vec<TransactionRecord>) -> Result<usize, Error>;

    /// Retrieve the records selected by `query`.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<TransactionRecord>, Error>;

    /// Count the records that match `query`, ignoring its offset and limit.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error>;

    /// Sum the price of the records that match `query`, ignoring its offset
    /// and limit. Returns zero if no records match.
    fn sum_price(&self, query: &TransactionQuery) -> Result<f64, Error>;

    /// Count the records whose sale date falls in `month`, for each category.
    ///
    /// Categories are listed in the order they first appear.
    fn count_by_category(&self, month: Month) -> Result<Vec<CategoryCount>, Error>;
}

/// Defines which records [TransactionStore::get_query] and friends select.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include records sold in this calendar month, in any year.
    pub month: Month,
    /// Only include records whose title, description or price text contains
    /// this text, ignoring ASCII case. `None` or an empty string matches everything.
    pub search: Option<String>,
    /// Only include records whose sold flag has this value.
    pub sold: Option<bool>,
    /// Only include records whose price lies in this range.
    pub price_range: Option<PriceRange>,
    /// Skip this many matching records.
    pub offset: u64,
    /// Selects up to the first N (`limit`) records after the offset.
    pub limit: Option<u64>,
}

impl TransactionQuery {
    /// A query for every record in `month`.
    pub fn in_month(month: Month) -> Self {
        Self {
            month,
            search: None,
            sold: None,
            price_range: None,
            offset: 0,
            limit: None,
        }
    }

    /// Only include records matching `search`.
    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(search.to_owned());
        self
    }

    /// Only include records with the sold flag `sold`.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Only include records priced within `price_range`.
    pub fn price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = Some(price_range);
        self
    }

    /// Skip `offset` records and return at most `limit`.
    pub fn paginate(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// The search text in lowercase, or `None` if every record matches.
    pub(crate) fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|search| !search.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// Whether `record` satisfies every filter of the query.
    ///
    /// The offset and limit are not considered.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.is_in_month(self.month)
            && self.sold.is_none_or(|sold| record.sold == sold)
            && self
                .price_range
                .is_none_or(|price_range| price_range.contains(record.price))
            && self
                .search_needle()
                .is_none_or(|needle| record.matches_search(&needle))
    }
}

/// A range of prices with an exclusive lower bound and an inclusive upper
/// bound. A missing bound leaves that side unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// Prices must be strictly greater than this.
    pub above: Option<f64>,
    /// Prices must be less than or equal to this.
    pub up_to: Option<f64>,
}

impl PriceRange {
    /// Whether `price` lies in the range.
    pub fn contains(&self, price: f64) -> bool {
        self.above.is_none_or(|above| price > above) && self.up_to.is_none_or(|up_to| price <= up_to)
    }
}

/// The number of records in a category.
///
/// Serialized as `{"_id": category, "count": n}` for the pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    #[serde(rename = "_id")]
    pub category: String,
    /// The number of records in the category.
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::datetime};

    use crate::models::TransactionRecord;

    use super::{PriceRange, TransactionQuery};

    fn record(title: &str, price: f64, sold: bool) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            title: title.to_owned(),
            description: String::new(),
            price,
            date_of_sale: datetime!(2021-03-05 0:00 UTC),
            category: "sport".to_owned(),
            sold,
        }
    }

    #[test]
    fn price_range_bounds() {
        let range = PriceRange {
            above: Some(100.0),
            up_to: Some(200.0),
        };

        assert!(!range.contains(100.0));
        assert!(range.contains(100.5));
        assert!(range.contains(200.0));
        assert!(!range.contains(200.01));
    }

    #[test]
    fn unbounded_price_ranges() {
        let below = PriceRange {
            above: None,
            up_to: Some(100.0),
        };
        let above = PriceRange {
            above: Some(900.0),
            up_to: None,
        };

        assert!(below.contains(-5.0));
        assert!(!below.contains(100.1));
        assert!(above.contains(1e9));
        assert!(!above.contains(900.0));
    }

    #[test]
    fn query_filters_by_month() {
        let query = TransactionQuery::in_month(Month::March);

        assert!(query.matches(&record("Bike", 150.0, true)));
        assert!(!TransactionQuery::in_month(Month::April).matches(&record("Bike", 150.0, true)));
    }

    #[test]
    fn empty_search_matches_everything() {
        let query = TransactionQuery::in_month(Month::March).search("");

        assert_eq!(query.search_needle(), None);
        assert!(query.matches(&record("Bike", 150.0, true)));
    }

    #[test]
    fn query_combines_filters() {
        let query = TransactionQuery::in_month(Month::March)
            .search("BIKE")
            .sold(true)
            .price_range(PriceRange {
                above: Some(100.0),
                up_to: Some(200.0),
            });

        assert!(query.matches(&record("Mountain bike", 150.0, true)));
        assert!(!query.matches(&record("Mountain bike", 150.0, false)));
        assert!(!query.matches(&record("Mountain bike", 250.0, true)));
        assert!(!query.matches(&record("Pen", 150.0, true)));
    }
}
