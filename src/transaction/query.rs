//! Store query for a page of a month's transactions.

use time::Month;

use crate::{
    Error,
    models::TransactionRecord,
    pagination::Page,
    stores::{TransactionQuery, TransactionStore},
};

/// Get one page of the transactions sold in `month` of any year.
///
/// If `search` is not empty, only transactions whose title, description or
/// price contains it (ignoring case) are included. Transactions are ordered
/// by ID.
///
/// # Errors
/// Returns an error if the store query fails.
pub fn list_transactions<S>(
    store: &S,
    month: Month,
    search: Option<&str>,
    page: Page,
) -> Result<Vec<TransactionRecord>, Error>
where
    S: TransactionStore,
{
    let mut query = TransactionQuery::in_month(month).paginate(page.skip(), page.size());

    if let Some(search) = search {
        query = query.search(search);
    }

    store.get_query(&query)
}
