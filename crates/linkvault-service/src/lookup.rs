//! Key lookups shared by the resolver and the service.

use linkvault_core::storage::{Query, RecordStore, Result, SortCondition, StorageRecord, SORT_KEY};
use linkvault_core::sort_key;
use linkvault_core::StorageField;

/// Query for the first record of `key` in `domain`, whatever its namespace.
pub(crate) fn key_query(domain: &str, key: &str) -> Query {
    Query::builder()
        .partition_value(domain)
        .sort(SortCondition::begins_with(SORT_KEY, sort_key::key_prefix(key)))
        .limit(1)
        .build()
}

pub(crate) async fn find_first<S: RecordStore + ?Sized>(
    store: &S,
    table: &str,
    query: &Query,
) -> Result<Option<StorageRecord>> {
    Ok(store.query(table, query).await?.into_first())
}

/// Returns `true` if any namespace in `domain` uses `key`.
pub(crate) async fn key_exists<S: RecordStore + ?Sized>(
    store: &S,
    table: &str,
    domain: &str,
    key: &str,
) -> Result<bool> {
    let mut query = key_query(domain, key);
    query.fields = Some(vec![StorageField::SortKey]);
    Ok(find_first(store, table, &query).await?.is_some())
}
