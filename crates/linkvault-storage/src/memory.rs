use async_trait::async_trait;
use dashmap::DashMap;
use linkvault_core::storage::{
    Query, QueryOutput, RecordId, RecordStore, Result, StorageField, StorageRecord, PARTITION_KEY,
    SORT_KEY,
};
use linkvault_core::StorageError;
use std::collections::BTreeMap;
use tracing::trace;

/// Records of one partition, ordered by sort key.
type Partition = BTreeMap<String, StorageRecord>;

/// In-memory implementation of [`RecordStore`] using DashMap.
///
/// Each `(table, partition)` pair maps to a sorted map of records, so range
/// queries walk the sort keys in order. DashMap shards its locks, letting
/// requests on different partitions proceed without blocking each other.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    partitions: DashMap<(String, String), Partition>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            partitions: DashMap::new(),
        }
    }

    /// Creates a store pre-populated with `records` in `table`.
    pub fn with_records(
        table: &str,
        records: impl IntoIterator<Item = StorageRecord>,
    ) -> Result<Self> {
        let store = Self::new();
        for record in records {
            store.insert(table, record)?;
        }
        Ok(store)
    }

    /// Every record of `table`, ordered by partition then sort key.
    pub fn records(&self, table: &str) -> Vec<StorageRecord> {
        let mut partitions: Vec<(String, Vec<StorageRecord>)> = self
            .partitions
            .iter()
            .filter(|entry| entry.key().0 == table)
            .map(|entry| (entry.key().1.clone(), entry.value().values().cloned().collect()))
            .collect();
        partitions.sort_by(|a, b| a.0.cmp(&b.0));
        partitions
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect()
    }

    /// Number of records stored in `table`.
    pub fn len(&self, table: &str) -> usize {
        self.partitions
            .iter()
            .filter(|entry| entry.key().0 == table)
            .map(|entry| entry.value().len())
            .sum()
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    fn insert(&self, table: &str, record: StorageRecord) -> Result<()> {
        let (Some(partition), Some(sort_key)) = (record.partition.clone(), record.sort_key.clone())
        else {
            return Err(StorageError::InvalidData(format!(
                "record must carry both '{PARTITION_KEY}' and '{SORT_KEY}'"
            )));
        };

        self.partitions
            .entry((table.to_owned(), partition))
            .or_default()
            .insert(sort_key, record);
        Ok(())
    }
}

fn partition_key(table: &str, partition: &str) -> (String, String) {
    (table.to_owned(), partition.to_owned())
}

fn check_key_update(
    id: &RecordId,
    changed: &StorageRecord,
    removed: &[StorageField],
) -> Result<()> {
    let renames_partition = changed
        .partition
        .as_ref()
        .is_some_and(|p| *p != id.partition);
    let renames_sort_key = changed
        .sort_key
        .as_ref()
        .is_some_and(|s| *s != id.sort_key);
    let removes_key = removed
        .iter()
        .any(|f| matches!(f, StorageField::Partition | StorageField::SortKey));

    if renames_partition || renames_sort_key || removes_key {
        return Err(StorageError::InvalidData(format!(
            "key attributes of {id} cannot be updated"
        )));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn put(&self, table: &str, record: StorageRecord) -> Result<bool> {
        self.insert(table, record)?;
        Ok(true)
    }

    async fn query(&self, table: &str, query: &Query) -> Result<QueryOutput> {
        if let Some(index) = &query.index {
            return Err(StorageError::Query(format!(
                "secondary index '{index}' is not supported"
            )));
        }
        if query.partition_key != PARTITION_KEY {
            return Err(StorageError::Query(format!(
                "unknown partition key '{}'",
                query.partition_key
            )));
        }
        if let Some(sort) = &query.sort {
            if sort.key != SORT_KEY {
                return Err(StorageError::Query(format!(
                    "unknown sort key '{}'",
                    sort.key
                )));
            }
        }

        let Some(partition) = self
            .partitions
            .get(&partition_key(table, &query.partition_value))
        else {
            trace!(table, partition = %query.partition_value, "partition not found");
            return Ok(QueryOutput::default());
        };

        let matching = partition.iter().filter(|(sort_key, _)| {
            query
                .sort
                .as_ref()
                .is_none_or(|cond| cond.operator.matches(sort_key, &cond.value))
        });
        let ascending = query.sort.as_ref().is_none_or(|cond| cond.ascending);
        let ordered: Box<dyn Iterator<Item = (&String, &StorageRecord)>> = if ascending {
            Box::new(matching)
        } else {
            Box::new(matching.rev())
        };

        let records = ordered
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|(_, record)| match &query.fields {
                Some(fields) => record.project(fields),
                None => record.clone(),
            })
            .collect();

        Ok(QueryOutput::new(records))
    }

    async fn update(
        &self,
        table: &str,
        id: &RecordId,
        changed: StorageRecord,
        removed: &[StorageField],
    ) -> Result<bool> {
        check_key_update(id, &changed, removed)?;

        let Some(mut partition) = self
            .partitions
            .get_mut(&partition_key(table, &id.partition))
        else {
            return Ok(false);
        };
        let Some(record) = partition.get_mut(&id.sort_key) else {
            return Ok(false);
        };

        record.apply(changed);
        for field in removed {
            record.remove(*field);
        }
        Ok(true)
    }

    async fn delete(&self, table: &str, id: &RecordId) -> Result<bool> {
        let key = partition_key(table, &id.partition);

        let Some(mut partition) = self.partitions.get_mut(&key) else {
            return Ok(false);
        };
        let existed = partition.remove(&id.sort_key).is_some();
        let now_empty = partition.is_empty();
        drop(partition);

        if now_empty {
            self.partitions.remove_if(&key, |_, records| records.is_empty());
        }
        Ok(existed)
    }
}
