//! Hand-written collaborators for exercising the service contract.

use async_trait::async_trait;
use linkvault_core::storage::{Query, QueryOutput, RecordId, RecordStore, Result};
use linkvault_core::{StorageError, StorageField, StorageRecord};
use linkvault_generator::seq::SeqGenerator;
use linkvault_generator::KeyGenerator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// An update as received by the store.
#[derive(Debug, Clone)]
pub struct UpdateCall {
    pub id: RecordId,
    pub changed: StorageRecord,
    pub removed: Vec<StorageField>,
}

/// A store whose answers are fixed up front and which records every call.
///
/// The first `taken` queries report a matching record, later ones report
/// nothing.
pub struct ScriptedStore {
    taken: AtomicUsize,
    query_error: Option<StorageError>,
    put_result: Result<bool>,
    update_result: Result<bool>,
    delete_result: Result<bool>,
    pub queries: Mutex<Vec<Query>>,
    pub puts: Mutex<Vec<StorageRecord>>,
    pub updates: Mutex<Vec<UpdateCall>>,
    pub deletes: Mutex<Vec<RecordId>>,
}

impl ScriptedStore {
    pub fn free() -> Self {
        Self {
            taken: AtomicUsize::new(0),
            query_error: None,
            put_result: Ok(true),
            update_result: Ok(true),
            delete_result: Ok(true),
            queries: Mutex::new(Vec::new()),
            puts: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn taken_for(mut self, lookups: usize) -> Self {
        self.taken = AtomicUsize::new(lookups);
        self
    }

    pub fn failing_queries(mut self, err: StorageError) -> Self {
        self.query_error = Some(err);
        self
    }

    pub fn put_returns(mut self, result: Result<bool>) -> Self {
        self.put_result = result;
        self
    }

    pub fn update_returns(mut self, result: Result<bool>) -> Self {
        self.update_result = result;
        self
    }

    pub fn delete_returns(mut self, result: Result<bool>) -> Self {
        self.delete_result = result;
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn put(&self, _table: &str, record: StorageRecord) -> Result<bool> {
        self.puts.lock().unwrap().push(record);
        self.put_result.clone()
    }

    async fn query(&self, _table: &str, query: &Query) -> Result<QueryOutput> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(err) = &self.query_error {
            return Err(err.clone());
        }

        let taken = self
            .taken
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !taken {
            return Ok(QueryOutput::default());
        }

        let prefix = query
            .sort
            .as_ref()
            .map(|cond| cond.value.clone())
            .unwrap_or_default();
        Ok(QueryOutput::new(vec![StorageRecord {
            partition: Some(query.partition_value.clone()),
            sort_key: Some(format!("{prefix}other")),
            original_link: Some("https://taken.test".to_string()),
            ..Default::default()
        }]))
    }

    async fn update(
        &self,
        _table: &str,
        id: &RecordId,
        changed: StorageRecord,
        removed: &[StorageField],
    ) -> Result<bool> {
        self.updates.lock().unwrap().push(UpdateCall {
            id: id.clone(),
            changed,
            removed: removed.to_vec(),
        });
        self.update_result.clone()
    }

    async fn delete(&self, _table: &str, id: &RecordId) -> Result<bool> {
        self.deletes.lock().unwrap().push(id.clone());
        self.delete_result.clone()
    }
}

/// A sequential generator that counts how often it was asked for a key.
#[derive(Default)]
pub struct CountingGenerator {
    inner: SeqGenerator,
    calls: AtomicUsize,
}

impl CountingGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for CountingGenerator {
    fn generate(&self, length: usize) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(length)
    }
}
