//! Storage-engine shaped records and the collaborator contract.

use crate::error::StorageError;
use crate::record::SupplementaryData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use typed_builder::TypedBuilder;

/// Type alias for storage results.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Name of the partition key attribute.
pub const PARTITION_KEY: &str = "p";
/// Name of the sort key attribute.
pub const SORT_KEY: &str = "id";

/// A record as persisted by the storage engine.
///
/// Every attribute is optional so the same shape serves full writes and
/// sparse partial updates. Absent attributes are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(rename = "ns", default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<String>,
    #[serde(rename = "ol", default, skip_serializing_if = "Option::is_none")]
    pub original_link: Option<String>,
    /// Expiry in minutes.
    #[serde(rename = "ex", default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    /// Unix seconds.
    #[serde(rename = "toe", default, skip_serializing_if = "Option::is_none")]
    pub time_of_expiry: Option<i64>,
    /// Unix seconds.
    #[serde(rename = "toc", default, skip_serializing_if = "Option::is_none")]
    pub time_of_creation: Option<i64>,
    #[serde(rename = "sd", default, skip_serializing_if = "Option::is_none")]
    pub supplementary_data: Option<SupplementaryData>,
}

impl StorageRecord {
    /// Returns `true` if the attribute is set.
    pub fn has(&self, field: StorageField) -> bool {
        match field {
            StorageField::Partition => self.partition.is_some(),
            StorageField::SortKey => self.sort_key.is_some(),
            StorageField::NamespaceId => self.namespace_id.is_some(),
            StorageField::OriginalLink => self.original_link.is_some(),
            StorageField::Expiry => self.expiry.is_some(),
            StorageField::TimeOfExpiry => self.time_of_expiry.is_some(),
            StorageField::TimeOfCreation => self.time_of_creation.is_some(),
            StorageField::SupplementaryData => self.supplementary_data.is_some(),
        }
    }

    /// Clears a single attribute.
    pub fn remove(&mut self, field: StorageField) {
        match field {
            StorageField::Partition => self.partition = None,
            StorageField::SortKey => self.sort_key = None,
            StorageField::NamespaceId => self.namespace_id = None,
            StorageField::OriginalLink => self.original_link = None,
            StorageField::Expiry => self.expiry = None,
            StorageField::TimeOfExpiry => self.time_of_expiry = None,
            StorageField::TimeOfCreation => self.time_of_creation = None,
            StorageField::SupplementaryData => self.supplementary_data = None,
        }
    }

    /// Overwrites every attribute that is set in `changed`, leaving the rest.
    pub fn apply(&mut self, changed: StorageRecord) {
        let StorageRecord {
            partition,
            sort_key,
            namespace_id,
            original_link,
            expiry,
            time_of_expiry,
            time_of_creation,
            supplementary_data,
        } = changed;

        if partition.is_some() {
            self.partition = partition;
        }
        if sort_key.is_some() {
            self.sort_key = sort_key;
        }
        if namespace_id.is_some() {
            self.namespace_id = namespace_id;
        }
        if original_link.is_some() {
            self.original_link = original_link;
        }
        if expiry.is_some() {
            self.expiry = expiry;
        }
        if time_of_expiry.is_some() {
            self.time_of_expiry = time_of_expiry;
        }
        if time_of_creation.is_some() {
            self.time_of_creation = time_of_creation;
        }
        if supplementary_data.is_some() {
            self.supplementary_data = supplementary_data;
        }
    }

    /// Keeps only the listed attributes.
    pub fn project(&self, fields: &[StorageField]) -> StorageRecord {
        let mut projected = self.clone();
        for field in StorageField::ALL {
            if !fields.contains(&field) {
                projected.remove(field);
            }
        }
        projected
    }
}

/// Attribute names of a [`StorageRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageField {
    #[serde(rename = "p")]
    Partition,
    #[serde(rename = "id")]
    SortKey,
    #[serde(rename = "ns")]
    NamespaceId,
    #[serde(rename = "ol")]
    OriginalLink,
    #[serde(rename = "ex")]
    Expiry,
    #[serde(rename = "toe")]
    TimeOfExpiry,
    #[serde(rename = "toc")]
    TimeOfCreation,
    #[serde(rename = "sd")]
    SupplementaryData,
}

impl StorageField {
    pub const ALL: [StorageField; 8] = [
        StorageField::Partition,
        StorageField::SortKey,
        StorageField::NamespaceId,
        StorageField::OriginalLink,
        StorageField::Expiry,
        StorageField::TimeOfExpiry,
        StorageField::TimeOfCreation,
        StorageField::SupplementaryData,
    ];

    /// The attribute name used by the storage engine.
    pub fn name(self) -> &'static str {
        match self {
            StorageField::Partition => PARTITION_KEY,
            StorageField::SortKey => SORT_KEY,
            StorageField::NamespaceId => "ns",
            StorageField::OriginalLink => "ol",
            StorageField::Expiry => "ex",
            StorageField::TimeOfExpiry => "toe",
            StorageField::TimeOfCreation => "toc",
            StorageField::SupplementaryData => "sd",
        }
    }
}

impl Display for StorageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact identifier of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub partition: String,
    pub sort_key: String,
}

impl RecordId {
    pub fn new(partition: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort_key: sort_key.into(),
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.partition, self.sort_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOperator {
    BeginsWith,
}

impl SortOperator {
    pub fn matches(self, candidate: &str, value: &str) -> bool {
        match self {
            SortOperator::BeginsWith => candidate.starts_with(value),
        }
    }
}

/// Range condition on the sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCondition {
    pub ascending: bool,
    pub key: String,
    pub value: String,
    pub operator: SortOperator,
}

impl SortCondition {
    /// Ascending `begins_with(key, value)` condition.
    pub fn begins_with(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ascending: true,
            key: key.into(),
            value: value.into(),
            operator: SortOperator::BeginsWith,
        }
    }
}

/// A range query inside one partition.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Query {
    /// Secondary index to query instead of the table itself.
    #[builder(default, setter(strip_option, into))]
    pub index: Option<String>,
    #[builder(default = PARTITION_KEY.to_string(), setter(into))]
    pub partition_key: String,
    #[builder(setter(into))]
    pub partition_value: String,
    /// Attributes to return; all of them when `None`.
    #[builder(default, setter(strip_option))]
    pub fields: Option<Vec<StorageField>>,
    /// Maximum number of records to return.
    #[builder(default, setter(strip_option))]
    pub limit: Option<usize>,
    #[builder(default, setter(strip_option))]
    pub sort: Option<SortCondition>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub records: Vec<StorageRecord>,
    pub count: usize,
}

impl QueryOutput {
    pub fn new(records: Vec<StorageRecord>) -> Self {
        let count = records.len();
        Self { records, count }
    }

    /// Takes the first record, if any.
    pub fn into_first(self) -> Option<StorageRecord> {
        self.records.into_iter().next()
    }
}

/// The key-value storage engine the redirect store runs on.
///
/// A `false` result means the engine processed the call but did not apply it
/// (for example a conditional check failed or the record was missing).
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Inserts or overwrites a full record.
    async fn put(&self, table: &str, record: StorageRecord) -> Result<bool>;

    /// Runs a range query inside a single partition.
    async fn query(&self, table: &str, query: &Query) -> Result<QueryOutput>;

    /// Sets the attributes present in `changed` and deletes `removed`,
    /// leaving every other attribute untouched.
    async fn update(
        &self,
        table: &str,
        id: &RecordId,
        changed: StorageRecord,
        removed: &[StorageField],
    ) -> Result<bool>;

    /// Deletes a record. Returns `true` if it existed.
    async fn delete(&self, table: &str, id: &RecordId) -> Result<bool>;
}
