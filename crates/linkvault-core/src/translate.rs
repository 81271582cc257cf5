//! Translation between [`UrlRecord`]s and [`StorageRecord`]s.

use crate::error::{CoreError, Result};
use crate::record::{UrlRecord, UrlRecordPatch};
use crate::sort_key;
use crate::storage::StorageRecord;
use jiff::Timestamp;

/// Builds the sparse storage shape of a (possibly partial) record.
///
/// Only non-empty fields are emitted. The sort key is produced only when a key
/// is present, with a missing namespace treated as empty.
pub fn to_storage(patch: &UrlRecordPatch) -> StorageRecord {
    let mut record = StorageRecord::default();

    if let Some(domain) = non_empty(&patch.domain) {
        record.partition = Some(domain.to_owned());
    }
    if let Some(key) = non_empty(&patch.key) {
        let namespace_id = patch.namespace_id.as_deref().unwrap_or_default();
        record.sort_key = Some(sort_key::encode(key, namespace_id));
    }
    if let Some(namespace_id) = non_empty(&patch.namespace_id) {
        record.namespace_id = Some(namespace_id.to_owned());
    }
    if let Some(original_link) = non_empty(&patch.original_link) {
        record.original_link = Some(original_link.to_owned());
    }
    record.expiry = patch.link_expiry;
    record.time_of_expiry = patch.time_of_expiry.map(|ts| ts.as_second());
    record.time_of_creation = patch.time_of_creation.map(|ts| ts.as_second());
    record.supplementary_data = patch
        .supplementary_data
        .as_ref()
        .filter(|data| !data.is_empty())
        .cloned();

    record
}

/// Rebuilds a full [`UrlRecord`] from storage.
///
/// Missing strings become empty, missing optionals stay `None` and a missing
/// creation time becomes the unix epoch. Fails on a malformed sort key or an
/// out-of-range timestamp.
pub fn from_storage(record: &StorageRecord) -> Result<UrlRecord> {
    let (key, namespace_id) = match record.sort_key.as_deref() {
        Some(id) => sort_key::decode(id)?,
        None => (String::new(), String::new()),
    };

    let time_of_creation = record
        .time_of_creation
        .map(parse_timestamp)
        .transpose()?
        .unwrap_or(Timestamp::UNIX_EPOCH);

    Ok(UrlRecord {
        namespace_id,
        domain: record.partition.clone().unwrap_or_default(),
        key,
        original_link: record.original_link.clone().unwrap_or_default(),
        link_expiry: record.expiry,
        supplementary_data: record.supplementary_data.clone(),
        time_of_creation,
        time_of_expiry: record.time_of_expiry.map(parse_timestamp).transpose()?,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn parse_timestamp(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds)
        .map_err(|e| CoreError::InvalidRecord(format!("invalid timestamp '{seconds}': {e}")))
}
