use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Caller supplied payload stored next to a URL, never interpreted here.
pub type SupplementaryData = serde_json::Map<String, serde_json::Value>;

/// A short URL as seen by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Tenant or brand scope the key belongs to.
    pub namespace_id: String,
    /// Partition the record is stored under.
    pub domain: String,
    /// Short key, unique within `(domain, namespace_id)`.
    pub key: String,
    /// Target URL.
    pub original_link: String,
    /// Expiry in minutes, as requested at creation or update time.
    pub link_expiry: Option<i64>,
    pub supplementary_data: Option<SupplementaryData>,
    pub time_of_creation: Timestamp,
    /// Absolute expiry. Advisory only: nothing in this crate evicts records.
    pub time_of_expiry: Option<Timestamp>,
}

impl UrlRecord {
    /// Returns `true` once `now` is past the record's expiry.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.time_of_expiry.is_some_and(|expiry| now > expiry)
    }

    /// Converts the record into a patch carrying every field.
    pub fn to_patch(&self) -> UrlRecordPatch {
        UrlRecordPatch {
            namespace_id: Some(self.namespace_id.clone()),
            domain: Some(self.domain.clone()),
            key: Some(self.key.clone()),
            original_link: Some(self.original_link.clone()),
            link_expiry: self.link_expiry,
            supplementary_data: self.supplementary_data.clone(),
            time_of_creation: Some(self.time_of_creation),
            time_of_expiry: self.time_of_expiry,
        }
    }
}

/// A partial [`UrlRecord`]; `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlRecordPatch {
    pub namespace_id: Option<String>,
    pub domain: Option<String>,
    pub key: Option<String>,
    pub original_link: Option<String>,
    pub link_expiry: Option<i64>,
    pub supplementary_data: Option<SupplementaryData>,
    pub time_of_creation: Option<Timestamp>,
    pub time_of_expiry: Option<Timestamp>,
}
