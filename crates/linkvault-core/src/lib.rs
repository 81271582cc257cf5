//! Core types and traits for the linkvault redirect store.
//!
//! This crate holds the URL record model, the composite sort key codec, the
//! storage collaborator contract and the translation between the two record
//! shapes. It is shared by the generator, storage and service crates.

pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod record;
pub mod sort_key;
pub mod storage;
pub mod translate;

pub use config::RedirectConfig;
pub use context::RequestContext;
pub use error::{ConfigError, CoreError, StorageError};
pub use record::{SupplementaryData, UrlRecord, UrlRecordPatch};
pub use storage::{
    Query, QueryOutput, RecordId, RecordStore, SortCondition, SortOperator, StorageField,
    StorageRecord,
};
