use thiserror::Error;

/// Errors related to the core data model of the redirect store.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("malformed sort key: {0}")]
    MalformedSortKey(String),
    #[error("sort key part must not contain '{delimiter}': '{part}'")]
    InvalidSortKeyPart { part: String, delimiter: char },
    #[error("stored record is invalid: {0}")]
    InvalidRecord(String),
    #[error("invalid expiry of {0} minutes")]
    InvalidExpiry(i64),
    #[error("key length {length} outside of [{min}, {max}]")]
    InvalidKeyLength {
        length: usize,
        min: usize,
        max: usize,
    },
}

/// Failures surfaced by a storage collaborator.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("key charset must not be empty")]
    EmptyCharset,
    #[error("key charset must be ascii without duplicates or '{0}'")]
    InvalidCharset(char),
    #[error("key lengths must satisfy 0 < min ({min}) <= default ({default}) <= max ({max})")]
    InvalidLengths {
        min: usize,
        default: usize,
        max: usize,
    },
    #[error("max key attempts must be at least 1")]
    ZeroAttempts,
    #[error("table name must not be empty")]
    EmptyTable,
}
