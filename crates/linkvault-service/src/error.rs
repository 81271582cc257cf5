use linkvault_core::{ConfigError, CoreError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectError>;

#[derive(Debug, Clone, Error)]
pub enum RedirectError {
    /// The storage collaborator failed; passed through unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// The storage engine answered but did not apply the write.
    #[error("Failed to write into Url-Redirect database")]
    WriteFailed,
    #[error("no free key in domain '{domain}' after {attempts} attempts")]
    KeySpaceExhausted { domain: String, attempts: u32 },
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl RedirectError {
    /// Stable machine readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            RedirectError::Storage(_) => "DATABASE_UNAVAILABLE",
            RedirectError::WriteFailed => "DATABASE_WRITE_FAILED",
            RedirectError::KeySpaceExhausted { .. } => "KEY_SPACE_EXHAUSTED",
            RedirectError::Core(CoreError::InvalidRecord(_) | CoreError::MalformedSortKey(_)) => {
                "INVALID_RECORD"
            }
            RedirectError::Core(_) => "INVALID_INPUT",
            RedirectError::Config(_) => "INVALID_CONFIG",
        }
    }
}
