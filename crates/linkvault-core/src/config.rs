use crate::error::{ConfigError, CoreError};
use crate::sort_key::DELIMITER;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use typed_builder::TypedBuilder;

pub const DEFAULT_KEY_CHARSET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";
pub const DEFAULT_KEY_MIN_LENGTH: usize = 6;
pub const DEFAULT_KEY_MAX_LENGTH: usize = 12;
pub const DEFAULT_KEY_LENGTH: usize = 6;
pub const DEFAULT_TABLE: &str = "url_redirect";
pub const DEFAULT_MAX_KEY_ATTEMPTS: u32 = 32;

/// Deployment settings shared by every component.
///
/// Built once at startup and never mutated; components hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Symbols keys are drawn from. Base-36 by default.
    #[builder(default = DEFAULT_KEY_CHARSET.to_string(), setter(into))]
    pub key_charset: String,
    #[builder(default = DEFAULT_KEY_MIN_LENGTH)]
    pub key_min_length: usize,
    #[builder(default = DEFAULT_KEY_MAX_LENGTH)]
    pub key_max_length: usize,
    /// Length of generated keys when the caller does not ask for one.
    #[builder(default = DEFAULT_KEY_LENGTH)]
    pub default_key_length: usize,
    /// Table (storage source) holding the records.
    #[builder(default = DEFAULT_TABLE.to_string(), setter(into))]
    pub table: String,
    /// Candidates tried before giving up on finding a free key.
    #[builder(default = DEFAULT_MAX_KEY_ATTEMPTS)]
    pub max_key_attempts: u32,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RedirectConfig {
    /// Checks that the settings are consistent with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_charset.is_empty() {
            return Err(ConfigError::EmptyCharset);
        }

        let mut seen = HashSet::new();
        for c in self.key_charset.chars() {
            if !c.is_ascii() || c == DELIMITER || !seen.insert(c) {
                return Err(ConfigError::InvalidCharset(c));
            }
        }

        let (min, default, max) = (
            self.key_min_length,
            self.default_key_length,
            self.key_max_length,
        );
        if min == 0 || min > default || default > max {
            return Err(ConfigError::InvalidLengths { min, default, max });
        }

        if self.max_key_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }

        if self.table.is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        Ok(())
    }

    /// Returns `true` if `c` is a valid key symbol.
    pub fn is_key_char(&self, c: char) -> bool {
        self.key_charset.contains(c)
    }

    /// Resolves the requested key length, falling back to the default.
    ///
    /// An explicit length must lie within `[key_min_length, key_max_length]`.
    pub fn key_length(&self, requested: Option<usize>) -> crate::error::Result<usize> {
        match requested.filter(|len| *len > 0) {
            None => Ok(self.default_key_length),
            Some(length) if (self.key_min_length..=self.key_max_length).contains(&length) => {
                Ok(length)
            }
            Some(length) => Err(CoreError::InvalidKeyLength {
                length,
                min: self.key_min_length,
                max: self.key_max_length,
            }),
        }
    }
}
