pub mod seq;

use linkvault_core::config::DEFAULT_KEY_CHARSET;
use linkvault_core::{ConfigError, RedirectConfig};
use rand::Rng;

/// Trait for generating candidate keys.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness is checked by the caller.
pub trait KeyGenerator: Send + Sync + 'static {
    /// Generates a key of exactly `length` symbols.
    fn generate(&self, length: usize) -> String;
}

/// Draws every symbol independently and uniformly from a charset.
///
/// Backed by the thread-local CSPRNG, which is periodically reseeded from
/// the operating system.
#[derive(Debug, Clone)]
pub struct RandomKeyGenerator {
    charset: Vec<char>,
}

impl RandomKeyGenerator {
    /// Creates a generator over the given symbols.
    pub fn new(charset: &str) -> Result<Self, ConfigError> {
        let charset: Vec<char> = charset.chars().collect();
        if charset.is_empty() {
            return Err(ConfigError::EmptyCharset);
        }
        Ok(Self { charset })
    }

    /// Creates a generator over the configured key charset.
    pub fn from_config(config: &RedirectConfig) -> Result<Self, ConfigError> {
        Self::new(&config.key_charset)
    }

    pub fn charset(&self) -> &[char] {
        &self.charset
    }
}

impl Default for RandomKeyGenerator {
    fn default() -> Self {
        Self {
            charset: DEFAULT_KEY_CHARSET.chars().collect(),
        }
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::rng();
        (0..length)
            .map(|_| self.charset[rng.random_range(0..self.charset.len())])
            .collect()
    }
}
