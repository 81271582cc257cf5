use crate::KeyGenerator;
use linkvault_core::config::DEFAULT_KEY_CHARSET;
use linkvault_core::ConfigError;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic generator producing consecutive keys.
///
/// The counter is written in the charset's base and left-padded with the
/// first symbol, so the default charset yields "000000", "000001", ... When
/// the counter needs more symbols than requested only the lowest ones are
/// kept, which makes keys repeat.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    charset: Vec<char>,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            charset: self.charset.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a generator over the given symbols, starting at zero.
    pub fn new(charset: &str) -> Result<Self, ConfigError> {
        Self::with_offset(charset, 0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(charset: &str, offset: u64) -> Result<Self, ConfigError> {
        let charset: Vec<char> = charset.chars().collect();
        if charset.is_empty() {
            return Err(ConfigError::EmptyCharset);
        }
        Ok(Self {
            counter: AtomicU64::new(offset),
            charset,
        })
    }

    fn encode(&self, mut value: u64, length: usize) -> String {
        let base = self.charset.len() as u64;
        let mut symbols = vec![self.charset[0]; length];
        for slot in symbols.iter_mut().rev() {
            if base == 1 || value == 0 {
                break;
            }
            *slot = self.charset[(value % base) as usize];
            value /= base;
        }
        symbols.into_iter().collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self {
            counter: AtomicU64::new(0),
            charset: DEFAULT_KEY_CHARSET.chars().collect(),
        }
    }
}

impl KeyGenerator for SeqGenerator {
    fn generate(&self, length: usize) -> String {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        self.encode(count, length)
    }
}
