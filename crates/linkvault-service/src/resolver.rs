use crate::error::{RedirectError, Result};
use crate::lookup;
use linkvault_core::{RecordStore, RedirectConfig};
use linkvault_generator::KeyGenerator;
use std::sync::Arc;
use tracing::{debug, warn};

/// Finds a key that no namespace of a domain uses yet.
///
/// Candidates come from the generator and are checked against storage one at
/// a time, up to `max_key_attempts` of them. The check and the later write are
/// not atomic: two concurrent resolutions can settle on the same key.
pub struct UniqueKeyResolver<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    config: Arc<RedirectConfig>,
}

impl<S, G> Clone for UniqueKeyResolver<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RecordStore, G: KeyGenerator> UniqueKeyResolver<S, G> {
    pub fn new(store: Arc<S>, generator: Arc<G>, config: Arc<RedirectConfig>) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Generates candidates of `length` symbols until one is free in `domain`.
    ///
    /// A storage error aborts the resolution immediately; only a taken key
    /// leads to another attempt.
    pub async fn resolve(&self, domain: &str, length: usize) -> Result<String> {
        let attempts = self.config.max_key_attempts;

        for attempt in 1..=attempts {
            let candidate = self.generator.generate(length);

            if !lookup::key_exists(&*self.store, &self.config.table, domain, &candidate).await? {
                debug!(domain, key = %candidate, attempt, "resolved free key");
                return Ok(candidate);
            }

            debug!(domain, key = %candidate, attempt, "generated key already taken");
        }

        warn!(domain, length, attempts, "no free key found");
        Err(RedirectError::KeySpaceExhausted {
            domain: domain.to_owned(),
            attempts,
        })
    }
}
