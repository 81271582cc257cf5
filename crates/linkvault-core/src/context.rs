use crate::error::{CoreError, Result};
use jiff::Timestamp;

/// Per-request state passed through every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    time: Timestamp,
}

impl RequestContext {
    /// A context stamped with the current time.
    pub fn now() -> Self {
        Self::at(Timestamp::now())
    }

    /// A context stamped with a fixed time.
    pub fn at(time: Timestamp) -> Self {
        Self { time }
    }

    /// The time the request started.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// Absolute time `minutes` after the request time.
    pub fn expiry_after(&self, minutes: i64) -> Result<Timestamp> {
        if minutes < 0 {
            return Err(CoreError::InvalidExpiry(minutes));
        }
        minutes
            .checked_mul(60)
            .and_then(|seconds| self.time.as_second().checked_add(seconds))
            .and_then(|seconds| Timestamp::from_second(seconds).ok())
            .ok_or(CoreError::InvalidExpiry(minutes))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::now()
    }
}
