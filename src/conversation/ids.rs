//! Monotonic identifiers derived from the creation instant

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Hands out millisecond timestamps that strictly increase, even when two
/// values are requested within the same millisecond.
#[derive(Debug, Default)]
pub struct IdSource {
    last: AtomicI64,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Next message id
    pub fn message_id(&self) -> String {
        self.next().to_string()
    }

    /// Fresh token with a prefix, e.g. `feature_1747158464085`
    pub fn token(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.next())
    }
}
