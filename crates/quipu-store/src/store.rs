//! Hard and soft store layers.
//!
//! The hard layer ([`Store::get`] / [`Store::set`]) retries transient
//! failures a bounded number of times with a fixed delay and then
//! propagates the last attempt's outcome, so a cache miss stays
//! distinguishable from a store outage.
//!
//! The soft layer ([`Store::cache_get`] / [`Store::cache_set`]) wraps
//! the hard layer and absorbs every failure into a miss or a no-op.
//! Business logic with a computed fallback (scoring) uses the soft
//! layer; lookups whose values have no fallback (interests) use the
//! hard layer.

use crate::backend::{StoreBackend, StoreError};
use crate::config::StoreConfig;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded retry policy for hard-layer operations.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first try. Always at least 1.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Extracts the retry policy from a store configuration.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            attempts: config.retry_attempts().max(1),
            delay: config.retry_delay(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

/// Key/value store client with retry and degradation policies.
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: StoreBackend> Store<B> {
    /// Creates a store over the given backend with the given policy.
    #[must_use]
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Creates a store with the default retry policy.
    #[must_use]
    pub fn with_defaults(backend: B) -> Self {
        Self::new(backend, RetryPolicy::default())
    }

    /// Returns the underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs an operation under the retry policy.
    ///
    /// An explicit loop with a bounded counter: every attempt but the
    /// last sleeps and retries on failure; the last attempt's outcome
    /// is returned as-is.
    async fn retrying<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.policy.attempts => {
                    warn!(
                        operation = what,
                        attempt,
                        error = %err,
                        "store operation failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Hard get: retries, then propagates the final failure.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.retrying("get", || self.backend.get(key)).await
    }

    /// Hard set: retries, then propagates the final failure.
    pub async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        self.retrying("set", || self.backend.set(key, value, ttl))
            .await
    }

    /// Soft get: a store failure is logged and reads as a miss.
    pub async fn cache_get(&self, key: &str) -> Option<Vec<u8>> {
        match self.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Soft set: a store failure is logged and dropped.
    ///
    /// Best-effort by design; callers get no success signal.
    pub async fn cache_set(&self, key: &str, value: &[u8], ttl: Duration) {
        if let Err(err) = self.set(key, value, ttl).await {
            warn!(key, error = %err, "cache write failed, dropping value");
        }
    }
}
