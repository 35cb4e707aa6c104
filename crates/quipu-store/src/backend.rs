//! Store backend trait and error type.
//!
//! A backend is the raw transport: one `get`/`set` round trip with no
//! retry or degradation policy. Policies live in [`crate::Store`].

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Transport-level store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Socket-level failure (connect, read, or write).
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation did not complete within the socket timeout.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The server replied with something the protocol does not allow.
    #[error("store protocol error: {0}")]
    Protocol(String),
}

/// A key/value store transport.
///
/// Implementations must be safe to share across concurrent requests;
/// the connection handle is the one long-lived shared resource in the
/// service.
pub trait StoreBackend: Send + Sync {
    /// Fetches the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Stores `value` under `key` with the given time-to-live.
    fn set(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
