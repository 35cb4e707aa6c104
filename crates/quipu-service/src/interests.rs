//! Client interests lookup.
//!
//! Interests have no computed fallback, so lookups go through the hard
//! store layer: a missing key legitimately means "no data" and reads as
//! an empty list, while a store outage propagates to the caller as a
//! failure.

use quipu_store::{Store, StoreBackend, StoreError};
use serde_json::Value;

/// Fetches the interests stored for one client id.
pub async fn get_interests<B: StoreBackend>(
    store: &Store<B>,
    client_id: i64,
) -> Result<Value, StoreError> {
    let key = format!("i:{client_id}");
    match store.get(&key).await? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|err| StoreError::Protocol(format!("undecodable interests for {key}: {err}"))),
        None => Ok(Value::Array(Vec::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quipu_store::{MemoryBackend, RetryPolicy};
    use serde_json::json;
    use std::time::Duration;

    fn store() -> Store<MemoryBackend> {
        Store::new(
            MemoryBackend::new(),
            RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
        )
    }

    #[tokio::test]
    async fn test_stored_document_is_decoded() {
        let store = store();
        store.backend().seed("i:1", br#"["books", "hi-tech"]"#.to_vec());

        let interests = get_interests(&store, 1).await.unwrap();
        assert_eq!(interests, json!(["books", "hi-tech"]));
    }

    #[tokio::test]
    async fn test_missing_client_reads_as_empty_list() {
        let store = store();
        let interests = get_interests(&store, 404).await.unwrap();
        assert_eq!(interests, json!([]));
    }

    #[tokio::test]
    async fn test_outage_propagates() {
        let store = store();
        store.backend().set_failing(true);
        assert!(get_interests(&store, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_an_error() {
        let store = store();
        store.backend().seed("i:1", b"not json".to_vec());
        assert!(get_interests(&store, 1).await.is_err());
    }
}
