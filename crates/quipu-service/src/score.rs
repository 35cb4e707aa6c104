//! Scoring heuristics with best-effort memoization.
//!
//! Scoring is a deterministic function of the supplied fields, so the
//! result is cached under a digest of the field combination. The cache
//! is strictly an optimization: all store traffic goes through the soft
//! layer, and an outage simply means the score is recomputed.

use quipu_schema::OnlineScoreRequest;
use quipu_store::{Store, StoreBackend};
use sha2::{Digest, Sha512};
use std::time::Duration;
use tracing::debug;

/// Fixed score returned to the admin identity without computation.
pub const ADMIN_SCORE: f64 = 42.0;

/// How long computed scores stay cached.
const SCORE_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache key for a field combination.
///
/// Every contributing field participates, in a fixed order with an
/// explicit separator, so the key does not depend on which fields the
/// caller happened to send or in what order they were evaluated.
fn score_key(request: &OnlineScoreRequest) -> String {
    let parts = [
        request.first_name().unwrap_or_default().to_string(),
        request.last_name().unwrap_or_default().to_string(),
        request.phone().unwrap_or_default(),
        request
            .birthday()
            .map(|d| d.format("%Y%m%d").to_string())
            .unwrap_or_default(),
        request.gender().map(|g| g.to_string()).unwrap_or_default(),
        request.email().unwrap_or_default().to_string(),
    ];
    let digest = Sha512::digest(parts.join("|").as_bytes());
    format!("uid:{}", hex::encode(digest))
}

/// Computes the score from the supplied field combination.
fn compute_score(request: &OnlineScoreRequest) -> f64 {
    let mut score = 0.0;
    if request.phone().is_some() {
        score += 1.5;
    }
    if request.email().is_some() {
        score += 1.5;
    }
    // Gender 0 ("unknown") does not contribute.
    if request.birthday().is_some() && request.gender().unwrap_or(0) != 0 {
        score += 1.5;
    }
    if request.first_name().is_some() && request.last_name().is_some() {
        score += 0.5;
    }
    score
}

/// Returns the score for a validated request, memoized via the soft
/// cache layer.
pub async fn get_score<B: StoreBackend>(store: &Store<B>, request: &OnlineScoreRequest) -> f64 {
    let key = score_key(request);

    if let Some(cached) = store.cache_get(&key).await {
        if let Some(score) = std::str::from_utf8(&cached)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
        {
            debug!(key, score, "score served from cache");
            return score;
        }
        debug!(key, "cached score unreadable, recomputing");
    }

    let score = compute_score(request);
    store
        .cache_set(&key, score.to_string().as_bytes(), SCORE_TTL)
        .await;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use quipu_schema::Schema;
    use quipu_store::{MemoryBackend, RetryPolicy};
    use serde_json::{json, Value};

    fn request(args: Value) -> OnlineScoreRequest {
        let request = OnlineScoreRequest::from_args(args.as_object().unwrap());
        request.validate().expect("test arguments should be valid");
        request
    }

    fn store() -> Store<MemoryBackend> {
        Store::new(
            MemoryBackend::new(),
            RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
        )
    }

    #[test]
    fn test_all_fields_score_five() {
        let request = request(json!({
            "phone": "79175002040",
            "email": "stupnikov@otus.ru",
            "first_name": "Stanislav",
            "last_name": "Stupnikov",
            "birthday": "01.01.1990",
            "gender": 1,
        }));
        assert!((compute_score(&request) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_phone_email_pair_scores_three() {
        let request = request(json!({
            "phone": "79175002040",
            "email": "a@b.ru",
        }));
        assert!((compute_score(&request) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_gender_does_not_contribute() {
        let request = request(json!({
            "gender": 0,
            "birthday": "01.01.1990",
        }));
        assert!(compute_score(&request).abs() < f64::EPSILON);
    }

    #[test]
    fn test_key_ignores_field_arrival_order() {
        let a = request(json!({"phone": "79175002040", "email": "a@b.ru"}));
        let b = request(json!({"email": "a@b.ru", "phone": "79175002040"}));
        assert_eq!(score_key(&a), score_key(&b));
    }

    #[test]
    fn test_key_distinguishes_different_combinations() {
        let a = request(json!({"phone": "79175002040", "email": "a@b.ru"}));
        let b = request(json!({"phone": "79175002040", "email": "c@d.ru"}));
        assert_ne!(score_key(&a), score_key(&b));
    }

    #[tokio::test]
    async fn test_score_is_memoized() {
        let store = store();
        let request = request(json!({"phone": "79175002040", "email": "a@b.ru"}));

        let first = get_score(&store, &request).await;
        let second = get_score(&store, &request).await;
        assert!((first - second).abs() < f64::EPSILON);
        // First call misses and writes; second call hits and must not
        // write again.
        assert_eq!(store.backend().set_calls(), 1);
    }

    #[tokio::test]
    async fn test_store_outage_falls_back_to_computation() {
        let store = store();
        store.backend().set_failing(true);
        let request = request(json!({"phone": "79175002040", "email": "a@b.ru"}));

        let score = get_score(&store, &request).await;
        assert!((score - 3.0).abs() < f64::EPSILON);
    }
}
