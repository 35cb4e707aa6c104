//! Request context types.
//!
//! The [`RequestContext`] carries all per-request state from the
//! transport adapter through the dispatcher and into handlers. It is
//! created fresh per request and never shared between requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque correlation token attached to every request.
///
/// When the caller supplies an `X-Request-Id` header the token is taken
/// verbatim; otherwise a UUID v7 is generated. UUID v7 is time-ordered,
/// which makes generated ids convenient for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a new unique request ID using UUID v7.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Wraps a caller-supplied correlation token.
    #[must_use]
    pub fn from_header(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request context flowing through the dispatcher.
///
/// Besides the correlation token, handlers record audit fields here:
/// `online_score` notes which argument keys the caller supplied and
/// `clients_interests` notes how many client ids it processed. These
/// fields are logged alongside the response and never returned to the
/// caller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation token for this request.
    request_id: RequestId,

    /// Argument keys present in the raw `online_score` input.
    has: Option<Vec<String>>,

    /// Number of client ids processed by `clients_interests`.
    nclients: Option<usize>,
}

impl RequestContext {
    /// Creates a new context with a freshly generated request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::generate())
    }

    /// Creates a new context with the specified request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            has: None,
            nclients: None,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Records which argument keys were present in the raw input.
    pub fn set_has(&mut self, fields: Vec<String>) {
        self.has = Some(fields);
    }

    /// Returns the recorded argument keys, if any.
    #[must_use]
    pub fn has(&self) -> Option<&[String]> {
        self.has.as_deref()
    }

    /// Records the number of client ids processed.
    pub fn set_nclients(&mut self, count: usize) {
        self.nclients = Some(count);
    }

    /// Returns the recorded client-id count, if any.
    #[must_use]
    pub fn nclients(&self) -> Option<usize> {
        self.nclients
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();
        assert_ne!(id1, id2, "Each generated RequestId should be unique");
    }

    #[test]
    fn test_header_token_is_kept_verbatim() {
        let id = RequestId::from_header("trace-abc-123");
        assert_eq!(id.as_str(), "trace-abc-123");
        assert_eq!(id.to_string(), "trace-abc-123");
    }

    #[test]
    fn test_context_starts_without_audit_fields() {
        let ctx = RequestContext::new();
        assert!(ctx.has().is_none());
        assert!(ctx.nclients().is_none());
    }

    #[test]
    fn test_context_records_audit_fields() {
        let mut ctx = RequestContext::new();
        ctx.set_has(vec!["phone".to_string(), "email".to_string()]);
        ctx.set_nclients(4);

        assert_eq!(ctx.has(), Some(&["phone".to_string(), "email".to_string()][..]));
        assert_eq!(ctx.nclients(), Some(4));
    }

    #[test]
    fn test_request_id_serialization_is_transparent() {
        let id = RequestId::from_header("req-1");
        let json = serde_json::to_string(&id).expect("serialization should work");
        assert_eq!(json, "\"req-1\"");
    }
}
