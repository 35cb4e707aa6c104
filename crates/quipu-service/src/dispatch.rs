//! Method dispatch.
//!
//! The dispatcher runs every request through the same gates, terminal
//! on the first failure: envelope validation, authentication, method
//! resolution, then the handler itself. Validation failures become
//! Invalid-Request errors carrying the validator's message;
//! authentication failures become a bare Forbidden; hard store failures
//! escape as internal errors for the transport boundary to sanitize.

use crate::auth::{check_auth, AuthConfig};
use crate::interests::get_interests;
use crate::score::{get_score, ADMIN_SCORE};
use quipu_core::{QuipuError, QuipuResult, RequestContext};
use quipu_schema::{ClientsInterestsRequest, MethodRequest, OnlineScoreRequest, Schema};
use quipu_store::{Store, StoreBackend};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

/// Method name for score lookups.
pub const METHOD_ONLINE_SCORE: &str = "online_score";

/// Method name for interests lookups.
pub const METHOD_CLIENTS_INTERESTS: &str = "clients_interests";

/// Routes validated envelopes to business methods.
///
/// The store is an explicitly injected dependency constructed at
/// startup and threaded through every call; the dispatcher itself is
/// stateless across requests.
pub struct Dispatcher<B> {
    store: Arc<Store<B>>,
    auth: AuthConfig,
}

impl<B: StoreBackend> Dispatcher<B> {
    /// Creates a dispatcher over the given store and auth secrets.
    #[must_use]
    pub fn new(store: Arc<Store<B>>, auth: AuthConfig) -> Self {
        Self { store, auth }
    }

    /// Returns the injected store.
    #[must_use]
    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    /// Processes one decoded request body.
    ///
    /// Returns the handler's result payload, or the first gate's error.
    pub async fn dispatch(&self, body: &Value, ctx: &mut RequestContext) -> QuipuResult<Value> {
        // A non-object body yields an empty argument mapping, which the
        // envelope schema rejects deterministically on its first
        // required field.
        let raw = body.as_object().cloned().unwrap_or_default();

        let envelope = MethodRequest::from_args(&raw);
        envelope
            .validate()
            .map_err(|err| QuipuError::validation(err.to_string()))?;

        if !check_auth(&self.auth, &envelope) {
            info!(request_id = %ctx.request_id(), login = envelope.login(), "authentication failed");
            return Err(QuipuError::Forbidden);
        }

        let arguments = envelope.arguments();
        match envelope.method() {
            METHOD_ONLINE_SCORE => self.online_score(&envelope, &arguments, ctx).await,
            METHOD_CLIENTS_INTERESTS => self.clients_interests(&arguments, ctx).await,
            _ => Err(QuipuError::UnknownMethod),
        }
    }

    /// Handles `online_score`.
    ///
    /// The admin identity short-circuits to a fixed score without
    /// touching the store, which keeps privileged diagnostic calls
    /// distinguishable from real scoring in store metrics.
    async fn online_score(
        &self,
        envelope: &MethodRequest,
        arguments: &Map<String, Value>,
        ctx: &mut RequestContext,
    ) -> QuipuResult<Value> {
        let request = OnlineScoreRequest::from_args(arguments);
        request
            .validate()
            .map_err(|err| QuipuError::validation(err.to_string()))?;

        ctx.set_has(arguments.keys().cloned().collect());

        if self.auth.is_admin(envelope) {
            return Ok(json!({ "score": ADMIN_SCORE }));
        }

        let score = get_score(&self.store, &request).await;
        Ok(json!({ "score": score }))
    }

    /// Handles `clients_interests`.
    async fn clients_interests(
        &self,
        arguments: &Map<String, Value>,
        ctx: &mut RequestContext,
    ) -> QuipuResult<Value> {
        let request = ClientsInterestsRequest::from_args(arguments);
        request
            .validate()
            .map_err(|err| QuipuError::validation(err.to_string()))?;

        let client_ids = request.client_ids();
        ctx.set_nclients(client_ids.len());

        let mut response = Map::new();
        for client_id in client_ids {
            let interests = get_interests(&self.store, client_id)
                .await
                .map_err(|err| QuipuError::internal_with_source("interests lookup failed", err))?;
            response.insert(client_id.to_string(), interests);
        }
        Ok(Value::Object(response))
    }
}
