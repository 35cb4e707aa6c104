//! HTTP transport adapter.
//!
//! Everything protocol-specific lives here: routing the single method
//! endpoint, decoding the body, correlation ids, the response envelope,
//! and the audit log line. The dispatcher underneath never sees HTTP.
//!
//! Each dispatch runs in its own task so a panicking handler takes down
//! one request, not the connection loop; the join error surfaces as a
//! generic internal failure.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use quipu_core::{QuipuError, RequestContext, RequestId};
use quipu_service::Dispatcher;
use quipu_store::StoreBackend;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The single routed path.
pub const METHOD_PATH: &str = "method";

/// Correlation header honored on incoming requests.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extracts the correlation token from the headers, or generates one.
fn request_id_from(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .map(RequestId::from_header)
        .unwrap_or_else(RequestId::generate)
}

/// Produces the status and JSON payload for one raw request.
///
/// This is the whole wire contract in one place: anything that is not a
/// POST to `/method` is Not Found, an undecodable body is Bad Request,
/// and everything else is the dispatcher's verdict wrapped in the
/// `{"response"| "error", "code"}` envelope.
pub async fn respond<B>(
    dispatcher: &Arc<Dispatcher<B>>,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> (StatusCode, Value)
where
    B: StoreBackend + 'static,
{
    let request_id = request_id_from(headers);

    if method != Method::POST || path.trim_matches('/') != METHOD_PATH {
        let err = QuipuError::NotFound;
        info!(request_id = %request_id, %method, path, "unrouted request");
        return (err.status_code(), err.to_envelope());
    }

    let body: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(decode_err) => {
            let err = QuipuError::malformed_body(decode_err.to_string());
            warn!(request_id = %request_id, error = %err, "undecodable request body");
            return (err.status_code(), err.to_envelope());
        }
    };

    let task = tokio::spawn({
        let dispatcher = Arc::clone(dispatcher);
        let request_id = request_id.clone();
        async move {
            let mut ctx = RequestContext::with_request_id(request_id);
            let result = dispatcher.dispatch(&body, &mut ctx).await;
            (result, ctx)
        }
    });

    match task.await {
        Ok((Ok(payload), ctx)) => {
            info!(
                request_id = %ctx.request_id(),
                has = ?ctx.has(),
                nclients = ctx.nclients(),
                "request succeeded"
            );
            (
                StatusCode::OK,
                json!({ "response": payload, "code": StatusCode::OK.as_u16() }),
            )
        }
        Ok((Err(err), ctx)) => {
            // Full detail goes to the log; the caller only ever sees
            // the sanitized envelope.
            warn!(
                request_id = %ctx.request_id(),
                error = %err,
                code = err.status_code().as_u16(),
                "request failed"
            );
            (err.status_code(), err.to_envelope())
        }
        Err(join_err) => {
            let err = QuipuError::internal(format!("handler task failed: {join_err}"));
            error!(request_id = %request_id, error = %err, "handler task failed");
            (err.status_code(), err.to_envelope())
        }
    }
}

/// Serializes a payload into an HTTP response.
fn json_response(status: StatusCode, payload: &Value) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(payload).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// hyper entry point for one request.
pub async fn handle<B>(
    dispatcher: Arc<Dispatcher<B>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: StoreBackend + 'static,
{
    let (parts, body) = req.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(read_err) => {
            let err = QuipuError::internal(format!("body read failed: {read_err}"));
            error!(error = %err, "failed to read request body");
            return Ok(json_response(err.status_code(), &err.to_envelope()));
        }
    };

    let (status, payload) = respond(
        &dispatcher,
        &parts.method,
        parts.uri.path(),
        &parts.headers,
        &bytes,
    )
    .await;
    Ok(json_response(status, &payload))
}
