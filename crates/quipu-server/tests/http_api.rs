//! End-to-end tests over the wire contract, using the in-memory store
//! backend so no external services are needed.

use http::{HeaderMap, HeaderValue, Method, StatusCode};
use quipu_server::service::{respond, REQUEST_ID_HEADER};
use quipu_service::{valid_token, AuthConfig, Dispatcher};
use quipu_store::{MemoryBackend, RetryPolicy, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn dispatcher() -> Arc<Dispatcher<MemoryBackend>> {
    let store = Arc::new(Store::new(
        MemoryBackend::new(),
        RetryPolicy {
            attempts: 1,
            delay: Duration::ZERO,
        },
    ));
    Arc::new(Dispatcher::new(store, AuthConfig::default()))
}

fn signed(method: &str, arguments: Value) -> Value {
    let auth = AuthConfig::default();
    json!({
        "account": "horns&hoofs",
        "login": "h&f",
        "token": valid_token(&auth, "horns&hoofs", "h&f"),
        "method": method,
        "arguments": arguments,
    })
}

async fn post(dispatcher: &Arc<Dispatcher<MemoryBackend>>, body: &Value) -> (StatusCode, Value) {
    let bytes = serde_json::to_vec(body).unwrap();
    respond(
        dispatcher,
        &Method::POST,
        "/method",
        &HeaderMap::new(),
        &bytes,
    )
    .await
}

#[tokio::test]
async fn test_unrouted_path_is_not_found() {
    let dispatcher = dispatcher();
    let (status, payload) = respond(
        &dispatcher,
        &Method::POST,
        "/other",
        &HeaderMap::new(),
        b"{}",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["error"], "Not Found");
    assert_eq!(payload["code"], 404);
}

#[tokio::test]
async fn test_get_is_not_routed() {
    let dispatcher = dispatcher();
    let (status, _) = respond(
        &dispatcher,
        &Method::GET,
        "/method",
        &HeaderMap::new(),
        b"{}",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash_is_routed() {
    let dispatcher = dispatcher();
    let body = signed("online_score", json!({"phone": "79175002040", "email": "a@b.ru"}));
    let bytes = serde_json::to_vec(&body).unwrap();
    let (status, _) = respond(
        &dispatcher,
        &Method::POST,
        "/method/",
        &HeaderMap::new(),
        &bytes,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let dispatcher = dispatcher();
    let (status, payload) = respond(
        &dispatcher,
        &Method::POST,
        "/method",
        &HeaderMap::new(),
        b"{not json",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // Decoder detail stays in the logs.
    assert_eq!(payload["error"], "Bad Request");
    assert_eq!(payload["code"], 400);
}

#[tokio::test]
async fn test_empty_envelope_is_invalid_request() {
    let dispatcher = dispatcher();
    let (status, payload) = post(&dispatcher, &json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["error"], "login -> This field is required");
    assert_eq!(payload["code"], 422);
}

#[tokio::test]
async fn test_bad_token_is_forbidden() {
    let dispatcher = dispatcher();
    let mut body = signed("online_score", json!({"phone": "79175002040", "email": "a@b.ru"}));
    body["token"] = json!("wrong");
    let (status, payload) = post(&dispatcher, &body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(payload["error"], "Forbidden");
}

#[tokio::test]
async fn test_unknown_method_is_invalid_request() {
    let dispatcher = dispatcher();
    let (status, payload) = post(&dispatcher, &signed("no_such_method", json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["error"], "Unknown method");
}

#[tokio::test]
async fn test_online_score_responds_with_envelope() {
    let dispatcher = dispatcher();
    let body = signed("online_score", json!({"phone": "79175002040", "email": "a@b.ru"}));
    let (status, payload) = post(&dispatcher, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["code"], 200);
    assert!((payload["response"]["score"].as_f64().unwrap() - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_admin_score_is_fixed() {
    let dispatcher = dispatcher();
    let auth = AuthConfig::default();
    let body = json!({
        "account": "",
        "login": "admin",
        "token": valid_token(&auth, "", "admin"),
        "method": "online_score",
        "arguments": {"phone": "79175002040", "email": "a@b.ru"},
    });
    let (status, payload) = post(&dispatcher, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert!((payload["response"]["score"].as_f64().unwrap() - 42.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_clients_interests_reads_the_store() {
    let dispatcher = dispatcher();
    dispatcher
        .store()
        .backend()
        .seed("i:1", br#"["books"]"#.to_vec());
    dispatcher
        .store()
        .backend()
        .seed("i:2", br#"["travel", "pets"]"#.to_vec());

    let body = signed("clients_interests", json!({"client_ids": [1, 2, 3]}));
    let (status, payload) = post(&dispatcher, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        payload["response"],
        json!({"1": ["books"], "2": ["travel", "pets"], "3": []})
    );
}

#[tokio::test]
async fn test_store_outage_is_internal_error() {
    let dispatcher = dispatcher();
    dispatcher.store().backend().set_failing(true);

    let body = signed("clients_interests", json!({"client_ids": [1]}));
    let (status, payload) = post(&dispatcher, &body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_validation_message_reaches_the_caller() {
    let dispatcher = dispatcher();
    let body = signed("online_score", json!({"phone": "123", "email": "a@b.ru"}));
    let (status, payload) = post(&dispatcher, &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["error"], "phone -> Must contain 11 symbols");
}

#[tokio::test]
async fn test_request_id_header_does_not_change_the_response() {
    let dispatcher = dispatcher();
    let body = signed("online_score", json!({"phone": "79175002040", "email": "a@b.ru"}));
    let bytes = serde_json::to_vec(&body).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("trace-42"));
    let (with_header, payload_a) =
        respond(&dispatcher, &Method::POST, "/method", &headers, &bytes).await;
    let (without_header, payload_b) = respond(
        &dispatcher,
        &Method::POST,
        "/method",
        &HeaderMap::new(),
        &bytes,
    )
    .await;

    assert_eq!(with_header, StatusCode::OK);
    assert_eq!(without_header, StatusCode::OK);
    assert_eq!(payload_a, payload_b);
}
