use super::*;
use crate::config::{ApiTimeouts, DEFAULT_USER_PATH};
use crate::error::ErrorCode;
use crate::test_helpers::{CountingTokens, spawn_backend};
use axum::Router;
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::routing::get;
use std::sync::Arc;

// =============================================================================
// parse_user_record
// =============================================================================

#[test]
fn parse_minimal_record() {
    let user = parse_user_record(r#"{"id":1,"email":"a@x.com"}"#).unwrap().unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.name, None);
}

#[test]
fn parse_full_backend_record() {
    let body = r#"{
        "id": 7,
        "firebase_uid": "123",
        "email": "alice@example.com",
        "name": "Alice Johnson",
        "created_at": "2025-01-02T03:04:05.678901"
    }"#;
    let user = parse_user_record(body).unwrap().unwrap();
    assert_eq!(user.firebase_uid.as_deref(), Some("123"));
    assert_eq!(user.name.as_deref(), Some("Alice Johnson"));
    assert_eq!(user.created_at.as_deref(), Some("2025-01-02T03:04:05.678901"));
}

#[test]
fn parse_null_is_absent_user() {
    assert_eq!(parse_user_record("null").unwrap(), None);
}

#[test]
fn parse_malformed_payload_errors() {
    let err = parse_user_record(r#"{"id":"one"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn parse_html_error_page_errors() {
    assert!(parse_user_record("<html>oops</html>").is_err());
}

// =============================================================================
// BackendUsers
// =============================================================================

async fn users_backend() -> String {
    let router = Router::new().route(
        "/users/firebase-uid/{uid}",
        get(|Path(uid): Path<String>, headers: HeaderMap| async move {
            let authorized = headers.get("authorization").is_some();
            match (uid.as_str(), authorized) {
                (_, false) => "null".to_string(),
                ("123", true) => r#"{"id":1,"email":"a@x.com","firebase_uid":"123"}"#.to_string(),
                ("broken", true) => r#"{"unexpected":true}"#.to_string(),
                _ => "null".to_string(),
            }
        }),
    );
    spawn_backend(router).await
}

#[tokio::test]
async fn fetch_user_resolves_record() {
    let base = users_backend().await;
    let api = ApiClient::new(base, Arc::new(CountingTokens::default()), ApiTimeouts::default()).unwrap();
    let users = BackendUsers::new(api, DEFAULT_USER_PATH);

    let user = users.fetch_user("123").await.unwrap().unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.email, "a@x.com");
}

#[tokio::test]
async fn fetch_user_unknown_identity_is_none() {
    let base = users_backend().await;
    let api = ApiClient::new(base, Arc::new(CountingTokens::default()), ApiTimeouts::default()).unwrap();
    let users = BackendUsers::new(api, DEFAULT_USER_PATH);

    assert_eq!(users.fetch_user("999").await.unwrap(), None);
}

#[tokio::test]
async fn fetch_user_bad_payload_is_parse_error() {
    let base = users_backend().await;
    let api = ApiClient::new(base, Arc::new(CountingTokens::default()), ApiTimeouts::default()).unwrap();
    let users = BackendUsers::new(api, DEFAULT_USER_PATH);

    let err = users.fetch_user("broken").await.unwrap_err();
    assert_eq!(err.error_code(), "E_API_PARSE");
}

#[test]
fn path_for_substitutes_encoded_uid() {
    let api = ApiClient::new("http://api.test", Arc::new(CountingTokens::default()), ApiTimeouts::default()).unwrap();
    let users = BackendUsers::new(api, "/v2/users/{uid}/profile");
    assert_eq!(users.path_for("a b"), "/v2/users/a%20b/profile");
}

#[test]
fn path_for_escapes_reserved_characters() {
    let api = ApiClient::new("http://api.test", Arc::new(CountingTokens::default()), ApiTimeouts::default()).unwrap();
    let users = BackendUsers::new(api, DEFAULT_USER_PATH);
    assert_eq!(users.path_for("aZ09-._~"), "/users/firebase-uid/aZ09-._~");
    assert_eq!(users.path_for("a/b c?"), "/users/firebase-uid/a%2Fb%20c%3F");
}
