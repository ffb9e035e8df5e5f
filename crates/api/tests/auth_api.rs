//! HTTP-level tests for authentication and argument validation.
//!
//! Every notification endpoint requires a Bearer token; the preference
//! toggle endpoints additionally validate channel/type names against the
//! closed enumerations before touching storage. Both behaviours are
//! observable without a database.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, lazy_pool, put_json_auth, test_token};

// ---------------------------------------------------------------------------
// Test: missing Authorization header returns 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let app = build_test_app(lazy_pool());
    let response = get(app, "/api/v1/notifications").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Test: non-Bearer Authorization scheme returns 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn basic_auth_scheme_is_rejected() {
    let app = build_test_app(lazy_pool());
    let response = app_request_with_raw_auth(app, "Basic dXNlcjpwYXNz").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

async fn app_request_with_raw_auth(
    app: axum::Router,
    auth_value: &str,
) -> axum::http::Response<axum::body::Body> {
    use axum::body::Body;
    use axum::http::{header::AUTHORIZATION, Method, Request};
    use tower::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri("/api/v1/notifications/unread-count")
            .header(AUTHORIZATION, auth_value)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: garbage token returns 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_token_returns_401() {
    let app = build_test_app(lazy_pool());
    let response = get_auth(app, "/api/v1/notifications/unread-count", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Test: unknown delivery channel in path returns 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_channel_returns_invalid_argument() {
    let app = build_test_app(lazy_pool());
    let token = test_token(7);

    let response = put_json_auth(
        app,
        "/api/v1/preferences/notifications/sms",
        &token,
        serde_json::json!({ "enabled": false }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ARGUMENT");
    assert!(json["error"].as_str().unwrap().contains("sms"));
}

// ---------------------------------------------------------------------------
// Test: unknown notification type in path returns 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_notification_type_returns_invalid_argument() {
    let app = build_test_app(lazy_pool());
    let token = test_token(7);

    let response = put_json_auth(
        app,
        "/api/v1/preferences/notifications/in_app/poke",
        &token,
        serde_json::json!({ "enabled": false }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ARGUMENT");
    assert!(json["error"].as_str().unwrap().contains("poke"));
}

// ---------------------------------------------------------------------------
// Test: unknown type key in a replacement document is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_type_in_preference_document_is_rejected() {
    let app = build_test_app(lazy_pool());
    let token = test_token(7);

    let response = put_json_auth(
        app,
        "/api/v1/preferences/notifications",
        &token,
        serde_json::json!({ "in_app": { "poke": false } }),
    )
    .await;

    // Serde rejects the unknown enum key during body deserialization.
    assert!(response.status().is_client_error());
}
