//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct
//! HTTP status code, error code, and message. They do NOT need an HTTP
//! server -- they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use clipflow_api::error::AppError;
use clipflow_core::error::CoreError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Notification",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Notification with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: CoreError::InvalidArgument maps to 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_argument_error_returns_400() {
    let err = AppError::Core(CoreError::InvalidArgument(
        "unknown notification type: poke".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_ARGUMENT");
    assert_eq!(json["error"], "unknown notification type: poke");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Unauthorized maps to 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Missing Authorization header".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Forbidden maps to 403
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden(
        "Notification belongs to another user".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Notification belongs to another user");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Unavailable maps to 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unavailable_error_returns_503() {
    let err = AppError::Core(CoreError::Unavailable("registry offline".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Internal sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("secret detail".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: sqlx RowNotFound maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sqlx_row_not_found_returns_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: pool exhaustion maps to 503 so producers retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sqlx_pool_timeout_returns_503() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "UNAVAILABLE");
    assert_eq!(json["error"], "Storage temporarily unavailable");
}
