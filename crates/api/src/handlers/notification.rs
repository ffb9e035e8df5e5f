//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use clipflow_core::types::DbId;
use clipflow_db::models::notification::Notification;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::notifications::Inbox;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 50, capped at 100.
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
    /// If `true`, return only unread notifications. Defaults to `false`.
    #[serde(alias = "unreadOnly")]
    pub unread_only: Option<bool>,
    /// Anchor id from a previously fetched page; rows inserted after it
    /// are excluded so page boundaries stay stable while scrolling.
    pub before: Option<DbId>,
}

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications, newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let (limit, offset) = PageParams {
        page: params.page,
        page_size: params.page_size,
    }
    .to_limit_offset();
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications = Inbox::list(
        &state.pool,
        auth.user_id,
        unread_only,
        limit,
        offset,
        params.before,
    )
    .await?;

    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread notifications for the authenticated user.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = Inbox::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Returns 204 No Content; marking a
/// notification that no longer exists is a no-op.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    Inbox::mark_read(&state.pool, auth.user_id, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/{id}/clicked
///
/// Mark a single notification as clicked (which implies read). Returns
/// 204 No Content.
pub async fn mark_clicked(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    Inbox::mark_clicked(&state.pool, auth.user_id, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of the authenticated user's notifications as read.
/// Returns the number of notifications that were marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = Inbox::mark_all_read(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// DELETE /api/v1/notifications/{id}
///
/// Delete a single notification. Returns 204 No Content; deleting a
/// missing id is a no-op.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    Inbox::delete(&state.pool, auth.user_id, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/notifications
///
/// Delete every notification of the authenticated user. Returns the
/// number of rows removed.
pub async fn clear_all(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = Inbox::clear_all(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "cleared": count }
    })))
}
