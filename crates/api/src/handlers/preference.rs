//! Handlers for the `/preferences/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Channel and
//! type path segments are validated against the closed enumerations, so
//! unknown names come back as 400 rather than silently defaulting.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::Json;
use clipflow_core::channels::Channel;
use clipflow_core::notifications::{NotificationType, Preferences};
use clipflow_db::repositories::PreferenceRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for the per-channel and per-field toggle endpoints.
#[derive(Debug, Deserialize)]
pub struct ToggleBody {
    pub enabled: bool,
}

/// GET /api/v1/preferences/notifications
///
/// Return the caller's full preference matrix, initializing the
/// all-enabled default on first access.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let prefs = PreferenceRepo::get_or_default(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: prefs }))
}

/// PUT /api/v1/preferences/notifications
///
/// Replace the caller's preference document wholesale. Buckets omitted
/// from the body fall back to all-enabled; unknown type keys fail
/// deserialization.
pub async fn replace_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<Preferences>,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let prefs = PreferenceRepo::replace(&state.pool, auth.user_id, &input).await?;
    Ok(Json(DataResponse { data: prefs }))
}

/// PUT /api/v1/preferences/notifications/{channel}
///
/// Bulk-enable or disable every notification type on one channel.
pub async fn set_channel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Json(body): Json<ToggleBody>,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let channel = Channel::from_str(&channel).map_err(AppError::Core)?;
    let prefs =
        PreferenceRepo::set_channel(&state.pool, auth.user_id, channel, body.enabled).await?;
    Ok(Json(DataResponse { data: prefs }))
}

/// PUT /api/v1/preferences/notifications/{channel}/{type}
///
/// Toggle a single (channel, notification type) flag.
pub async fn set_field(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((channel, ty)): Path<(String, String)>,
    Json(body): Json<ToggleBody>,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let channel = Channel::from_str(&channel).map_err(AppError::Core)?;
    let ty = NotificationType::from_str(&ty).map_err(AppError::Core)?;
    let prefs =
        PreferenceRepo::set_field(&state.pool, auth.user_id, channel, ty, body.enabled).await?;
    Ok(Json(DataResponse { data: prefs }))
}
