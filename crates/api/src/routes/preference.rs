//! Route definitions for the `/preferences/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::preference;
use crate::state::AppState;

/// Routes mounted at `/preferences/notifications`.
///
/// ```text
/// GET /                   -> get_preferences
/// PUT /                   -> replace_preferences
/// PUT /{channel}          -> set_channel
/// PUT /{channel}/{type}   -> set_field
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(preference::get_preferences).put(preference::replace_preferences),
        )
        .route("/{channel}", put(preference::set_channel))
        .route("/{channel}/{type}", put(preference::set_field))
}
