//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /              -> list_notifications
/// DELETE /              -> clear_all
/// GET    /unread-count  -> unread_count
/// POST   /read-all      -> mark_all_read
/// POST   /{id}/read     -> mark_read
/// POST   /{id}/clicked  -> mark_clicked
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notification::list_notifications).delete(notification::clear_all),
        )
        .route("/unread-count", get(notification::unread_count))
        .route("/read-all", post(notification::mark_all_read))
        .route("/{id}/read", post(notification::mark_read))
        .route("/{id}/clicked", post(notification::mark_clicked))
        .route("/{id}", delete(notification::delete))
}
