pub mod health;
pub mod notification;
pub mod preference;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                           notification WebSocket
///
/// /notifications                                list (GET), clear all (DELETE)
/// /notifications/unread-count                   unread badge count (GET)
/// /notifications/read-all                       mark everything read (POST)
/// /notifications/{id}/read                      mark one read (POST)
/// /notifications/{id}/clicked                   mark one clicked (POST)
/// /notifications/{id}                           delete one (DELETE)
///
/// /preferences/notifications                    get, replace (GET, PUT)
/// /preferences/notifications/{channel}          bulk channel toggle (PUT)
/// /preferences/notifications/{channel}/{type}   single flag toggle (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/notifications", notification::router())
        .nest("/preferences/notifications", preference::router())
}
