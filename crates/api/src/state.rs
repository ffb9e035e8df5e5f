use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::ConnectionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clipflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Activity event bus; producers elsewhere in the platform publish
    /// here and the notification engine consumes.
    pub event_bus: Arc<clipflow_events::EventBus>,
}
