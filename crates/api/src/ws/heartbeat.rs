use std::sync::Arc;
use std::time::Duration;

use crate::ws::ConnectionRegistry;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to all
/// connected WebSocket clients.
///
/// The task runs for the life of the process; the returned `JoinHandle`
/// is used to abort it during shutdown.
pub fn start_heartbeat(registry: Arc<ConnectionRegistry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = registry.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            registry.ping_all().await;
        }
    })
}
