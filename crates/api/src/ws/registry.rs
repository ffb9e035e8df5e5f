use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use clipflow_core::types::{DbId, Timestamp};
use tokio::sync::{broadcast, RwLock};

/// Capacity of each connection's outbound push queue.
///
/// When a client stops draining its socket the queue overflows and the
/// oldest undelivered frames are dropped; the stored notification is
/// unaffected and remains retrievable through the pull API.
pub const PUSH_QUEUE_CAPACITY: usize = 64;

/// Metadata for a single WebSocket connection.
pub struct Connection {
    /// Authenticated user id. `None` while the client has connected but
    /// not yet presented a token; only authenticated connections receive
    /// pushes.
    pub user_id: Option<DbId>,
    /// Bounded queue feeding the connection's send task.
    pub sender: broadcast::Sender<Message>,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Tracks all live WebSocket connections in the process.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Connections are ephemeral: the map is
/// rebuilt from scratch on restart and clients re-authenticate after
/// reconnecting.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<String, Connection>>,
}

impl ConnectionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection in the connecting (unauthenticated)
    /// state.
    ///
    /// Returns the receiver half of the outbound queue so the caller can
    /// forward messages to the WebSocket sink. The queue is bounded by
    /// [`PUSH_QUEUE_CAPACITY`]; on overflow the receiver observes
    /// `Lagged` and the oldest frames are gone.
    pub async fn register(&self, conn_id: String) -> broadcast::Receiver<Message> {
        let (tx, rx) = broadcast::channel(PUSH_QUEUE_CAPACITY);
        let conn = Connection {
            user_id: None,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Attach a verified user identity to a connection.
    ///
    /// Returns `false` when the connection has already gone away — a
    /// client that disconnects before authenticating leaves no trace.
    pub async fn authenticate(&self, conn_id: &str, user_id: DbId) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.user_id = Some(user_id);
                true
            }
            None => false,
        }
    }

    /// Remove a connection by its id.
    ///
    /// Safe to call repeatedly; duplicate disconnect signals are no-ops.
    pub async fn unregister(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Ids of the authenticated connections belonging to a user.
    ///
    /// Returns an empty vec (never an error) when the user has no live
    /// connections.
    pub async fn active_connections(&self, user_id: DbId) -> Vec<String> {
        self.connections
            .read()
            .await
            .iter()
            .filter_map(|(id, conn)| {
                if conn.user_id == Some(user_id) {
                    Some(id.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Enqueue a message to every authenticated connection of a user.
    ///
    /// Best-effort: a connection whose queue is closed does not affect
    /// the others. Returns the number of connections enqueued to.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values() {
            if conn.user_id == Some(user_id) && conn.sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Enqueue a message to one specific connection.
    ///
    /// Returns `false` when the connection is gone or its queue is closed.
    pub async fn send_to_connection(&self, conn_id: &str, message: Message) -> bool {
        let conns = self.connections.read().await;
        match conns.get(conn_id) {
            Some(conn) => conn.sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Current number of live connections (any state).
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
