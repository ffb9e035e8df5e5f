use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::auth::jwt::validate_token;
use crate::state::AppState;
use crate::ws::ConnectionRegistry;

/// Messages a client may send over the notification socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Present a bearer token to start receiving pushes.
    Authenticate { token: String },
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with
/// [`ConnectionRegistry`] in the connecting state; it receives no pushes
/// until the client authenticates in-band.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection (connecting state — no pushes yet).
///   2. Spawns a sender task that drains the bounded outbound queue.
///   3. Waits for an `authenticate` message, validates the token, and
///      promotes the connection; only then do pushes flow.
///   4. Cleans up on disconnect, authenticated or not.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let registry: Arc<ConnectionRegistry> = Arc::clone(&state.registry);

    // Register and get the receiver for outbound messages.
    let mut rx = registry.register(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: drain the outbound queue into the socket. Lagged means
    // the bounded queue overflowed; the skipped frames are dropped pushes,
    // not lost notifications — the store still has them.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    let is_close = matches!(msg, Message::Close(_));
                    if sink.send(msg).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                        break;
                    }
                    if is_close {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(
                        conn_id = %sender_conn_id,
                        dropped = n,
                        "Outbound push queue overflowed, oldest frames dropped"
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Authenticate { token }) => {
                        match validate_token(&token, &state.config.jwt) {
                            Ok(claims) => {
                                if !registry.authenticate(&conn_id, claims.sub).await {
                                    break;
                                }
                                tracing::info!(
                                    conn_id = %conn_id,
                                    user_id = claims.sub,
                                    "WebSocket authenticated"
                                );
                                let ack = serde_json::json!({
                                    "type": "authenticated",
                                    "user_id": claims.sub,
                                });
                                registry
                                    .send_to_connection(
                                        &conn_id,
                                        Message::Text(ack.to_string().into()),
                                    )
                                    .await;
                            }
                            Err(e) => {
                                tracing::debug!(
                                    conn_id = %conn_id,
                                    error = %e,
                                    "WebSocket authentication failed, closing"
                                );
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::debug!(
                            conn_id = %conn_id,
                            error = %e,
                            "Unrecognized WebSocket message"
                        );
                    }
                }
            }
            Ok(_msg) => {
                // Binary frames are not part of the protocol; ignore.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and stop the sender task. Any pushes
    // still queued for this connection are abandoned with it.
    registry.unregister(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
