//! Real-time fan-out of stored notifications to live connections.

use std::sync::Arc;

use axum::extract::ws::Message;
use clipflow_db::models::notification::Notification;

use crate::ws::ConnectionRegistry;

/// Pushes stored notifications to every live connection of the recipient.
///
/// Fan-out is enqueue-only: each connection drains its own bounded queue,
/// so one slow client never delays the others. Push failure is non-fatal
/// — the record is already durable and will be seen on the next pull.
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over the given connection registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Push a stored notification to the recipient's live connections.
    ///
    /// Returns the number of connections the payload was enqueued to;
    /// zero simply means the recipient is offline and will pull later.
    pub async fn dispatch(&self, notification: &Notification) -> usize {
        let payload = serde_json::json!({
            "type": "notification",
            "notification": notification,
        });
        let message = Message::Text(payload.to_string().into());

        let sent = self
            .registry
            .send_to_user(notification.recipient_id, message)
            .await;

        tracing::debug!(
            notification_id = notification.id,
            recipient_id = notification.recipient_id,
            connections = sent,
            "Dispatched notification"
        );
        sent
    }
}
