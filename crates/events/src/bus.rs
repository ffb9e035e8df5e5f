//! In-process activity event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the hand-off point between activity producers (upload,
//! comment, like, subscription, and live-stream handlers elsewhere in the
//! platform) and the notification engine. It is designed to be shared via
//! `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use clipflow_core::notifications::NotificationType;
use clipflow_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// An activity that may notify a single recipient.
///
/// Constructed via [`ActivityEvent::new`] and enriched with the builder
/// methods [`with_sender`](ActivityEvent::with_sender),
/// [`with_thumbnail`](ActivityEvent::with_thumbnail), and
/// [`with_action`](ActivityEvent::with_action). `title` and `message` are
/// pre-rendered text; the `*_ref` fields are opaque to the engine and
/// only interpreted by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// The user this activity notifies.
    pub recipient_id: DbId,

    /// The user whose action triggered the activity; `None` for
    /// system-generated events such as milestones.
    pub sender_id: Option<DbId>,

    /// Activity category.
    pub notification_type: NotificationType,

    /// Rendered headline.
    pub title: String,

    /// Rendered body text.
    pub message: String,

    /// Opaque reference for avatar/thumbnail rendering.
    pub thumbnail_ref: Option<String>,

    /// Opaque reference for click-through navigation.
    pub action_ref: Option<String>,

    /// When the activity occurred (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Create an event with the required fields.
    ///
    /// All optional fields default to `None`.
    pub fn new(
        notification_type: NotificationType,
        recipient_id: DbId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            sender_id: None,
            notification_type,
            title: title.into(),
            message: message.into(),
            thumbnail_ref: None,
            action_ref: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting user.
    pub fn with_sender(mut self, sender_id: DbId) -> Self {
        self.sender_id = Some(sender_id);
        self
    }

    /// Attach a thumbnail reference.
    pub fn with_thumbnail(mut self, thumbnail_ref: impl Into<String>) -> Self {
        self.thumbnail_ref = Some(thumbnail_ref.into());
        self
    }

    /// Attach a click-through reference.
    pub fn with_action(mut self, action_ref: impl Into<String>) -> Self {
        self.action_ref = Some(action_ref.into());
        self
    }

    /// Whether the event would notify its own sender.
    pub fn is_self_notification(&self) -> bool {
        self.sender_id == Some(self.recipient_id)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ActivityEvent`].
///
/// # Usage
///
/// ```rust
/// use clipflow_core::notifications::NotificationType;
/// use clipflow_events::bus::{ActivityEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ActivityEvent::new(
///     NotificationType::NewSubscriber,
///     42,
///     "New subscriber",
///     "somebody subscribed to your channel",
/// ));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ActivityEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ActivityEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = ActivityEvent::new(
            NotificationType::VideoComment,
            7,
            "New comment",
            "somebody commented on your video",
        )
        .with_sender(3)
        .with_thumbnail("thumb/abc.jpg")
        .with_action("/watch/abc#comment-9");

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.notification_type, NotificationType::VideoComment);
        assert_eq!(received.recipient_id, 7);
        assert_eq!(received.sender_id, Some(3));
        assert_eq!(received.thumbnail_ref.as_deref(), Some("thumb/abc.jpg"));
        assert_eq!(received.action_ref.as_deref(), Some("/watch/abc#comment-9"));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ActivityEvent::new(
            NotificationType::NewVideo,
            1,
            "New upload",
            "a channel you follow uploaded",
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.notification_type, NotificationType::NewVideo);
        assert_eq!(e2.notification_type, NotificationType::NewVideo);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(ActivityEvent::new(
            NotificationType::Milestone,
            1,
            "1,000 subscribers",
            "your channel crossed a milestone",
        ));
    }

    #[test]
    fn bare_event_has_empty_optional_fields() {
        let event = ActivityEvent::new(NotificationType::Mention, 5, "Mention", "you were mentioned");
        assert!(event.sender_id.is_none());
        assert!(event.thumbnail_ref.is_none());
        assert!(event.action_ref.is_none());
    }

    #[test]
    fn self_notification_is_detected() {
        let event = ActivityEvent::new(NotificationType::VideoLike, 9, "Like", "liked").with_sender(9);
        assert!(event.is_self_notification());

        let other = ActivityEvent::new(NotificationType::VideoLike, 9, "Like", "liked").with_sender(8);
        assert!(!other.is_self_notification());

        // System events have no sender and never count as self-notifying.
        let system = ActivityEvent::new(NotificationType::Milestone, 9, "Milestone", "1k");
        assert!(!system.is_self_notification());
    }
}
