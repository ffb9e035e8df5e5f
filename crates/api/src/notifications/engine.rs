//! Event ingestion and per-recipient preference filtering.
//!
//! [`NotificationEngine`] receives [`ActivityEvent`]s — either through
//! the synchronous [`ingest`](NotificationEngine::ingest) contract or by
//! consuming the [`EventBus`](clipflow_events::EventBus) — filters them
//! against the recipient's preference matrix, persists in-app
//! notifications, and hands them to the delivery paths.

use std::sync::Arc;

use clipflow_core::channels::Channel;
use clipflow_db::models::notification::NewNotification;
use clipflow_db::repositories::{NotificationRepo, PreferenceRepo, UserRepo};
use clipflow_db::DbPool;
use clipflow_events::{ActivityEvent, EmailDelivery, PushDelivery};
use tokio::sync::broadcast;

use crate::notifications::Dispatcher;

/// What became of one ingested event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// At least one channel accepted the event.
    Delivered(Vec<Channel>),
    /// The recipient triggered the event themselves; nothing was sent.
    SelfNotification,
    /// Every channel for this event type is disabled; dropped silently.
    Muted,
}

/// Filters activity events against recipient preferences and routes them
/// to the enabled channels.
pub struct NotificationEngine {
    pool: DbPool,
    dispatcher: Dispatcher,
    email: Option<Arc<EmailDelivery>>,
    push: Option<Arc<PushDelivery>>,
}

impl NotificationEngine {
    /// Create an engine. `email`/`push` are `None` when the respective
    /// collaborator is not configured; those channels then drop their
    /// deliveries with a debug log.
    pub fn new(
        pool: DbPool,
        dispatcher: Dispatcher,
        email: Option<EmailDelivery>,
        push: Option<PushDelivery>,
    ) -> Self {
        Self {
            pool,
            dispatcher,
            email: email.map(Arc::new),
            push: push.map(Arc::new),
        }
    }

    /// Consume the event bus until it closes.
    ///
    /// Per-event failures are logged and the loop continues; producers
    /// that need the outcome call [`ingest`](Self::ingest) directly.
    pub async fn run(self, mut receiver: broadcast::Receiver<ActivityEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.ingest(&event).await {
                        tracing::error!(
                            error = %e,
                            notification_type = %event.notification_type,
                            recipient_id = event.recipient_id,
                            "Failed to ingest event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification engine lagged, events were skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification engine shutting down");
                    break;
                }
            }
        }
    }

    /// Ingest one activity event.
    ///
    /// Storage errors propagate so the producer can retry; email/push
    /// hand-offs are spawned fire-and-forget and never surface here.
    pub async fn ingest(&self, event: &ActivityEvent) -> Result<IngestOutcome, sqlx::Error> {
        if event.is_self_notification() {
            tracing::debug!(
                recipient_id = event.recipient_id,
                notification_type = %event.notification_type,
                "Skipping self-notification"
            );
            return Ok(IngestOutcome::SelfNotification);
        }

        let prefs = PreferenceRepo::get_or_default(&self.pool, event.recipient_id).await?;
        let channels = prefs.active_channels(event.notification_type);
        if channels.is_empty() {
            return Ok(IngestOutcome::Muted);
        }

        for channel in &channels {
            match channel {
                Channel::InApp => self.deliver_in_app(event).await?,
                Channel::Email => self.spawn_email(event),
                Channel::Push => self.spawn_push(event),
            }
        }

        Ok(IngestOutcome::Delivered(channels))
    }

    /// Persist the notification, then fan it out to live connections.
    async fn deliver_in_app(&self, event: &ActivityEvent) -> Result<(), sqlx::Error> {
        let new = NewNotification {
            recipient_id: event.recipient_id,
            sender_id: event.sender_id,
            notification_type: event.notification_type,
            title: event.title.clone(),
            message: event.message.clone(),
            thumbnail_ref: event.thumbnail_ref.clone(),
            action_ref: event.action_ref.clone(),
        };
        let stored = NotificationRepo::append(&self.pool, &new).await?;

        // Push is best-effort; the stored record is the source of truth.
        self.dispatcher.dispatch(&stored).await;
        Ok(())
    }

    /// Hand the event to the SMTP collaborator without blocking ingestion.
    fn spawn_email(&self, event: &ActivityEvent) {
        let Some(email) = self.email.as_ref().map(Arc::clone) else {
            tracing::debug!("Email channel enabled but SMTP is not configured");
            return;
        };
        let pool = self.pool.clone();
        let event = event.clone();
        tokio::spawn(async move {
            let address = match UserRepo::get_email(&pool, event.recipient_id).await {
                Ok(Some(address)) => address,
                Ok(None) => {
                    tracing::debug!(
                        recipient_id = event.recipient_id,
                        "No email address on file, skipping email delivery"
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        recipient_id = event.recipient_id,
                        "Email address lookup failed"
                    );
                    return;
                }
            };
            if let Err(e) = email.deliver(&address, &event).await {
                tracing::warn!(
                    error = %e,
                    recipient_id = event.recipient_id,
                    "Email delivery failed"
                );
            }
        });
    }

    /// Hand the event to the push gateway without blocking ingestion.
    fn spawn_push(&self, event: &ActivityEvent) {
        let Some(push) = self.push.as_ref().map(Arc::clone) else {
            tracing::debug!("Push channel enabled but no gateway is configured");
            return;
        };
        let event = event.clone();
        tokio::spawn(async move {
            if let Err(e) = push.deliver(event.recipient_id, &event).await {
                tracing::warn!(
                    error = %e,
                    recipient_id = event.recipient_id,
                    "Push delivery failed"
                );
            }
        });
    }
}
