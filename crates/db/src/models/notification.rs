//! Notification entity models and DTOs.

use clipflow_core::notifications::NotificationType;
use clipflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// `id`, `recipient_id`, `notification_type`, and `created_at` never
/// change after insert; only the read/clicked flags mutate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    pub sender_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub thumbnail_ref: Option<String>,
    pub action_ref: Option<String>,
    pub is_read: bool,
    pub is_clicked: bool,
    pub created_at: Timestamp,
}

/// Insert payload for a new notification.
///
/// Read/clicked state always starts unset; id and creation time are
/// assigned by the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub recipient_id: DbId,
    pub sender_id: Option<DbId>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub thumbnail_ref: Option<String>,
    pub action_ref: Option<String>,
}
