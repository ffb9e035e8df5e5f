//! Repository for the `notifications` table.

use clipflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{NewNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, recipient_id, sender_id, notification_type, title, message, \
    thumbnail_ref, action_ref, is_read, is_clicked, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the stored row with id and
    /// creation time assigned.
    pub async fn append(
        pool: &PgPool,
        new: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications \
                (recipient_id, sender_id, notification_type, title, message, \
                 thumbnail_ref, action_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(new.recipient_id)
            .bind(new.sender_id)
            .bind(new.notification_type.as_str())
            .bind(&new.title)
            .bind(&new.message)
            .bind(&new.thumbnail_ref)
            .bind(&new.action_ref)
            .fetch_one(pool)
            .await
    }

    /// Fetch a single notification by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List notifications for a recipient, newest first.
    ///
    /// Ordering is `(created_at, id)` descending; both keys are immutable,
    /// so already-returned items never reorder. When `before` is given,
    /// rows newer than that anchor id are excluded, which keeps page
    /// boundaries stable while a client scrolls through older pages. An
    /// anchor that has since been deleted yields an empty page.
    pub async fn list_for_user(
        pool: &PgPool,
        recipient_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
        before: Option<DbId>,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let unread_filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let anchor_filter = if before.is_some() {
            "AND (created_at, id) <= \
                 (SELECT created_at, id FROM notifications WHERE id = $4)"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 {unread_filter} {anchor_filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let mut q = sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(limit)
            .bind(offset);
        if let Some(anchor) = before {
            q = q.bind(anchor);
        }
        q.fetch_all(pool).await
    }

    /// Mark a single notification as read.
    ///
    /// Re-marking an already-read row is a no-op. Returns `true` if a row
    /// changed.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE id = $1 AND is_read = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a notification as clicked. Clicking implies read, so both
    /// flags are set in one statement.
    pub async fn mark_clicked(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_clicked = true, is_read = true \
             WHERE id = $1 AND is_clicked = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a recipient.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, recipient_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true \
             WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a notification. Deleting a missing id is a no-op; returns
    /// `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every notification belonging to a recipient.
    ///
    /// Returns the number of rows removed.
    pub async fn clear_all(pool: &PgPool, recipient_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a recipient.
    pub async fn unread_count(pool: &PgPool, recipient_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
