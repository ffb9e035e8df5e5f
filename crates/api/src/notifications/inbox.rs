//! Client-facing read-state operations over stored notifications.
//!
//! [`Inbox`] composes the notification repository with ownership
//! enforcement: a caller may only mutate its own notifications.
//! Mutations on ids that no longer exist are no-ops, matching the
//! idempotence contract of the store.

use clipflow_core::error::CoreError;
use clipflow_core::types::DbId;
use clipflow_db::models::notification::Notification;
use clipflow_db::repositories::NotificationRepo;
use clipflow_db::DbPool;

use crate::error::{AppError, AppResult};

/// Read-state facade over a caller's notifications.
pub struct Inbox;

impl Inbox {
    /// List the caller's notifications, newest first.
    pub async fn list(
        pool: &DbPool,
        caller: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
        before: Option<DbId>,
    ) -> AppResult<Vec<Notification>> {
        Ok(NotificationRepo::list_for_user(pool, caller, unread_only, limit, offset, before)
            .await?)
    }

    /// Number of unread notifications for the caller.
    pub async fn unread_count(pool: &DbPool, caller: DbId) -> AppResult<i64> {
        Ok(NotificationRepo::unread_count(pool, caller).await?)
    }

    /// Mark one notification read. Marking twice is the same as marking
    /// once.
    pub async fn mark_read(pool: &DbPool, caller: DbId, id: DbId) -> AppResult<()> {
        let Some(notification) = NotificationRepo::get(pool, id).await? else {
            return Ok(());
        };
        ensure_owner(&notification, caller)?;
        NotificationRepo::mark_read(pool, id).await?;
        Ok(())
    }

    /// Mark one notification clicked; clicking implies read.
    pub async fn mark_clicked(pool: &DbPool, caller: DbId, id: DbId) -> AppResult<()> {
        let Some(notification) = NotificationRepo::get(pool, id).await? else {
            return Ok(());
        };
        ensure_owner(&notification, caller)?;
        NotificationRepo::mark_clicked(pool, id).await?;
        Ok(())
    }

    /// Mark every unread notification of the caller as read.
    ///
    /// Returns the number of notifications that changed.
    pub async fn mark_all_read(pool: &DbPool, caller: DbId) -> AppResult<u64> {
        Ok(NotificationRepo::mark_all_read(pool, caller).await?)
    }

    /// Delete one notification. Deleting a missing id is a no-op.
    pub async fn delete(pool: &DbPool, caller: DbId, id: DbId) -> AppResult<()> {
        let Some(notification) = NotificationRepo::get(pool, id).await? else {
            return Ok(());
        };
        ensure_owner(&notification, caller)?;
        NotificationRepo::delete(pool, id).await?;
        Ok(())
    }

    /// Delete every notification of the caller.
    ///
    /// Returns the number of rows removed.
    pub async fn clear_all(pool: &DbPool, caller: DbId) -> AppResult<u64> {
        Ok(NotificationRepo::clear_all(pool, caller).await?)
    }
}

/// Reject mutations on notifications the caller does not own.
fn ensure_owner(notification: &Notification, caller: DbId) -> Result<(), AppError> {
    if notification.recipient_id != caller {
        return Err(AppError::Core(CoreError::Forbidden(
            "Notification belongs to another user".into(),
        )));
    }
    Ok(())
}
