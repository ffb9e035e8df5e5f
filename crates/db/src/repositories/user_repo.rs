//! Repository for the `users` read-model.

use clipflow_core::types::DbId;
use sqlx::PgPool;

/// Read-only access to user contact fields.
pub struct UserRepo;

impl UserRepo {
    /// Look up a user's email address for the email delivery channel.
    pub async fn get_email(pool: &PgPool, user_id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
