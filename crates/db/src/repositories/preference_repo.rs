//! Repository for the `notification_preferences` table.

use clipflow_core::channels::Channel;
use clipflow_core::notifications::{ChannelPrefs, NotificationType, Preferences};
use clipflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::preference::PreferenceRow;

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "user_id, email, push, in_app, created_at, updated_at";

/// Provides read/write access to per-user notification preferences.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Fetch a user's preference matrix, inserting and returning the
    /// all-enabled default when no row exists yet. Subsequent writes
    /// always have a base row to mutate.
    pub async fn get_or_default(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Preferences, sqlx::Error> {
        let defaults = Preferences::default();
        let inserted = sqlx::query(
            "INSERT INTO notification_preferences (user_id, email, push, in_app) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(encode_bucket(&defaults.email)?)
        .bind(encode_bucket(&defaults.push)?)
        .bind(encode_bucket(&defaults.in_app)?)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            tracing::debug!(user_id, "Initialized default notification preferences");
            return Ok(defaults);
        }

        let query = format!(
            "SELECT {COLUMNS} FROM notification_preferences WHERE user_id = $1"
        );
        let row = sqlx::query_as::<_, PreferenceRow>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        decode_row(row)
    }

    /// Replace the full preference document for a user.
    ///
    /// The incoming matrix is materialized first, so every (channel, type)
    /// pair is persisted explicitly.
    pub async fn replace(
        pool: &PgPool,
        user_id: DbId,
        prefs: &Preferences,
    ) -> Result<Preferences, sqlx::Error> {
        let mut prefs = prefs.clone();
        prefs.normalize();

        let query = format!(
            "INSERT INTO notification_preferences (user_id, email, push, in_app) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
                email = EXCLUDED.email, \
                push = EXCLUDED.push, \
                in_app = EXCLUDED.in_app, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PreferenceRow>(&query)
            .bind(user_id)
            .bind(encode_bucket(&prefs.email)?)
            .bind(encode_bucket(&prefs.push)?)
            .bind(encode_bucket(&prefs.in_app)?)
            .fetch_one(pool)
            .await?;
        decode_row(row)
    }

    /// Upsert a single (channel, type) flag in one atomic statement.
    pub async fn set_field(
        pool: &PgPool,
        user_id: DbId,
        channel: Channel,
        ty: NotificationType,
        enabled: bool,
    ) -> Result<Preferences, sqlx::Error> {
        // Make sure a base row exists to mutate.
        Self::get_or_default(pool, user_id).await?;

        // The column name comes from the closed Channel enum, never from
        // request input.
        let column = channel.as_str();
        let query = format!(
            "UPDATE notification_preferences \
             SET {column} = jsonb_set({column}, $2, $3), updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PreferenceRow>(&query)
            .bind(user_id)
            .bind(vec![ty.as_str().to_string()])
            .bind(serde_json::Value::Bool(enabled))
            .fetch_one(pool)
            .await?;
        decode_row(row)
    }

    /// Set every type's flag within one channel bucket in a single
    /// statement.
    pub async fn set_channel(
        pool: &PgPool,
        user_id: DbId,
        channel: Channel,
        enabled: bool,
    ) -> Result<Preferences, sqlx::Error> {
        Self::get_or_default(pool, user_id).await?;

        let column = channel.as_str();
        let query = format!(
            "UPDATE notification_preferences \
             SET {column} = $2, updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PreferenceRow>(&query)
            .bind(user_id)
            .bind(encode_bucket(&ChannelPrefs::all(enabled))?)
            .fetch_one(pool)
            .await?;
        decode_row(row)
    }
}

/// Serialize one channel bucket to its JSONB representation.
fn encode_bucket(bucket: &ChannelPrefs) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(bucket).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Decode a row's JSONB buckets into the typed matrix.
fn decode_row(row: PreferenceRow) -> Result<Preferences, sqlx::Error> {
    row.into_preferences()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
