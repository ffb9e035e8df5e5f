//! Notification preference row model.

use clipflow_core::notifications::Preferences;
use clipflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `notification_preferences` table.
///
/// The channel buckets are stored as JSONB and decoded into the typed
/// matrix via [`into_preferences`](PreferenceRow::into_preferences).
#[derive(Debug, Clone, FromRow)]
pub struct PreferenceRow {
    pub user_id: DbId,
    pub email: serde_json::Value,
    pub push: serde_json::Value,
    pub in_app: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PreferenceRow {
    /// Decode the JSONB buckets into the typed matrix, filling any
    /// missing type with the enabled default.
    pub fn into_preferences(self) -> Result<Preferences, serde_json::Error> {
        let mut prefs = Preferences {
            email: serde_json::from_value(self.email)?,
            push: serde_json::from_value(self.push)?,
            in_app: serde_json::from_value(self.in_app)?,
        };
        prefs.normalize();
        Ok(prefs)
    }
}
