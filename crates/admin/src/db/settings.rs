//! Settings database operations.
//!
//! Global key/value settings. Values are arbitrary JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::RepositoryError;

/// A stored setting.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Setting {
    pub key: String,
    pub value: JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Repository for global settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every setting, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Setting>, RepositoryError> {
        let rows = sqlx::query_as("SELECT key, value, updated_at FROM admin.settings ORDER BY key")
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar("SELECT value FROM admin.settings WHERE key = $1")
            .bind(key)
            .fetch_optional(self.pool)
            .await?;
        Ok(value)
    }

    /// Insert or replace a setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set(&self, key: &str, value: &JsonValue) -> Result<Setting, RepositoryError> {
        let row = sqlx::query_as(
            r"
            INSERT INTO admin.settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            RETURNING key, value, updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}
