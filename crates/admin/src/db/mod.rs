//! Database operations for admin `PostgreSQL`.
//!
//! ## Tables
//!
//! - `admin.role` - The closed set of roles (seeded by migration)
//! - `admin.admin_user` - Admin accounts (Argon2id password hashes)
//! - `admin.admin_user_role` - Role assignments
//! - `admin.settings` - Global settings (JSONB)
//! - `admin.session` - Session storage (tower-sessions)
//! - `shop.product`, `shop."order"` - Catalog and orders (read-only here)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p storedesk-cli -- migrate
//! ```

pub mod admin_users;
pub mod catalog;
pub mod roles;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use catalog::CatalogRepository;
pub use roles::RoleRepository;
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation (e.g., unknown role id).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl RepositoryError {
    /// Classify a write error, turning constraint violations into their own variants.
    pub(crate) fn from_write(e: sqlx::Error, conflict: &str, reference: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::InvalidReference(reference.to_owned());
            }
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
