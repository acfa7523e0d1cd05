//! Command implementations.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use storedesk_admin::db::RepositoryError;
use storedesk_admin::services::AuthError;
use storedesk_core::ValidationErrors;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The arguments were rejected by the request schema.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Repository error.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Authentication service error.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// No admin user has the given email.
    #[error("No admin user with email: {0}")]
    UnknownUser(String),
}

/// Connect to the admin database named by `ADMIN_DATABASE_URL` or `DATABASE_URL`.
pub(crate) async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    let pool = storedesk_admin::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
