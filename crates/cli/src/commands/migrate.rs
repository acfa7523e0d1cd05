//! Database migration command.
//!
//! Migrations live in `crates/admin/migrations/` and are embedded at build time.
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use super::{CliError, connect};

/// Run the admin database migrations.
///
/// # Errors
///
/// Returns `CliError` if the connection or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Admin migrations complete!");
    Ok(())
}
