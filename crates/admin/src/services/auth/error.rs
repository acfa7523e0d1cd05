//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    #[error("account is inactive")]
    Inactive,

    /// Hashing a password failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
