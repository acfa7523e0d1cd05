//! Authentication service.
//!
//! Email and password login for admin users, plus the password writes used
//! by account creation and administrator-initiated resets.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use storedesk_core::dto::{CreateAdminUser, ResetPassword};
use storedesk_core::{AdminUserId, Email, Role};

use crate::db::AdminUserRepository;
use crate::db::admin_users::NewAdminUser;
use crate::models::{AdminUser, CurrentUser};

/// Authentication service.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// The returned session identity starts in the most privileged assigned
    /// role; a user with no roles acts as a customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Inactive` if the account is deactivated.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.expose_secret(), &password_hash)?;

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        let available_roles = self.users.role_names(user.id).await?;
        Ok(session_identity(&user, available_roles))
    }

    /// Create an admin user from an accepted create payload.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails, or the repository
    /// error (conflict, unknown role) wrapped in `AuthError::Repository`.
    pub async fn create_admin(&self, dto: &CreateAdminUser) -> Result<AdminUser, AuthError> {
        let password_hash = hash_password(dto.password.expose_secret())?;
        let role_ids = dto.role_ids.as_deref().unwrap_or_default();

        let user = self
            .users
            .create(&NewAdminUser {
                name: &dto.name,
                email: &dto.email,
                phone: &dto.phone,
                password_hash: &password_hash,
                role_ids,
            })
            .await?;
        Ok(user)
    }

    /// Replace a user's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails, or
    /// `AuthError::Repository(RepositoryError::NotFound)` for an unknown user.
    pub async fn reset_password(
        &self,
        id: AdminUserId,
        dto: &ResetPassword,
    ) -> Result<(), AuthError> {
        let password_hash = hash_password(dto.new_password.expose_secret())?;
        self.users.update_password(id, &password_hash).await?;
        Ok(())
    }
}

/// Build the session identity for a freshly authenticated user.
#[must_use]
pub fn session_identity(user: &AdminUser, available_roles: Vec<Role>) -> CurrentUser {
    let role = Role::most_privileged(&available_roles).unwrap_or(Role::Customer);
    CurrentUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role,
        available_roles,
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
