//! Admin user management commands.
//!
//! Arguments are assembled into the same JSON payloads the HTTP API accepts
//! and run through the same schemas, so a rejection lists every violated
//! field exactly as the API would.
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin database

use std::collections::HashMap;

use serde_json::{Value, json};

use storedesk_admin::db::{AdminUserRepository, RoleRepository};
use storedesk_admin::services::AuthService;
use storedesk_core::dto::{CreateAdminUser, ResetPassword};
use storedesk_core::{Email, Role};

use super::{CliError, connect};

fn create_payload(
    name: &str,
    email: &str,
    phone: &str,
    password: String,
    role_ids: Vec<i64>,
) -> Value {
    let mut payload = json!({
        "name": name,
        "email": email,
        "phone": phone,
        "password": password,
    });
    if !role_ids.is_empty() {
        payload["roleIds"] = json!(role_ids);
    }
    payload
}

/// Create a new admin user.
///
/// # Errors
///
/// Returns `CliError::Validation` with every violated field when the
/// arguments are rejected, or the database error otherwise.
pub async fn create_user(
    name: &str,
    email: &str,
    phone: &str,
    password: String,
    role_ids: Vec<i64>,
) -> Result<(), CliError> {
    let dto = CreateAdminUser::from_json(&create_payload(name, email, phone, password, role_ids))?;

    let pool = connect().await?;
    let user = AuthService::new(&pool).create_admin(&dto).await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Roles: {:?}",
        user.id,
        user.email,
        user.role_ids
    );
    Ok(())
}

/// Replace the password of the admin user with the given email.
///
/// # Errors
///
/// Returns `CliError::Validation` for a too-short password and
/// `CliError::UnknownUser` when no account has the email.
pub async fn reset_password(email: &str, password: String) -> Result<(), CliError> {
    let dto = ResetPassword::from_json(&json!({ "newPassword": password }))?;
    let email = Email::parse(email).map_err(|_| CliError::UnknownUser(email.to_owned()))?;

    let pool = connect().await?;
    let user = AdminUserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CliError::UnknownUser(email.to_string()))?;

    AuthService::new(&pool).reset_password(user.id, &dto).await?;

    tracing::info!("Password reset for {}", user.email);
    Ok(())
}

/// Print every admin user with their role names.
///
/// # Errors
///
/// Returns `CliError` if a query fails.
#[allow(clippy::print_stdout)]
pub async fn list_users() -> Result<(), CliError> {
    let pool = connect().await?;

    let roles: HashMap<_, Role> = RoleRepository::new(&pool)
        .list_all()
        .await?
        .into_iter()
        .map(|role| (role.id, role.name))
        .collect();
    let users = AdminUserRepository::new(&pool).list_all().await?;

    for user in users {
        let names: Vec<&str> = user
            .role_ids
            .iter()
            .filter_map(|id| roles.get(id).map(|role| role.as_str()))
            .collect();
        println!(
            "{:>5}  {:<32}  {:<24}  {:<8}  {}",
            user.id.to_string(),
            user.email.as_str(),
            user.name,
            if user.is_active { "active" } else { "inactive" },
            names.join(",")
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_rejection_lists_every_field() {
        let payload = create_payload("", "not-an-email", "", String::new(), vec![]);
        let errors = CreateAdminUser::from_json(&payload).unwrap_err();
        let fields = errors.fields();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn test_create_payload_omits_empty_roles() {
        let payload = create_payload("A", "a@shop.vn", "0901", "secret1".to_owned(), vec![]);
        assert!(payload.get("roleIds").is_none());

        let dto = CreateAdminUser::from_json(&payload).unwrap();
        assert!(dto.role_ids.is_none());
    }

    #[test]
    fn test_create_payload_with_roles() {
        let payload = create_payload("A", "a@shop.vn", "0901", "secret1".to_owned(), vec![2, 3]);
        let dto = CreateAdminUser::from_json(&payload).unwrap();
        assert_eq!(dto.role_ids.unwrap().len(), 2);
    }

    #[test]
    fn test_reset_password_too_short() {
        let errors = ResetPassword::from_json(&json!({ "newPassword": "12345" })).unwrap_err();
        assert_eq!(
            errors.message_for("newPassword"),
            Some("Password must be at least 6 characters long")
        );
    }
}
