//! Admin user repository for database operations.
//!
//! Role assignments live in `admin.admin_user_role`; every write that touches
//! them runs in one transaction with the user row so the two never diverge.
//! Each assignment keeps its position, so `role_ids` reads back in the order
//! it was written (duplicates dropped, first occurrence wins).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use storedesk_core::dto::{UpdateAdminUser, unique_role_ids};
use storedesk_core::{AdminUserId, Email, Role, RoleId};

use super::RepositoryError;
use crate::models::AdminUser;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    name: String,
    email: String,
    phone: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_user(self, role_ids: Vec<RoleId>) -> Result<AdminUser, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(AdminUser {
            id: AdminUserId::new(self.id),
            name: self.name,
            email,
            phone: self.phone,
            is_active: self.is_active,
            role_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row type for the login lookup.
#[derive(Debug, sqlx::FromRow)]
struct LoginRow {
    #[sqlx(flatten)]
    user: AdminUserRow,
    password_hash: String,
}

const USER_COLUMNS: &str = "id, name, email, phone, is_active, created_at, updated_at";

const EMAIL_TAKEN: &str = "email already exists";
const UNKNOWN_ROLE: &str = "roleIds contains an unknown role id";

/// Fields of a new admin user, after validation and hashing.
#[derive(Debug)]
pub struct NewAdminUser<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub role_ids: &'a [RoleId],
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows: Vec<AdminUserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM admin.admin_user ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let assignments: Vec<(i32, i32)> = sqlx::query_as(
            r"
            SELECT admin_user_id, role_id
            FROM admin.admin_user_role
            ORDER BY admin_user_id, position
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut roles_by_user: HashMap<i32, Vec<RoleId>> = HashMap::new();
        for (user_id, role_id) in assignments {
            roles_by_user
                .entry(user_id)
                .or_default()
                .push(RoleId::new(role_id));
        }

        rows.into_iter()
            .map(|row| {
                let role_ids = roles_by_user.remove(&row.id).unwrap_or_default();
                row.into_user(role_ids)
            })
            .collect()
    }

    /// Get an admin user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, id).await
    }

    /// Get an admin user by their email address, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        let row: Option<AdminUserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM admin.admin_user WHERE lower(email) = lower($1)"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut conn = self.pool.acquire().await?;
        let role_ids = fetch_role_ids(&mut conn, AdminUserId::new(row.id)).await?;
        row.into_user(role_ids).map(Some)
    }

    /// Get an admin user together with their password hash (login only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row: Option<LoginRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM admin.admin_user WHERE lower(email) = lower($1)"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut conn = self.pool.acquire().await?;
        let role_ids = fetch_role_ids(&mut conn, AdminUserId::new(row.user.id)).await?;
        Ok(Some((row.user.into_user(role_ids)?, row.password_hash)))
    }

    /// Whether the account is active, or `None` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_active(&self, id: AdminUserId) -> Result<Option<bool>, RepositoryError> {
        let active = sqlx::query_scalar("SELECT is_active FROM admin.admin_user WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(active)
    }

    /// Names of the roles assigned to a user, least privileged first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a role name is unknown.
    pub async fn role_names(&self, id: AdminUserId) -> Result<Vec<Role>, RepositoryError> {
        let names: Vec<String> = sqlx::query_scalar(
            r"
            SELECT r.name::text
            FROM admin.admin_user_role ur
            JOIN admin.role r ON r.id = ur.role_id
            WHERE ur.admin_user_id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let mut roles = names
            .iter()
            .map(|name| {
                name.parse::<Role>()
                    .map_err(|e| RepositoryError::DataCorruption(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        roles.sort();
        roles.dedup();
        Ok(roles)
    }

    /// Create a new admin user and assign their roles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::InvalidReference` if a role id does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewAdminUser<'_>) -> Result<AdminUser, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: AdminUserRow = sqlx::query_as(&format!(
            r"
            INSERT INTO admin.admin_user (name, email, phone, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new.name)
        .bind(new.email.as_str())
        .bind(new.phone)
        .bind(new.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, EMAIL_TAKEN, UNKNOWN_ROLE))?;

        let id = AdminUserId::new(row.id);
        let role_ids = replace_roles(&mut tx, id, new.role_ids).await?;
        tx.commit().await?;

        row.into_user(role_ids)
    }

    /// Apply a partial update. Absent fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    /// Returns `RepositoryError::InvalidReference` if a role id does not exist.
    pub async fn update(
        &self,
        id: AdminUserId,
        update: &UpdateAdminUser,
    ) -> Result<AdminUser, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if update.touches_profile() {
            let result = sqlx::query(
                r"
                UPDATE admin.admin_user
                SET name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    phone = COALESCE($4, phone),
                    is_active = COALESCE($5, is_active),
                    updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(id.as_i32())
            .bind(update.name.as_deref())
            .bind(update.email.as_ref().map(Email::as_str))
            .bind(update.phone.as_deref())
            .bind(update.is_active)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, EMAIL_TAKEN, UNKNOWN_ROLE))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        if let Some(role_ids) = &update.role_ids {
            touch(&mut tx, id).await?;
            replace_roles(&mut tx, id, role_ids).await?;
        }

        let user = fetch_user(&mut tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;
        Ok(user)
    }

    /// Replace a user's role assignment. Duplicates are dropped, first occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::InvalidReference` if a role id does not exist.
    pub async fn set_roles(
        &self,
        id: AdminUserId,
        role_ids: &[RoleId],
    ) -> Result<AdminUser, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        touch(&mut tx, id).await?;
        replace_roles(&mut tx, id, role_ids).await?;
        let user = fetch_user(&mut tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;
        Ok(user)
    }

    /// Store a new password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_password(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE admin.admin_user
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an admin user. Role assignments cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM admin.admin_user WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Connection-level helpers (shared by pool and transaction paths)
// =============================================================================

async fn fetch_role_ids(
    conn: &mut PgConnection,
    id: AdminUserId,
) -> Result<Vec<RoleId>, RepositoryError> {
    let ids: Vec<i32> = sqlx::query_scalar(
        r"
        SELECT role_id FROM admin.admin_user_role
        WHERE admin_user_id = $1
        ORDER BY position
        ",
    )
    .bind(id.as_i32())
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids.into_iter().map(RoleId::new).collect())
}

async fn fetch_user(
    conn: &mut PgConnection,
    id: AdminUserId,
) -> Result<Option<AdminUser>, RepositoryError> {
    let row: Option<AdminUserRow> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM admin.admin_user WHERE id = $1"
    ))
    .bind(id.as_i32())
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let role_ids = fetch_role_ids(conn, id).await?;
    row.into_user(role_ids).map(Some)
}

/// Bump `updated_at`, failing with `NotFound` for a missing user.
async fn touch(conn: &mut PgConnection, id: AdminUserId) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE admin.admin_user SET updated_at = NOW() WHERE id = $1")
        .bind(id.as_i32())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Replace every assignment of `id` and return the stored ids, ascending.
async fn replace_roles(
    conn: &mut PgConnection,
    id: AdminUserId,
    role_ids: &[RoleId],
) -> Result<Vec<RoleId>, RepositoryError> {
    sqlx::query("DELETE FROM admin.admin_user_role WHERE admin_user_id = $1")
        .bind(id.as_i32())
        .execute(&mut *conn)
        .await?;

    let ids: Vec<i32> = unique_role_ids(role_ids)
        .into_iter()
        .map(i32::from)
        .collect();

    if !ids.is_empty() {
        sqlx::query(
            r"
            INSERT INTO admin.admin_user_role (admin_user_id, role_id, position)
            SELECT $1, role_id, position
            FROM UNNEST($2::int4[]) WITH ORDINALITY AS t(role_id, position)
            ",
        )
        .bind(id.as_i32())
        .bind(&ids)
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, UNKNOWN_ROLE, UNKNOWN_ROLE))?;
    }

    fetch_role_ids(conn, id).await
}
