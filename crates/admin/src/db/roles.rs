//! Role repository.
//!
//! Roles are seeded by migration and never written at runtime.

use sqlx::PgPool;

use storedesk_core::{Role, RoleId};

use super::RepositoryError;
use crate::models::RoleRecord;

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i32,
    name: String,
    description: String,
}

impl TryFrom<RoleRow> for RoleRecord {
    type Error = RepositoryError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let name = row
            .name
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: RoleId::new(row.id),
            name,
            description: row.description,
        })
    }
}

/// Repository for role lookups.
pub struct RoleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepository<'a> {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every role, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a role name is unknown.
    pub async fn list_all(&self) -> Result<Vec<RoleRecord>, RepositoryError> {
        let rows: Vec<RoleRow> = sqlx::query_as(
            "SELECT id, name::text AS name, description FROM admin.role ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
