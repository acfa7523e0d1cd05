//! Admin user domain types.
//!
//! These types represent validated domain objects. The password hash is never
//! part of [`AdminUser`]; it is read separately by the login path only.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storedesk_core::{AdminUserId, Email, Role, RoleId};

/// An admin user (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Inactive users cannot log in.
    pub is_active: bool,
    /// Assigned role ids, ascending.
    #[serde(rename = "roleIds")]
    pub role_ids: Vec<RoleId>,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A persisted role row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: Role,
    pub description: String,
}
