//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use storedesk_core::{AdminUserId, Email, Role};

/// Session-stored identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: AdminUserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Role the user is currently acting as.
    pub role: Role,
    /// Every role assigned to the user, least privileged first.
    pub available_roles: Vec<Role>,
}

impl CurrentUser {
    /// Whether the user may act as `role`.
    #[must_use]
    pub fn can_act_as(&self, role: Role) -> bool {
        self.available_roles.contains(&role)
    }

    /// Switch the active role.
    ///
    /// Returns `false` and leaves the user unchanged if `role` is not assigned.
    pub fn switch_role(&mut self, role: Role) -> bool {
        if !self.can_act_as(role) {
            return false;
        }
        self.role = role;
        true
    }

    /// Reconcile the session identity with the account as it is stored now.
    ///
    /// Returns `None` for a deactivated account. Otherwise `available_roles`
    /// becomes `roles`; the active role is kept if still assigned, else it
    /// drops to the most privileged remaining role (customer when none).
    #[must_use]
    pub fn refresh(mut self, is_active: bool, roles: Vec<Role>) -> Option<Self> {
        if !is_active {
            return None;
        }
        if !roles.contains(&self.role) {
            self.role = Role::most_privileged(&roles).unwrap_or(Role::Customer);
        }
        self.available_roles = roles;
        Some(self)
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn manager_and_admin() -> CurrentUser {
        CurrentUser {
            id: AdminUserId::new(1),
            name: "Le Van C".to_string(),
            email: Email::parse("c@shop.vn").unwrap(),
            role: Role::Administrator,
            available_roles: vec![Role::ProductManager, Role::Administrator],
        }
    }

    #[test]
    fn test_switch_to_assigned_role() {
        let mut user = manager_and_admin();
        assert!(user.switch_role(Role::ProductManager));
        assert_eq!(user.role, Role::ProductManager);
    }

    #[test]
    fn test_switch_to_unassigned_role_is_refused() {
        let mut user = manager_and_admin();
        assert!(!user.switch_role(Role::Customer));
        assert_eq!(user.role, Role::Administrator);
    }

    #[test]
    fn test_refresh_unchanged_account() {
        let user = manager_and_admin();
        let refreshed = user
            .clone()
            .refresh(true, vec![Role::ProductManager, Role::Administrator])
            .unwrap();
        assert_eq!(refreshed, user);
    }

    #[test]
    fn test_refresh_deactivated_account_ends_session() {
        assert!(
            manager_and_admin()
                .refresh(false, vec![Role::Administrator])
                .is_none()
        );
    }

    #[test]
    fn test_refresh_demoted_administrator() {
        let refreshed = manager_and_admin()
            .refresh(true, vec![Role::ProductManager])
            .unwrap();
        assert_eq!(refreshed.role, Role::ProductManager);
        assert_eq!(refreshed.available_roles, vec![Role::ProductManager]);
        assert!(!refreshed.can_act_as(Role::Administrator));
    }

    #[test]
    fn test_refresh_all_roles_removed() {
        let refreshed = manager_and_admin().refresh(true, vec![]).unwrap();
        assert_eq!(refreshed.role, Role::Customer);
        assert!(refreshed.available_roles.is_empty());
    }

    #[test]
    fn test_refresh_keeps_switched_role() {
        let mut user = manager_and_admin();
        assert!(user.switch_role(Role::ProductManager));
        let refreshed = user
            .refresh(true, vec![Role::ProductManager, Role::Administrator])
            .unwrap();
        assert_eq!(refreshed.role, Role::ProductManager);
    }

    #[test]
    fn test_session_roundtrip_shape() {
        let json = serde_json::to_value(manager_and_admin()).unwrap();
        assert_eq!(json["role"], "administrator");
        assert_eq!(
            json["available_roles"],
            serde_json::json!(["product_manager", "administrator"])
        );
    }
}
