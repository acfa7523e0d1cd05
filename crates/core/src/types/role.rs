//! Roles an authenticated identity can act as.

use serde::{Deserialize, Serialize};

/// Error returned when a role name is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// A role assignable to an admin user.
///
/// The set is closed. Each role maps to at most one dashboard variant; see
/// the admin crate's dashboard composer. Stored as the `admin.role_name` enum
/// and read back through [`FromStr`](std::str::FromStr).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Storefront customer. Has no admin dashboard.
    Customer,
    /// Manages the catalog and order flow.
    ProductManager,
    /// Manages admin users and system settings.
    Administrator,
}

impl Role {
    /// Every role, least privileged first.
    pub const ALL: [Self; 3] = [Self::Customer, Self::ProductManager, Self::Administrator];

    /// Stable machine name, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::ProductManager => "product_manager",
            Self::Administrator => "administrator",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::ProductManager => "Product Manager",
            Self::Administrator => "Administrator",
        }
    }

    /// The most privileged role in `roles`, if any.
    #[must_use]
    pub fn most_privileged(roles: &[Self]) -> Option<Self> {
        roles.iter().copied().max()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "product_manager" => Ok(Self::ProductManager),
            "administrator" => Ok(Self::Administrator),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("super_admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_most_privileged() {
        assert_eq!(
            Role::most_privileged(&[Role::Customer, Role::Administrator, Role::ProductManager]),
            Some(Role::Administrator)
        );
        assert_eq!(Role::most_privileged(&[]), None);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::ProductManager).unwrap(),
            "\"product_manager\""
        );
    }
}
