//! Admin-entity request schemas.
//!
//! Each request kind has a [`Schema`] (the rules) and a typed payload produced
//! once the schema accepts. Handlers and the CLI go through `from_json` so the
//! same rules apply everywhere a mutation can start.
//!
//! Role id uniqueness and existence are not checked here; the repository
//! deduplicates and the database rejects unknown ids.

use std::sync::LazyLock;

use secrecy::SecretString;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{Email, RoleId};
use crate::validation::{Rule, Schema, ValidationErrors};

/// Minimum length for a reset password.
pub const MIN_RESET_PASSWORD_LENGTH: usize = 6;

fn role_id_rules() -> [Rule; 3] {
    [Rule::array(), Rule::each_number(), Rule::each_positive_id()]
}

/// Rules for creating an admin user.
pub static CREATE_ADMIN_USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("create_admin_user")
        .required("name", [Rule::string(), Rule::not_empty()])
        .required("email", [Rule::string(), Rule::email()])
        .required("phone", [Rule::string(), Rule::not_empty()])
        .required("password", [Rule::string(), Rule::not_empty()])
        .optional("roleIds", role_id_rules())
});

/// Rules for a partial update of an admin user.
pub static UPDATE_ADMIN_USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("update_admin_user")
        .optional("name", [Rule::string(), Rule::not_empty()])
        .optional("email", [Rule::string(), Rule::email()])
        .optional("phone", [Rule::string(), Rule::not_empty()])
        .optional("is_active", [Rule::boolean()])
        .optional("roleIds", role_id_rules())
});

/// Rules for replacing a user's role assignment.
pub static SET_ROLES: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("set_roles").required("roleIds", role_id_rules()));

/// Rules for an administrator-initiated password reset.
pub static RESET_PASSWORD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("reset_password").required(
        "newPassword",
        [
            Rule::string(),
            Rule::not_empty(),
            Rule::min_length(MIN_RESET_PASSWORD_LENGTH)
                .with_message("Password must be at least 6 characters long"),
        ],
    )
});

fn accept<T: DeserializeOwned>(schema: &Schema, payload: &Value) -> Result<T, ValidationErrors> {
    let accepted = schema.validate(payload)?;
    serde_json::from_value(Value::Object(accepted))
        .map_err(|e| ValidationErrors::whole(format!("{}: {e}", schema.name())))
}

/// Order-preserving deduplication of role ids.
#[must_use]
pub fn unique_role_ids(ids: &[RoleId]) -> Vec<RoleId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[derive(Deserialize)]
struct CreateBody {
    name: String,
    email: Email,
    phone: String,
    password: String,
    #[serde(rename = "roleIds")]
    role_ids: Option<Vec<RoleId>>,
}

/// Accepted payload for creating an admin user.
#[derive(Debug)]
pub struct CreateAdminUser {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub password: SecretString,
    /// `None` when the payload did not mention roles.
    pub role_ids: Option<Vec<RoleId>>,
}

impl CreateAdminUser {
    /// Validate and normalize a create payload.
    ///
    /// # Errors
    ///
    /// Returns every violated field of [`CREATE_ADMIN_USER`].
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let body: CreateBody = accept(&CREATE_ADMIN_USER, payload)?;
        Ok(Self {
            name: body.name.trim().to_owned(),
            email: body.email,
            phone: body.phone.trim().to_owned(),
            password: SecretString::from(body.password),
            role_ids: body.role_ids,
        })
    }
}

#[derive(Deserialize)]
struct UpdateBody {
    name: Option<String>,
    email: Option<Email>,
    phone: Option<String>,
    is_active: Option<bool>,
    #[serde(rename = "roleIds")]
    role_ids: Option<Vec<RoleId>>,
}

/// Accepted payload for updating an admin user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAdminUser {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<RoleId>>,
}

impl UpdateAdminUser {
    /// Validate and normalize an update payload.
    ///
    /// # Errors
    ///
    /// Returns every violated field of [`UPDATE_ADMIN_USER`].
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let body: UpdateBody = accept(&UPDATE_ADMIN_USER, payload)?;
        Ok(Self {
            name: body.name.map(|s| s.trim().to_owned()),
            email: body.email,
            phone: body.phone.map(|s| s.trim().to_owned()),
            is_active: body.is_active,
            role_ids: body.role_ids,
        })
    }

    /// True when the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.is_active.is_none()
            && self.role_ids.is_none()
    }

    /// True when a column of the user row changes (roles live in a join table).
    #[must_use]
    pub const fn touches_profile(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.phone.is_some() || self.is_active.is_some()
    }
}

#[derive(Deserialize)]
struct SetRolesBody {
    #[serde(rename = "roleIds")]
    role_ids: Vec<RoleId>,
}

/// Accepted payload for replacing a role assignment. May be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRoles {
    pub role_ids: Vec<RoleId>,
}

impl SetRoles {
    /// Validate and normalize a role assignment.
    ///
    /// # Errors
    ///
    /// Returns the violation of [`SET_ROLES`].
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let body: SetRolesBody = accept(&SET_ROLES, payload)?;
        Ok(Self {
            role_ids: body.role_ids,
        })
    }
}

#[derive(Deserialize)]
struct ResetPasswordBody {
    #[serde(rename = "newPassword")]
    new_password: String,
}

/// Accepted payload for a password reset.
#[derive(Debug)]
pub struct ResetPassword {
    pub new_password: SecretString,
}

impl ResetPassword {
    /// Validate a password reset.
    ///
    /// # Errors
    ///
    /// Returns the violation of [`RESET_PASSWORD`].
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let body: ResetPasswordBody = accept(&RESET_PASSWORD, payload)?;
        Ok(Self {
            new_password: SecretString::from(body.new_password),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    fn valid_create() -> Value {
        json!({
            "name": "Nguyen Van A",
            "email": "a@shop.vn",
            "phone": "0901234567",
            "password": "secret",
        })
    }

    #[test]
    fn test_create_accepts_valid_payload() {
        let dto = CreateAdminUser::from_json(&valid_create()).unwrap();
        assert_eq!(dto.name, "Nguyen Van A");
        assert_eq!(dto.email.as_str(), "a@shop.vn");
        assert_eq!(dto.password.expose_secret(), "secret");
        assert_eq!(dto.role_ids, None);
    }

    #[test]
    fn test_create_rejects_each_missing_required_field() {
        for field in ["name", "email", "phone", "password"] {
            let mut payload = valid_create();
            payload.as_object_mut().unwrap().remove(field);
            let errors = CreateAdminUser::from_json(&payload).unwrap_err();
            assert_eq!(errors.fields(), vec![field]);
        }
    }

    #[test]
    fn test_create_reports_all_violations() {
        let errors = CreateAdminUser::from_json(&json!({
            "email": "not-an-email",
            "phone": 12345,
            "roleIds": ["a"],
        }))
        .unwrap_err();

        assert_eq!(
            errors.fields(),
            vec!["name", "email", "phone", "password", "roleIds"]
        );
        assert_eq!(errors.message_for("email"), Some("email must be an email"));
        assert_eq!(errors.message_for("phone"), Some("phone must be a string"));
    }

    #[test]
    fn test_create_with_roles() {
        let mut payload = valid_create();
        payload["roleIds"] = json!([3, 1]);
        let dto = CreateAdminUser::from_json(&payload).unwrap();
        assert_eq!(dto.role_ids, Some(vec![RoleId::new(3), RoleId::new(1)]));
    }

    #[test]
    fn test_create_debug_hides_password() {
        let dto = CreateAdminUser::from_json(&valid_create()).unwrap();
        assert!(!format!("{dto:?}").contains("secret\""));
    }

    #[test]
    fn test_update_with_no_fields_is_accepted() {
        let dto = UpdateAdminUser::from_json(&json!({})).unwrap();
        assert!(dto.is_empty());
    }

    #[test]
    fn test_update_partial_fields() {
        let dto = UpdateAdminUser::from_json(&json!({ "is_active": false, "name": null })).unwrap();
        assert_eq!(dto.is_active, Some(false));
        assert_eq!(dto.name, None);
        assert!(dto.touches_profile());
    }

    #[test]
    fn test_update_rejects_bad_types() {
        let errors = UpdateAdminUser::from_json(&json!({
            "email": "x@",
            "is_active": "true",
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["email", "is_active"]);
        assert_eq!(
            errors.message_for("is_active"),
            Some("is_active must be a boolean value")
        );
    }

    #[test]
    fn test_update_roles_only_does_not_touch_profile() {
        let dto = UpdateAdminUser::from_json(&json!({ "roleIds": [] })).unwrap();
        assert!(!dto.is_empty());
        assert!(!dto.touches_profile());
    }

    #[test]
    fn test_set_roles() {
        let dto = SetRoles::from_json(&json!({ "roleIds": [1, 2] })).unwrap();
        assert_eq!(dto.role_ids, vec![RoleId::new(1), RoleId::new(2)]);

        let empty = SetRoles::from_json(&json!({ "roleIds": [] })).unwrap();
        assert!(empty.role_ids.is_empty());

        let errors = SetRoles::from_json(&json!({ "roleIds": ["a"] })).unwrap_err();
        assert_eq!(
            errors.message_for("roleIds"),
            Some("each value in roleIds must be a number")
        );

        let errors = SetRoles::from_json(&json!({})).unwrap_err();
        assert_eq!(errors.fields(), vec!["roleIds"]);
    }

    #[test]
    fn test_reset_password_length() {
        let errors = ResetPassword::from_json(&json!({ "newPassword": "12345" })).unwrap_err();
        assert_eq!(
            errors.message_for("newPassword"),
            Some("Password must be at least 6 characters long")
        );

        let dto = ResetPassword::from_json(&json!({ "newPassword": "123456" })).unwrap();
        assert_eq!(dto.new_password.expose_secret(), "123456");
    }

    #[test]
    fn test_reset_password_rejects_blank() {
        let errors = ResetPassword::from_json(&json!({ "newPassword": "      " })).unwrap_err();
        assert_eq!(
            errors.message_for("newPassword"),
            Some("newPassword should not be empty")
        );

        let mut payload = valid_create();
        payload["password"] = json!("      ");
        let create = CreateAdminUser::from_json(&payload).unwrap_err();
        assert_eq!(
            create.message_for("password"),
            Some("password should not be empty")
        );
    }

    #[test]
    fn test_unique_role_ids_keeps_first_occurrence() {
        let ids = [RoleId::new(2), RoleId::new(1), RoleId::new(2), RoleId::new(3)];
        assert_eq!(
            unique_role_ids(&ids),
            vec![RoleId::new(2), RoleId::new(1), RoleId::new(3)]
        );
    }
}
