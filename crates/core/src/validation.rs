//! Batch validation of untyped JSON payloads.
//!
//! A [`Schema`] is an ordered list of fields, each with a presence rule and a
//! list of [`Rule`]s. [`Schema::validate`] evaluates every field and collects
//! one [`FieldError`] per violated field, so a client sees all of its mistakes
//! in a single response. Within one field, evaluation stops at the first
//! failing rule.
//!
//! ```
//! use serde_json::json;
//! use storedesk_core::validation::{Rule, Schema};
//!
//! let schema = Schema::new("login")
//!     .required("email", [Rule::string(), Rule::email()])
//!     .required("password", [Rule::string(), Rule::not_empty()]);
//!
//! let errors = schema.validate(&json!({ "email": "nope" })).unwrap_err();
//! assert_eq!(errors.fields(), vec!["email", "password"]);
//! ```

use core::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::Email;

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the payload, or `$` for the whole payload.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// Every field a payload violated, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// A rejection of the payload as a whole.
    #[must_use]
    pub fn whole(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: "$".to_owned(),
                message: message.into(),
            }],
        }
    }

    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the violated fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// The message recorded for `field`, if it was violated.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false for a value returned by [`Schema::validate`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "validation failed: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// The predicate half of a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A JSON string.
    String,
    /// A string that is not blank.
    NotEmpty,
    /// A string accepted by [`Email::parse`].
    Email,
    /// A JSON boolean.
    Boolean,
    /// A JSON array.
    Array,
    /// An array whose elements are all JSON numbers.
    EachNumber,
    /// An array whose elements are all integers in `1..=i32::MAX`.
    EachPositiveId,
    /// A string of at least this many characters.
    MinLength(usize),
}

impl Check {
    fn holds(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::NotEmpty => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Self::Email => value.as_str().is_some_and(|s| Email::parse(s).is_ok()),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::EachNumber => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_number)),
            Self::EachPositiveId => value.as_array().is_some_and(|items| {
                items.iter().all(|item| {
                    item.as_i64()
                        .is_some_and(|n| n >= 1 && i32::try_from(n).is_ok())
                })
            }),
            Self::MinLength(min) => value.as_str().is_some_and(|s| s.chars().count() >= min),
        }
    }

    fn default_message(self, field: &str) -> String {
        match self {
            Self::String => format!("{field} must be a string"),
            Self::NotEmpty => format!("{field} should not be empty"),
            Self::Email => format!("{field} must be an email"),
            Self::Boolean => format!("{field} must be a boolean value"),
            Self::Array => format!("{field} must be an array"),
            Self::EachNumber => format!("each value in {field} must be a number"),
            Self::EachPositiveId => format!("each value in {field} must be a positive integer"),
            Self::MinLength(min) => {
                format!("{field} must be longer than or equal to {min} characters")
            }
        }
    }
}

/// A predicate plus the message reported when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    check: Check,
    message: Option<&'static str>,
}

impl Rule {
    /// Wrap a [`Check`] with its default message.
    #[must_use]
    pub const fn new(check: Check) -> Self {
        Self {
            check,
            message: None,
        }
    }

    /// Replace the default message.
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::new(Check::String)
    }

    #[must_use]
    pub const fn not_empty() -> Self {
        Self::new(Check::NotEmpty)
    }

    #[must_use]
    pub const fn email() -> Self {
        Self::new(Check::Email)
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(Check::Boolean)
    }

    #[must_use]
    pub const fn array() -> Self {
        Self::new(Check::Array)
    }

    #[must_use]
    pub const fn each_number() -> Self {
        Self::new(Check::EachNumber)
    }

    #[must_use]
    pub const fn each_positive_id() -> Self {
        Self::new(Check::EachPositiveId)
    }

    #[must_use]
    pub const fn min_length(min: usize) -> Self {
        Self::new(Check::MinLength(min))
    }

    fn message(&self, field: &str) -> String {
        self.message
            .map_or_else(|| self.check.default_message(field), |m| m.to_owned())
    }
}

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing or `null` is a violation.
    Required,
    /// Missing or `null` means "not provided"; rules are skipped.
    Optional,
}

/// One field of a [`Schema`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    presence: Presence,
    rules: Vec<Rule>,
}

impl FieldSpec {
    /// Field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field presence rule.
    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    fn check(&self, value: Option<&Value>) -> Result<(), String> {
        match value {
            None | Some(Value::Null) => match self.presence {
                Presence::Required => Err(format!("{} should not be empty", self.name)),
                Presence::Optional => Ok(()),
            },
            Some(value) => self
                .rules
                .iter()
                .find(|rule| !rule.check.holds(value))
                .map_or(Ok(()), |rule| Err(rule.message(self.name))),
        }
    }
}

/// An ordered list of field specifications.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start an empty schema.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a required field.
    #[must_use]
    pub fn required(self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field(name, Presence::Required, rules)
    }

    /// Add an optional field.
    #[must_use]
    pub fn optional(self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field(name, Presence::Optional, rules)
    }

    fn field(
        mut self,
        name: &'static str,
        presence: Presence,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            presence,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Schema name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The fields, in evaluation order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate `payload` against every field.
    ///
    /// On success returns the known, non-null fields of the payload; unknown
    /// fields are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violated field, or a single
    /// `$` error when the payload is not a JSON object.
    pub fn validate(&self, payload: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationErrors::whole("payload must be a JSON object"));
        };

        let mut accepted = Map::new();
        let mut errors = Vec::new();

        for spec in &self.fields {
            let value = object.get(spec.name);
            match spec.check(value) {
                Ok(()) => {
                    if let Some(value) = value.filter(|v| !v.is_null()) {
                        accepted.insert(spec.name.to_owned(), value.clone());
                    }
                }
                Err(message) => errors.push(FieldError {
                    field: spec.name.to_owned(),
                    message,
                }),
            }
        }

        if errors.is_empty() {
            Ok(accepted)
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile_schema() -> Schema {
        Schema::new("profile")
            .required("name", [Rule::string(), Rule::not_empty()])
            .optional("active", [Rule::boolean()])
            .optional("tags", [Rule::array(), Rule::each_number()])
    }

    #[test]
    fn test_collects_every_violated_field() {
        let errors = profile_schema()
            .validate(&json!({ "active": "yes", "tags": "x" }))
            .unwrap_err();

        assert_eq!(errors.fields(), vec!["name", "active", "tags"]);
        assert_eq!(errors.message_for("name"), Some("name should not be empty"));
        assert_eq!(
            errors.message_for("active"),
            Some("active must be a boolean value")
        );
        assert_eq!(errors.message_for("tags"), Some("tags must be an array"));
    }

    #[test]
    fn test_stops_at_first_failing_rule_per_field() {
        let errors = profile_schema().validate(&json!({ "name": 42 })).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message_for("name"), Some("name must be a string"));
    }

    #[test]
    fn test_blank_string_is_empty() {
        let errors = profile_schema().validate(&json!({ "name": "   " })).unwrap_err();
        assert_eq!(errors.message_for("name"), Some("name should not be empty"));
    }

    #[test]
    fn test_null_optional_is_absent() {
        let accepted = profile_schema()
            .validate(&json!({ "name": "Lan", "active": null }))
            .unwrap();
        assert!(!accepted.contains_key("active"));
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let accepted = profile_schema()
            .validate(&json!({ "name": "Lan", "admin": true }))
            .unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted["name"], json!("Lan"));
    }

    #[test]
    fn test_non_object_payload() {
        let errors = profile_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.fields(), vec!["$"]);
    }

    #[test]
    fn test_each_number_element_check() {
        let errors = profile_schema()
            .validate(&json!({ "name": "Lan", "tags": [1, "2"] }))
            .unwrap_err();
        assert_eq!(
            errors.message_for("tags"),
            Some("each value in tags must be a number")
        );
    }

    #[test]
    fn test_positive_id_check() {
        let check = Check::EachPositiveId;
        assert!(check.holds(&json!([1, 2, 3])));
        assert!(check.holds(&json!([])));
        assert!(!check.holds(&json!([0])));
        assert!(!check.holds(&json!([-4])));
        assert!(!check.holds(&json!([1.5])));
        assert!(!check.holds(&json!([3_000_000_000_i64])));
    }

    #[test]
    fn test_min_length_counts_characters() {
        let check = Check::MinLength(6);
        assert!(check.holds(&json!("mậtkhẩu")));
        assert!(!check.holds(&json!("abcde")));
    }

    #[test]
    fn test_custom_message() {
        let schema = Schema::new("reset")
            .required("code", [Rule::min_length(4).with_message("Code is too short")]);
        let errors = schema.validate(&json!({ "code": "ab" })).unwrap_err();
        assert_eq!(errors.message_for("code"), Some("Code is too short"));
    }

    #[test]
    fn test_display_joins_messages() {
        let errors = profile_schema().validate(&json!({})).unwrap_err();
        assert_eq!(errors.to_string(), "validation failed: name should not be empty");
    }
}
