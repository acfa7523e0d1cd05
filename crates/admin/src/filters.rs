//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use storedesk_core::Role;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Human-readable label for a role name; unknown names pass through.
///
/// Usage in templates: `{{ role|role_label }}`
#[askama::filter_fn]
pub fn role_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(raw
        .parse::<Role>()
        .map_or(raw, |role| role.label().to_string()))
}
