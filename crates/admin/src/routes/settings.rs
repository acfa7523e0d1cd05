//! System settings JSON API.
//!
//! Settings are global key/value pairs; the value is any JSON document.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, put},
};
use serde_json::Value;
use tracing::instrument;

use crate::db::SettingsRepository;
use crate::db::settings::Setting;
use crate::error::AppError;
use crate::middleware::RequireAdministrator;
use crate::state::AppState;

/// Longest accepted setting key.
const MAX_KEY_LENGTH: usize = 100;

/// Build the settings router (mounted under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list))
        .route("/settings/{key}", put(upsert))
}

/// Keys are lowercase dotted identifiers such as `store.currency`.
fn validate_key(key: &str) -> Result<(), AppError> {
    let well_formed = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'));

    if well_formed {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "setting key must be 1-{MAX_KEY_LENGTH} characters of a-z, 0-9, '.', '_' or '-'"
        )))
    }
}

/// GET /api/settings
#[instrument(skip_all)]
async fn list(
    RequireAdministrator(_admin): RequireAdministrator,
    State(state): State<AppState>,
) -> Result<Json<Vec<Setting>>, AppError> {
    let settings = SettingsRepository::new(state.pool()).list().await?;
    Ok(Json(settings))
}

/// PUT /api/settings/{key}
#[instrument(skip(admin, state, value), fields(admin_id = %admin.id))]
async fn upsert(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(key): Path<String>,
    value: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Setting>, AppError> {
    validate_key(&key)?;
    let Json(value) = value?;
    let setting = SettingsRepository::new(state.pool()).set(&key, &value).await?;

    tracing::info!(key = %setting.key, "Setting updated");
    Ok(Json(setting))
}
