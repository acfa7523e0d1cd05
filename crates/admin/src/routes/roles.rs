//! Roles JSON API.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::db::RoleRepository;
use crate::error::AppError;
use crate::middleware::RequireAdministrator;
use crate::models::RoleRecord;
use crate::state::AppState;

/// Build the roles router (mounted under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/roles", get(list))
}

/// GET /api/roles
#[instrument(skip_all)]
async fn list(
    RequireAdministrator(_admin): RequireAdministrator,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleRecord>>, AppError> {
    let roles = RoleRepository::new(state.pool()).list_all().await?;
    Ok(Json(roles))
}
