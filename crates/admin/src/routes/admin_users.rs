//! Admin users JSON API.
//!
//! Every mutation runs its payload through the matching schema in
//! [`storedesk_core::dto`] first; a rejection is returned as a 400 listing
//! every violated field. All endpoints require the administrator role.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post, put},
};
use serde_json::Value;
use tracing::instrument;

use storedesk_core::AdminUserId;
use storedesk_core::dto::{CreateAdminUser, ResetPassword, SetRoles, UpdateAdminUser};

use crate::db::AdminUserRepository;
use crate::error::AppError;
use crate::middleware::RequireAdministrator;
use crate::models::AdminUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Build the admin users router (mounted under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-users", get(list).post(create))
        .route(
            "/admin-users/{id}",
            get(show).patch(update).delete(destroy),
        )
        .route("/admin-users/{id}/roles", put(set_roles))
        .route("/admin-users/{id}/reset-password", post(reset_password))
}

/// GET /api/admin-users
#[instrument(skip_all)]
async fn list(
    RequireAdministrator(_admin): RequireAdministrator,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    let users = AdminUserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// POST /api/admin-users
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn create(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminUser>), AppError> {
    let Json(payload) = payload?;
    let dto = CreateAdminUser::from_json(&payload)?;
    let user = AuthService::new(state.pool()).create_admin(&dto).await?;

    tracing::info!(user_id = %user.id, "Admin user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/admin-users/{id}
#[instrument(skip(_admin, state))]
async fn show(
    RequireAdministrator(_admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(id): Path<AdminUserId>,
) -> Result<Json<AdminUser>, AppError> {
    let user = AdminUserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("admin user {id}")))?;
    Ok(Json(user))
}

/// PATCH /api/admin-users/{id}
///
/// An update with no fields is accepted and returns the user unchanged.
#[instrument(skip(admin, state, payload), fields(admin_id = %admin.id))]
async fn update(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(id): Path<AdminUserId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AdminUser>, AppError> {
    let Json(payload) = payload?;
    let dto = UpdateAdminUser::from_json(&payload)?;
    let users = AdminUserRepository::new(state.pool());

    if dto.is_empty() {
        let user = users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("admin user {id}")))?;
        return Ok(Json(user));
    }

    if id == admin.id && dto.is_active == Some(false) {
        return Err(AppError::BadRequest(
            "you cannot deactivate your own account".to_string(),
        ));
    }

    let user = users.update(id, &dto).await?;
    tracing::info!(user_id = %id, "Admin user updated");
    Ok(Json(user))
}

/// PUT /api/admin-users/{id}/roles
#[instrument(skip(admin, state, payload), fields(admin_id = %admin.id))]
async fn set_roles(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(id): Path<AdminUserId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AdminUser>, AppError> {
    let Json(payload) = payload?;
    let dto = SetRoles::from_json(&payload)?;
    let user = AdminUserRepository::new(state.pool())
        .set_roles(id, &dto.role_ids)
        .await?;

    tracing::info!(user_id = %id, roles = ?user.role_ids, "Role assignment replaced");
    Ok(Json(user))
}

/// POST /api/admin-users/{id}/reset-password
#[instrument(skip(admin, state, payload), fields(admin_id = %admin.id))]
async fn reset_password(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(id): Path<AdminUserId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    let dto = ResetPassword::from_json(&payload)?;
    AuthService::new(state.pool())
        .reset_password(id, &dto)
        .await?;

    tracing::info!(user_id = %id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin-users/{id}
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
async fn destroy(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(id): Path<AdminUserId>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "you cannot delete your own account".to_string(),
        ));
    }

    AdminUserRepository::new(state.pool()).delete(id).await?;
    tracing::info!(user_id = %id, "Admin user deleted");
    Ok(StatusCode::NO_CONTENT)
}
