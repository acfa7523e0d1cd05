//! Authentication middleware and extractors for admin.
//!
//! Provides extractors for requiring a logged-in user, or a logged-in user
//! currently acting as an administrator, in route handlers.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use storedesk_core::Role;

use crate::db::AdminUserRepository;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Rejection returned by the auth extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Logged in, but the active role may not use this resource.
    Forbidden,
    /// The account could not be checked against the database.
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Your current role cannot access this resource",
            )
                .into_response(),
            Self::Unavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Rejection for a request without a usable session.
fn login_rejection(parts: &Parts) -> AuthRejection {
    // Nested routers see a stripped URI
    let path = parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.0.path());
    if path.starts_with("/api/") {
        AuthRejection::Unauthorized
    } else {
        AuthRejection::RedirectToLogin
    }
}

/// Read the current user from the session and reconcile it with the database.
///
/// A deleted or deactivated account ends the session. Role changes made since
/// login are written back to the session.
async fn current_user(parts: &Parts, state: &AppState) -> Result<CurrentUser, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    let user = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| login_rejection(parts))?;

    let users = AdminUserRepository::new(state.pool());
    let refreshed = match users.is_active(user.id).await {
        Ok(Some(is_active)) => {
            let roles = users.role_names(user.id).await.map_err(|e| {
                tracing::error!(user_id = %user.id, "Failed to load session roles: {e}");
                AuthRejection::Unavailable
            })?;
            user.clone().refresh(is_active, roles)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::error!(user_id = %user.id, "Failed to check session account: {e}");
            return Err(AuthRejection::Unavailable);
        }
    };

    let Some(refreshed) = refreshed else {
        tracing::warn!(user_id = %user.id, "Session ended: account deactivated or deleted");
        if let Err(e) = clear_current_user(session).await {
            tracing::warn!("Failed to flush session: {e}");
        }
        return Err(login_rejection(parts));
    };

    if refreshed != user {
        tracing::info!(user_id = %user.id, role = %refreshed.role, "Session roles refreshed");
        if let Err(e) = set_current_user(session, &refreshed).await {
            tracing::warn!("Failed to update session: {e}");
        }
    }
    Ok(refreshed)
}

/// Extractor that requires a logged-in user, whatever their role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state).await.map(Self)
    }
}

/// Extractor that requires the user to be acting as an administrator.
///
/// Not logged in: redirect (pages) or 401 (`/api/`). Other active role: 403.
pub struct RequireAdministrator(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdministrator {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user(parts, state).await?;
        if user.role != Role::Administrator {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to end the session (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot delete the record.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthRejection::RedirectToLogin.into_response().status(),
            StatusCode::SEE_OTHER
        );
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_unauthorized() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/api/admin-users")
            .body(())
            .unwrap()
            .into_parts();

        let rejection = RequireAuth::from_request_parts(&mut parts, &AppState::for_tests())
            .await
            .err();
        assert_eq!(rejection, Some(AuthRejection::Unauthorized));
    }

    #[test]
    fn test_login_rejection_uses_original_uri() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/admin-users")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(login_rejection(&parts), AuthRejection::RedirectToLogin);

        parts.extensions.insert(OriginalUri(
            "/api/admin-users".parse().unwrap(),
        ));
        assert_eq!(login_rejection(&parts), AuthRejection::Unauthorized);
    }

    #[test]
    fn test_unavailable_is_server_error() {
        assert_eq!(
            AuthRejection::Unavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
