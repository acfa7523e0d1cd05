//! Authentication route handlers for admin.
//!
//! Email and password login, logout, and switching the active role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use storedesk_core::Role;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data. No `Debug`: it carries the password.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Role switch form data.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

/// Map an error code from the query string to a message.
fn login_error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "inactive" => "This account has been deactivated.",
        "session" => "Could not start a session. Please try again.",
        _ => "Login failed. Please try again.",
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
        .route("/role", post(switch_role))
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the login page.
///
/// GET /auth/login
async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(login_error_message),
    }
}

/// Handle login form submission.
///
/// POST /auth/login
#[instrument(skip_all, fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());
    let password = SecretString::from(form.password);

    let user = match auth.login_with_password(&form.email, &password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed: invalid credentials");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
        Err(AuthError::Inactive) => {
            tracing::warn!("Login refused: inactive account");
            return Redirect::to("/auth/login?error=inactive").into_response();
        }
        Err(e) => return AppError::from(e).into_response(),
    };

    // New session id on privilege change
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(user.id.as_i32(), Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, role = %user.role, "Admin logged in");

    Redirect::to("/").into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to flush session on logout: {e}");
    }
    clear_sentry_user();

    Redirect::to("/auth/login")
}

/// Switch the active role to another assigned role.
///
/// POST /role
#[instrument(skip(user, session), fields(user_id = %user.id))]
async fn switch_role(
    RequireAuth(mut user): RequireAuth,
    session: Session,
    Form(form): Form<RoleForm>,
) -> Result<Redirect, AppError> {
    let role: Role = form
        .role
        .parse()
        .map_err(|e: storedesk_core::RoleParseError| AppError::BadRequest(e.to_string()))?;

    apply_role_switch(&mut user, role)?;

    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(role = %role, "Active role switched");
    Ok(Redirect::to("/"))
}

fn apply_role_switch(user: &mut CurrentUser, role: Role) -> Result<(), AppError> {
    if user.switch_role(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("role {role} is not assigned to you")))
    }
}
