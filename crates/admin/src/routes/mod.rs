//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! GET  /auth/login                           - Login page
//! POST /auth/login                           - Email + password login
//! POST /auth/logout                          - Logout
//! POST /role                                 - Switch active role
//!
//! # Dashboard
//! GET  /?tab=<tab>                           - Role-scoped dashboard
//!
//! # API (administrator role)
//! GET    /api/admin-users                    - List admin users
//! POST   /api/admin-users                    - Create admin user
//! GET    /api/admin-users/{id}               - Fetch admin user
//! PATCH  /api/admin-users/{id}               - Update admin user
//! DELETE /api/admin-users/{id}               - Delete admin user
//! PUT    /api/admin-users/{id}/roles         - Replace role assignment
//! POST   /api/admin-users/{id}/reset-password - Reset password
//! GET    /api/roles                          - List roles
//! GET    /api/settings                       - List settings
//! PUT    /api/settings/{key}                 - Upsert a setting
//! ```
//!
//! `/health` and `/health/ready` are mounted by the binary.

pub mod admin_users;
pub mod auth;
pub mod dashboard;
pub mod roles;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the application router (without the session and tracing layers).
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(admin_users::router())
        .merge(roles::router())
        .merge(settings::router());

    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .nest("/api", api)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;

    /// Router with an in-memory session store and a pool that never connects.
    fn app() -> Router {
        routes()
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(AppState::for_tests())
    }

    async fn get(uri: &str) -> axum::response::Response {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_without_session_is_unauthorized() {
        for uri in ["/api/admin-users", "/api/roles", "/api/settings", "/api/admin-users/1"] {
            assert_eq!(get(uri).await.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_dashboard_without_session_redirects_to_login() {
        let resp = get("/?tab=settings").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_login_page_is_public() {
        let resp = get("/auth/login?error=inactive").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("This account has been deactivated."));
    }

    #[tokio::test]
    async fn test_role_switch_without_session_redirects() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/role")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("role=administrator"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
}
