//! Unified error handling for admin.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use storedesk_core::{FieldError, ValidationErrors};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request payload was rejected by its schema.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Login or account write failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    /// An unreadable body is reported like any other schema rejection.
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationErrors::whole(rejection.body_text()))
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::Repository(e)) | Self::Database(e) => repository_status(e),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::PasswordHash) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(AuthError::InvalidCredentials | AuthError::Inactive)
            | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

const fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::InvalidReference(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if status.is_server_error() => "Internal server error".to_string(),
            Self::Validation(_) => "validation failed".to_string(),
            Self::Database(e) | Self::Auth(AuthError::Repository(e)) => match e {
                RepositoryError::Conflict(m) | RepositoryError::InvalidReference(m) => m.clone(),
                _ => "Not found".to_string(),
            },
            Self::Auth(e) => e.to_string(),
            _ => self.to_string(),
        };

        let errors = match &self {
            Self::Validation(errors) => Some(errors.errors()),
            _ => None,
        };

        (
            status,
            Json(ErrorBody {
                error: &message,
                errors,
            }),
        )
            .into_response()
    }
}

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("admin user 7".to_string());
        assert_eq!(err.to_string(), "Not found: admin user 7");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_status_codes() {
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::Conflict("email already exists".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RepositoryError::InvalidReference("unknown role id".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::DataCorruption("bad row".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_error_body_lists_fields() {
        let errors = storedesk_core::dto::SetRoles::from_json(&serde_json::json!({
            "roleIds": ["a"]
        }))
        .unwrap_err();

        let body = body_json(AppError::Validation(errors)).await;
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["errors"][0]["field"], "roleIds");
        assert_eq!(
            body["errors"][0]["message"],
            "each value in roleIds must be a number"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_validation_error() {
        let rejection = Json::<serde_json::Value>::from_bytes(b"{\"name\": ").unwrap_err();
        let err = AppError::from(rejection);
        assert!(matches!(err, AppError::Validation(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["errors"][0]["field"], "$");
        assert!(!body["errors"][0]["message"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::Repository(RepositoryError::Conflict("email already exists".to_string())).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AuthError::PasswordHash.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let body = body_json(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("errors").is_none());
    }
}
