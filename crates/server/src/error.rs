//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. The `IntoResponse` impl is the
//! single place where errors become HTTP responses:
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | domain (`ServiceError` except `Repository`) | 406 | `{"status": "NOT_ACCEPTABLE", "message": ...}` |
//! | request validation | 400 | `{"field": "message", ...}` |
//! | no logged-in user / bad credentials | 401 | text |
//! | wrong role | 403 | text |
//! | unknown product on public routes | 404 | text |
//! | anything else | 500 | text (the error message) |

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::db::RepositoryError;
use crate::services::{AuthError, ServiceError};

/// Suffix of every access-denied response body.
pub const ACCESS_DENIED_SUFFIX: &str =
    "You do not have the right permissions for this resource/endpoint.";

/// Field name to message, sorted for stable output.
pub type FieldErrors = BTreeMap<String, String>;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart, order or user lookup failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Login failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request body failed validation.
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// No user is logged in.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The user is logged in but lacks the required role.
    #[error("{0}: {suffix}", suffix = ACCESS_DENIED_SUFFIX)]
    Forbidden(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Access denied for the current user.
    #[must_use]
    pub fn access_denied() -> Self {
        Self::Forbidden("Access Denied".to_string())
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) if err.is_domain() => StatusCode::NOT_ACCEPTABLE,
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::InvalidEmail(_) | AuthError::WeakPassword(_))
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Service(_)
            | Self::Auth(_)
            | Self::Database(_)
            | Self::Session(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body for domain errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), ToString::to_string)
                    })
                    .unwrap_or_default();
                (field.to_string(), message)
            })
            .collect();
        Self::Validation(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        match self {
            Self::Service(err) if status == StatusCode::NOT_ACCEPTABLE => (
                status,
                Json(ErrorResponse {
                    status: "NOT_ACCEPTABLE",
                    message: err.to_string(),
                }),
            )
                .into_response(),
            Self::Validation(fields) => (status, Json(fields)).into_response(),
            Self::Auth(AuthError::InvalidCredentials) => {
                (status, "Invalid credentials").into_response()
            }
            Self::Auth(AuthError::InvalidEmail(_)) => {
                (status, "Invalid email address").into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
