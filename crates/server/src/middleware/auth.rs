//! Authentication extractors.
//!
//! The logged-in user is stored in the session by `POST /auth/login`. These
//! extractors read it back and enforce roles.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::warn;

use bazaar_core::UserRole;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user of any role.
///
/// Rejects with 401 when nobody is logged in.
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires a logged-in customer.
///
/// Rejects with 401 when nobody is logged in and 403 when the user has
/// another role.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_cart(RequireCustomer(user): RequireCustomer) -> impl IntoResponse {
///     format!("Cart of {}", user.email)
/// }
/// ```
pub struct RequireCustomer(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if user.role != UserRole::Customer {
            warn!(
                user_id = %user.id,
                role = %user.role,
                path = %parts.uri.path(),
                "customer route denied"
            );
            return Err(AppError::access_denied());
        }

        Ok(Self(user))
    }
}

/// Store the logged-in user in the session.
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
