//! Login and logout.

use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::dto::UserLoginRequest;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{ValidatedJson, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// `POST /auth/login`
///
/// Cycles the session ID before storing the user to prevent fixation.
#[instrument(skip(state, session, req))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(req): ValidatedJson<UserLoginRequest>,
) -> Result<Json<CurrentUser>> {
    let (Some(email), Some(password)) = (req.email.as_deref(), req.password.as_deref()) else {
        return Err(AppError::Internal(
            "login request passed validation incomplete".to_string(),
        ));
    };

    let user = AuthService::new(state.pool()).login(email, password).await?;
    let current = CurrentUser::from(&user);

    session.cycle_id().await?;
    set_current_user(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));

    Ok(Json(current))
}

/// `POST /auth/logout`
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session.flush().await?;
    clear_sentry_user();
    info!("user logged out");
    Ok(StatusCode::NO_CONTENT)
}
