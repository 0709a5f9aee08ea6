//! User management commands.
//!
//! Accounts are only created here; the API has no registration endpoint.

use bazaar_core::UserRole;
use bazaar_server::services::AuthService;

use super::{CommandError, connect};

/// Create a user with a hashed password.
///
/// # Errors
///
/// Returns an error if the role, email or password is invalid, or the email
/// is already taken.
pub async fn create(email: &str, password: &str, role: &str) -> Result<(), CommandError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let pool = connect().await?;

    tracing::info!("Creating user: {} ({})", email, role);
    let user = AuthService::new(&pool)
        .create_user(email, password, role)
        .await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(())
}
