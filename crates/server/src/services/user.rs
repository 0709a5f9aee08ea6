//! User lookup service.

use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::Email;

use super::ServiceError;
use crate::db::UserRepository;
use crate::models::User;

/// Resolves principals to user records.
pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Fetch the user whose login key is `email`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::UserNotFound` if no user has this email.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_user_by_email(&self, email: &Email) -> Result<User, ServiceError> {
        self.users
            .get_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(email.clone()))
    }
}
