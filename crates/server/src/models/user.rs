//! User domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{Email, UserId, UserRole};

/// A shop account (domain type).
///
/// The password hash is deliberately absent; it is only loaded by the login
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Login key, unique across users.
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

