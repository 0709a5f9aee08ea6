//! Database operations for the shop `PostgreSQL` schema.
//!
//! ## Tables (schema `shop`)
//!
//! - `user` - Accounts; email is the login key
//! - `product` - Catalogue with unreserved stock counts
//! - `cart` / `cart_item` - One cart per user, one row per product line
//! - `purchase_order` / `order_item` - Orders placed at checkout
//!
//! Sessions live in the `tower_sessions` schema managed by the session store.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```
//!
//! # Locking
//!
//! Cart mutations lock the product row first (`FOR NO KEY UPDATE`) and the
//! cart row second. Checkout only locks the cart row, but its `order_item`
//! inserts take `FOR KEY SHARE` on each product through the foreign key.
//! That mode does not conflict with `FOR NO KEY UPDATE`, so a checkout never
//! waits on a product held by a cart mutation that is itself waiting on the
//! checkout's cart.

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::{NewProduct, ProductRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map unique violations to `Conflict`, everything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Convert a non-negative `INTEGER` column into a count.
pub(crate) fn to_count(value: i32, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative {column}: {value}")))
}

/// Convert a count into an `INTEGER` bind parameter.
pub(crate) fn to_column(value: u32, column: &str) -> Result<i32, RepositoryError> {
    i32::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("{column} out of range: {value}")))
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_conversions() {
        assert_eq!(to_count(3, "stock").ok(), Some(3));
        assert!(matches!(
            to_count(-1, "stock"),
            Err(RepositoryError::DataCorruption(_))
        ));
        assert!(to_column(u32::MAX, "quantity").is_err());
    }
}
