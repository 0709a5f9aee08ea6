//! Domain error type shared by the cart, order and user services.

use thiserror::Error;

use bazaar_core::{Email, OrderId, ProductId};

use crate::db::RepositoryError;
use crate::models::CartError;

/// Errors returned by services.
///
/// Every variant except `Repository` is a domain error: an expected outcome
/// of a customer action, reported back to the caller as such.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User with email {0} not found")]
    UserNotFound(Email),

    #[error("Product with id {0} not found")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Cannot place an order from an empty cart")]
    EmptyCart,

    #[error("Order with id {0} not found")]
    OrderNotFound(OrderId),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Whether this is a domain error rather than an infrastructure failure.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}
