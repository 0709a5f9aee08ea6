//! Request bodies.
//!
//! Fields are `Option` so that a missing field reaches validation and is
//! reported per field instead of failing deserialization as a whole.

use serde::Deserialize;
use validator::Validate;

use bazaar_core::ProductId;

/// Body of `POST /cart/add` and `PUT /cart/reduce`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartRequest {
    #[validate(required(message = "must not be null"))]
    pub product_id: Option<ProductId>,

    #[validate(
        required(message = "must not be null"),
        range(min = 1, message = "must be greater than or equal to 1")
    )]
    pub quantity: Option<u32>,
}

impl CartRequest {
    /// Product and quantity, present once validation has passed.
    #[must_use]
    pub const fn parts(&self) -> Option<(ProductId, u32)> {
        match (self.product_id, self.quantity) {
            (Some(product_id), Some(quantity)) => Some((product_id, quantity)),
            _ => None,
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserLoginRequest {
    #[validate(
        required(message = "must not be null"),
        email(message = "must be a well-formed email address")
    )]
    pub email: Option<String>,

    #[validate(required(message = "must not be null"))]
    pub password: Option<String>,
}
