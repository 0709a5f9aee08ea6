//! Business logic services.
//!
//! # Services
//!
//! - `user` - Resolve the principal's user record by email
//! - `cart` - Cart contents, stock reservation and totals
//! - `order` - Checkout, order history and archiving
//! - `auth` - Password login
//!
//! Services borrow the pool and are built per request, like the
//! repositories they wrap.

pub mod auth;
pub mod cart;
pub mod error;
pub mod order;
pub mod user;

pub use auth::{AuthError, AuthService};
pub use cart::{CartService, CartView};
pub use error::ServiceError;
pub use order::OrderService;
pub use user::UserService;
