//! Domain models for the shop.
//!
//! These types are validated domain objects, separate from database row
//! types. Cart and stock rules live here as plain methods so they can be
//! exercised without a database.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartError, CartLine};
pub use order::{NewOrder, Order, OrderItem};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
