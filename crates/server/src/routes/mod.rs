//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Cart (customer role)
//! GET    /cart                 - Cart and total
//! POST   /cart/add             - Reserve stock into the cart
//! PUT    /cart/reduce          - Return stock from a line
//! DELETE /cart/{product_id}    - Drop a line entirely
//!
//! # Orders (customer role)
//! POST   /orders               - Checkout
//! GET    /orders               - Order history
//! DELETE /orders/{order_id}    - Archive an order
//!
//! # Products (public)
//! GET    /products             - Catalogue
//! GET    /products/{id}        - One product
//!
//! # Auth
//! POST   /auth/login           - Password login
//! POST   /auth/logout          - Logout
//! ```
//!
//! Health endpoints are mounted by the application builder in `lib.rs`.

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::error::Result;
use crate::models::{CurrentUser, User};
use crate::services::UserService;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/reduce", put(cart::reduce))
        .route("/{product_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::checkout))
        .route("/{order_id}", delete(orders::archive))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{product_id}", get(products::show))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .nest("/auth", auth_routes())
}

/// Load the user record behind the session principal.
async fn resolve_user(state: &AppState, principal: &CurrentUser) -> Result<User> {
    Ok(UserService::new(state.pool())
        .get_user_by_email(&principal.email)
        .await?)
}
