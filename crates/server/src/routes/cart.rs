//! Cart route handlers.
//!
//! Every handler resolves the logged-in customer's user record, then
//! delegates to [`CartService`]. Domain failures surface as 406 through
//! [`AppError`](crate::error::AppError).

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use bazaar_core::ProductId;

use super::resolve_user;
use crate::dto::CartRequest;
use crate::error::{AppError, Result};
use crate::middleware::{RequireCustomer, ValidatedJson};
use crate::services::{CartService, CartView};
use crate::state::AppState;

/// `GET /cart`
#[instrument(skip(state, principal), fields(email = %principal.email))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
) -> Result<Json<CartView>> {
    let user = resolve_user(&state, &principal).await?;
    let cart = CartService::new(state.pool())
        .get_cart_and_total(&user)
        .await?;
    Ok(Json(cart))
}

/// `POST /cart/add`
#[instrument(skip(state, principal, req), fields(email = %principal.email))]
pub async fn add(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
    ValidatedJson(req): ValidatedJson<CartRequest>,
) -> Result<Json<CartView>> {
    let (product_id, quantity) = validated_parts(&req)?;
    let user = resolve_user(&state, &principal).await?;
    let cart = CartService::new(state.pool())
        .add_product_to_cart(product_id, quantity, &user)
        .await?;
    Ok(Json(cart))
}

/// `PUT /cart/reduce`
#[instrument(skip(state, principal, req), fields(email = %principal.email))]
pub async fn reduce(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
    ValidatedJson(req): ValidatedJson<CartRequest>,
) -> Result<Json<CartView>> {
    let (product_id, quantity) = validated_parts(&req)?;
    let user = resolve_user(&state, &principal).await?;
    let cart = CartService::new(state.pool())
        .reduce_product_in_cart(product_id, quantity, &user)
        .await?;
    Ok(Json(cart))
}

/// `DELETE /cart/{product_id}`
#[instrument(skip(state, principal), fields(email = %principal.email))]
pub async fn remove(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let user = resolve_user(&state, &principal).await?;
    let cart = CartService::new(state.pool())
        .remove_product_from_cart(product_id, &user)
        .await?;
    Ok(Json(cart))
}

fn validated_parts(req: &CartRequest) -> Result<(ProductId, u32)> {
    req.parts()
        .ok_or_else(|| AppError::Internal("cart request passed validation incomplete".to_string()))
}
