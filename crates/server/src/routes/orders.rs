//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use bazaar_core::OrderId;

use super::resolve_user;
use crate::error::Result;
use crate::middleware::RequireCustomer;
use crate::models::Order;
use crate::services::OrderService;
use crate::state::AppState;

/// `POST /orders` - turn the cart into a pending order.
#[instrument(skip(state, principal), fields(email = %principal.email))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
) -> Result<(StatusCode, Json<Order>)> {
    let user = resolve_user(&state, &principal).await?;
    let order = OrderService::new(state.pool()).checkout(&user).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` - non-archived orders, newest first.
#[instrument(skip(state, principal), fields(email = %principal.email))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
) -> Result<Json<Vec<Order>>> {
    let user = resolve_user(&state, &principal).await?;
    let orders = OrderService::new(state.pool()).list_orders(&user).await?;
    Ok(Json(orders))
}

/// `DELETE /orders/{order_id}` - archive.
#[instrument(skip(state, principal), fields(email = %principal.email))]
pub async fn archive(
    State(state): State<AppState>,
    RequireCustomer(principal): RequireCustomer,
    Path(order_id): Path<OrderId>,
) -> Result<StatusCode> {
    let user = resolve_user(&state, &principal).await?;
    OrderService::new(state.pool())
        .archive_order(order_id, &user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
