//! Public product catalogue.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use bazaar_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// `GET /products`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /products/{product_id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product with id {product_id} not found")))
}
