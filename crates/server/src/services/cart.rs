//! Cart service.
//!
//! Thin orchestration over [`CartRepository::modify`]: the stock rules are
//! the [`Cart`] methods, the repository supplies locking and persistence.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use bazaar_core::{CartId, Price, ProductId};

use super::ServiceError;
use crate::db::{CartRepository, RepositoryError};
use crate::models::{Cart, CartLine, User};

/// One cart line as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// A cart with its computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub id: CartId,
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub total: Price,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            id: cart.id,
            items: cart.lines.iter().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            total: cart.total(),
        }
    }
}

/// Cart operations for a resolved user.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// The user's cart and its total.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_cart_and_total(&self, user: &User) -> Result<CartView, ServiceError> {
        let cart = self.carts.get_or_create(user.id).await?;
        Ok(CartView::from(&cart))
    }

    /// Reserve `quantity` units of a product into the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` for an unknown product and
    /// `CartError::InsufficientStock` when stock is short.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn add_product_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
        user: &User,
    ) -> Result<CartView, ServiceError> {
        let cart = self
            .carts
            .modify(user.id, product_id, |cart, product| {
                cart.add(product, quantity).map_err(ServiceError::from)
            })
            .await
            .map_err(|e| product_not_found(e, product_id))?;

        info!(%product_id, quantity, "added to cart");
        Ok(CartView::from(&cart))
    }

    /// Return `quantity` units of a product from the user's cart to stock.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` for an unknown product,
    /// `CartError::ProductNotInCart` if the cart has no such line and
    /// `CartError::StockLimitExceeded` if the line holds fewer units.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn reduce_product_in_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
        user: &User,
    ) -> Result<CartView, ServiceError> {
        let cart = self
            .carts
            .modify(user.id, product_id, |cart, product| {
                cart.reduce(product, quantity).map_err(ServiceError::from)
            })
            .await
            .map_err(|e| product_not_found(e, product_id))?;

        info!(%product_id, quantity, "reduced in cart");
        Ok(CartView::from(&cart))
    }

    /// Remove a product line from the user's cart entirely.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` for an unknown product and
    /// `CartError::ProductNotInCart` if the cart has no such line.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn remove_product_from_cart(
        &self,
        product_id: ProductId,
        user: &User,
    ) -> Result<CartView, ServiceError> {
        let cart = self
            .carts
            .modify(user.id, product_id, |cart, product| {
                cart.remove(product).map(drop).map_err(ServiceError::from)
            })
            .await
            .map_err(|e| product_not_found(e, product_id))?;

        info!(%product_id, "removed from cart");
        Ok(CartView::from(&cart))
    }
}

/// The repository reports a missing product row as `NotFound`.
fn product_not_found(err: ServiceError, product_id: ProductId) -> ServiceError {
    match err {
        ServiceError::Repository(RepositoryError::NotFound) => {
            ServiceError::ProductNotFound(product_id)
        }
        other => other,
    }
}
