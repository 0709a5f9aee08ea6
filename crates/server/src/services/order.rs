//! Order service: checkout, history and archiving.

use sqlx::PgPool;
use tracing::{info, instrument};

use bazaar_core::OrderId;

use super::ServiceError;
use crate::db::OrderRepository;
use crate::models::{Order, User};

/// Order operations for a resolved user.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for everything in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmptyCart` if the cart has no lines.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn checkout(&self, user: &User) -> Result<Order, ServiceError> {
        let order = self
            .orders
            .checkout(user.id)
            .await?
            .ok_or(ServiceError::EmptyCart)?;

        info!(order_id = %order.id, total = %order.total_price, "order placed");
        Ok(order)
    }

    /// The user's non-archived orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_orders(&self, user: &User) -> Result<Vec<Order>, ServiceError> {
        Ok(self.orders.list_for_customer(user.id).await?)
    }

    /// Archive one of the user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderNotFound` if the order doesn't exist or
    /// belongs to someone else.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn archive_order(&self, order_id: OrderId, user: &User) -> Result<(), ServiceError> {
        if !self.orders.archive(user.id, order_id).await? {
            return Err(ServiceError::OrderNotFound(order_id));
        }

        info!(%order_id, "order archived");
        Ok(())
    }
}
