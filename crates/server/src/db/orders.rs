//! Order repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use bazaar_core::{OrderId, OrderStatus, Price, ProductId, UserId};

use super::{RepositoryError, carts, to_column, to_count};
use crate::models::{Cart, NewOrder, Order, OrderItem};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: UserId,
    created_at: DateTime<Utc>,
    total_price: Decimal,
    status: OrderStatus,
    is_archived: bool,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

fn to_price(value: Decimal, context: &str) -> Result<Price, RepositoryError> {
    Price::new(value).map_err(|e| RepositoryError::DataCorruption(format!("{context}: {e}")))
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: to_count(row.quantity, "quantity")?,
            unit_price: to_price(row.unit_price, "order item unit price")?,
        })
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        Ok(Order {
            id: self.id,
            created_at: self.created_at,
            customer_id: self.customer_id,
            total_price: to_price(self.total_price, "order total")?,
            status: self.status,
            archived: self.is_archived,
            items,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn the user's cart into a pending order and empty the cart.
    ///
    /// Stock was already reserved when items entered the cart, so products
    /// are not touched. Returns `None` when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back in that case.
    #[instrument(skip(self))]
    pub async fn checkout(&self, user_id: UserId) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id = carts::lock_cart(&mut tx, user_id).await?;
        let cart = Cart {
            id: cart_id,
            user_id,
            lines: carts::load_lines(&mut tx, cart_id).await?,
        };

        let Some(new_order) = NewOrder::from_cart(&cart) else {
            return Ok(None);
        };

        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO shop.purchase_order (customer_id, total_price, status)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, created_at, total_price, status, is_archived
            ",
        )
        .bind(new_order.customer_id)
        .bind(new_order.total_price)
        .bind(new_order.status)
        .fetch_one(&mut *tx)
        .await?;

        for (line_no, item) in (1_i32..).zip(&new_order.items) {
            sqlx::query(
                r"
                INSERT INTO shop.order_item
                    (order_id, line_no, product_id, product_name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(row.id)
            .bind(line_no)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(to_column(item.quantity, "quantity")?)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        let cleared = carts::clear(&mut tx, cart_id).await?;
        tx.commit().await?;

        debug!(order_id = %row.id, lines = cleared, "checkout complete");
        row.into_order(new_order.items).map(Some)
    }

    /// List a customer's non-archived orders, newest first, with items in
    /// the order they were placed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn list_for_customer(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, created_at, total_price, status, is_archived
            FROM shop.purchase_order
            WHERE customer_id = $1 AND NOT is_archived
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT order_id, product_id, product_name, quantity, unit_price
            FROM shop.order_item
            WHERE order_id = ANY($1)
            ORDER BY order_id, line_no
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            let order_id = item.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(OrderItem::try_from(item)?);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }

    /// Archive (soft delete) one of a customer's orders.
    ///
    /// Returns `false` if no such order belongs to the customer. Archiving an
    /// already archived order succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self))]
    pub async fn archive(&self, user_id: UserId, order_id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.purchase_order
            SET is_archived = TRUE
            WHERE id = $1 AND customer_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
