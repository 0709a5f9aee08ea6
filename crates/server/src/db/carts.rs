//! Cart repository.
//!
//! Carts are created lazily the first time a user touches them. Mutations
//! run inside one transaction: lock the product, lock the cart, apply the
//! domain operation in memory, then write back the product's stock and the
//! affected cart line.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use bazaar_core::{CartId, Price, ProductId, UserId};

use super::{RepositoryError, products, to_column, to_count};
use crate::models::{Cart, CartLine, Product};

#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: ProductId,
    name: String,
    price: Decimal,
    quantity: i32,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let unit_price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.product_id))
        })?;

        Ok(Self {
            product_id: row.product_id,
            name: row.name,
            unit_price,
            quantity: to_count(row.quantity, "quantity")?,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating an empty one if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let cart_id = ensure_cart(&mut conn, user_id).await?;
        let lines = load_lines(&mut conn, cart_id).await?;

        Ok(Cart {
            id: cart_id,
            user_id,
            lines,
        })
    }

    /// Apply `op` to the user's cart and the product, persisting the result.
    ///
    /// The product and cart rows stay locked from load until commit, so
    /// concurrent operations on the same product or cart serialize. If `op`
    /// fails the transaction is rolled back and nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` (converted into `E`) if the product
    /// does not exist, the error from `op`, or any database error.
    #[instrument(skip(self, op))]
    pub async fn modify<F, E>(&self, user_id: UserId, product_id: ProductId, op: F) -> Result<Cart, E>
    where
        F: FnOnce(&mut Cart, &mut Product) -> Result<(), E> + Send,
        E: From<RepositoryError> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let mut product = products::lock_for_update(&mut tx, product_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let cart_id = lock_cart(&mut tx, user_id).await?;
        let mut cart = Cart {
            id: cart_id,
            user_id,
            lines: load_lines(&mut tx, cart_id).await?,
        };

        op(&mut cart, &mut product)?;

        products::update_stock(&mut tx, &product).await?;
        save_line(&mut tx, cart_id, product_id, cart.line(product_id)).await?;
        touch(&mut tx, cart_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;
        debug!(%cart_id, %product_id, stock = product.stock, "cart updated");

        Ok(cart)
    }
}

/// Insert the user's cart row if missing and return its id.
async fn ensure_cart(conn: &mut PgConnection, user_id: UserId) -> Result<CartId, RepositoryError> {
    let id: CartId = sqlx::query_scalar(
        r"
        INSERT INTO shop.cart (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING id
        ",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Ensure the user's cart exists and hold its row lock until the transaction ends.
pub(super) async fn lock_cart(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<CartId, RepositoryError> {
    ensure_cart(conn, user_id).await?;

    let id: CartId = sqlx::query_scalar(
        r"
        SELECT id FROM shop.cart
        WHERE user_id = $1
        FOR UPDATE
        ",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Load a cart's lines in insertion order, priced from the product table.
pub(super) async fn load_lines(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<Vec<CartLine>, RepositoryError> {
    let rows: Vec<CartLineRow> = sqlx::query_as(
        r"
        SELECT ci.product_id, p.name, p.price, ci.quantity
        FROM shop.cart_item ci
        JOIN shop.product p ON p.id = ci.product_id
        WHERE ci.cart_id = $1
        ORDER BY ci.added_at, ci.product_id
        ",
    )
    .bind(cart_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(CartLine::try_from).collect()
}

/// Persist one line: upsert its quantity, or delete it when absent.
async fn save_line(
    conn: &mut PgConnection,
    cart_id: CartId,
    product_id: ProductId,
    line: Option<&CartLine>,
) -> Result<(), RepositoryError> {
    match line {
        Some(line) => {
            sqlx::query(
                r"
                INSERT INTO shop.cart_item (cart_id, product_id, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity
                ",
            )
            .bind(cart_id)
            .bind(product_id)
            .bind(to_column(line.quantity, "quantity")?)
            .execute(&mut *conn)
            .await?;
        }
        None => {
            sqlx::query(
                r"
                DELETE FROM shop.cart_item
                WHERE cart_id = $1 AND product_id = $2
                ",
            )
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}

/// Delete every line of a cart.
pub(super) async fn clear(conn: &mut PgConnection, cart_id: CartId) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;

    touch(conn, cart_id).await?;
    Ok(result.rows_affected())
}

async fn touch(conn: &mut PgConnection, cart_id: CartId) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE shop.cart SET updated_at = NOW() WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
