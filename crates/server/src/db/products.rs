//! Product repository.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use bazaar_core::{Price, ProductId};

use super::{RepositoryError, to_column, to_count};
use crate::models::Product;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock: i32,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price)
            .map_err(|e| RepositoryError::DataCorruption(format!("product {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price,
            stock: to_count(row.stock, "stock")?,
        })
    }
}

/// Parameters for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub stock: u32,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, stock
            FROM shop.product
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, stock
            FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO shop.product (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, stock
            ",
        )
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.price)
        .bind(to_column(product.stock, "stock")?)
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }
}

/// Load a product and hold its row lock until the transaction ends.
///
/// `FOR NO KEY UPDATE` still serializes stock writers but lets foreign-key
/// checks (`FOR KEY SHARE`) from a concurrent checkout through.
pub(super) async fn lock_for_update(
    conn: &mut PgConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row: Option<ProductRow> = sqlx::query_as(
        r"
        SELECT id, name, description, price, stock
        FROM shop.product
        WHERE id = $1
        FOR NO KEY UPDATE
        ",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Product::try_from).transpose()
}

/// Write back a product's stock count.
pub(super) async fn update_stock(
    conn: &mut PgConnection,
    product: &Product,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE shop.product
        SET stock = $1, updated_at = NOW()
        WHERE id = $2
        ",
    )
    .bind(to_column(product.stock, "stock")?)
    .bind(product.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
