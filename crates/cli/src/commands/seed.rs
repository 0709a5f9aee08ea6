//! Seed products from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Wool scarf
//!     description: Hand-knitted, one size
//!     price: "25.00"
//!     stock: 12
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use bazaar_core::Price;
use bazaar_server::db::{NewProduct, ProductRepository};

use super::{CommandError, connect};

#[derive(Debug, Deserialize)]
struct SeedFile {
    products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Decimal,
    stock: u32,
}

/// Parse and validate a seed file before touching the database.
fn parse(content: &str) -> Result<Vec<NewProduct>, CommandError> {
    let file: SeedFile =
        serde_yaml::from_str(content).map_err(|e| CommandError::Seed(e.to_string()))?;

    file.products
        .into_iter()
        .map(|p| {
            if p.name.trim().is_empty() {
                return Err(CommandError::Seed("product name cannot be empty".to_string()));
            }
            let price = Price::new(p.price)
                .map_err(|e| CommandError::Seed(format!("{}: {e}", p.name)))?;
            Ok(NewProduct {
                name: p.name,
                description: p.description,
                price,
                stock: p.stock,
            })
        })
        .collect()
}

/// Insert every product in `path`.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or an insert fails.
pub async fn products(path: &str) -> Result<(), CommandError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: path.to_owned(),
            source,
        })?;
    let products = parse(&content)?;
    info!(count = products.len(), path, "Parsed seed file");

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    for product in &products {
        let created = repo.create(product).await?;
        info!(product_id = %created.id, name = %created.name, stock = created.stock, "Inserted product");
    }

    info!("Seeding complete!");
    Ok(())
}
