//! Database migration command.
//!
//! Applies `crates/server/migrations/` and creates the tower-sessions table.
//! The server never migrates on startup.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Running session store migrations...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
