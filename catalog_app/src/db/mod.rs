// catalog_app/src/db/mod.rs

pub mod product_store;

pub use product_store::PgCatalogStore;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Opens the connection pool. Connecting eagerly makes a bad config fail at startup.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.max_connections)
    .connect_with(config.connect_options()?)
    .await?;
  tracing::info!(max_connections = config.max_connections, "Successfully connected to the database.");
  Ok(pool)
}
