use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Creates the PostgreSQL pool that backs resume profiles.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL (max {max_connections} connections)...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Could not connect to DATABASE_URL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Round-trips a trivial query. Used by the readiness probe.
pub async fn ping(pool: &PgPool) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Database ping failed: {e}");
            false
        }
    }
}
