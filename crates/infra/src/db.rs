//! Database adapters (connection pool, schema migration).

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

use crate::config::Config;

/// The single schema script, embedded at compile time.
const INIT_SCHEMA: &str = include_str!("../migrations/0001_init.sql");

/// Open the shared connection pool.
#[instrument(skip(config), fields(max_connections = config.db_max_connections), err)]
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.db_dsn)
        .await?;
    info!("database pool ready");
    Ok(pool)
}

/// Apply the embedded schema. Every statement is `IF NOT EXISTS`, so running
/// it against an initialized database changes nothing.
#[instrument(skip(pool), err)]
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(INIT_SCHEMA).execute(pool).await?;
    info!("schema migration applied");
    Ok(())
}
