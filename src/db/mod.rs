use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::types::AppResult;

pub use operations::*;
pub use pool::*;

pub mod pool;
pub mod operations;

/// Open (or create) the SQLite file named by `config.url`.
///
/// Idle connections are never reaped so that `sqlite::memory:` databases
/// survive for the lifetime of the pool.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    info!(url = %config.url, "Opening SQLite database");

    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    // Test connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    Ok(pool)
}

/// Apply the embedded migrations from `./migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Pool with the schema in place, ready for the router.
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    info!("Database migrations completed");
    Ok(pool)
}
