//! Connection pool creation and embedded migrations.
//!
//! File databases run in WAL mode with foreign keys on. The in-memory
//! variant keeps exactly one connection alive for the lifetime of the pool,
//! because every new SQLite memory connection is a fresh empty database.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Open a pool for the configured database URL and apply pending migrations.
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    info!(url = %config.url, "Initializing database connection");

    let options = SqliteConnectOptions::from_str(&config.url)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    info!(max_connections = config.max_connections, "Database pool created");

    migrate(&pool).await?;
    Ok(pool)
}

/// Isolated in-memory database, migrated and ready. Used by tests.
pub async fn connect_in_memory() -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    debug!("In-memory database pool created");

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply all pending migrations. Idempotent.
pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
    info!("Database migrations completed");
    Ok(())
}

/// True if the database answers a trivial query.
pub async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
