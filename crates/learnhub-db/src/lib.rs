//! # LearnHub DB
//!
//! PostgreSQL pool initialization and the embedded schema migrator.
//!
//! ```ignore
//! let config = DatabaseConfig::from_env()?;
//! let pool = learnhub_db::init_db_pool(&config).await?;
//! learnhub_db::MIGRATOR.run(&pool).await?;
//! ```

use std::time::Duration;

use learnhub_config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Migrations under the workspace `migrations/` directory, embedded at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a connection pool sized by `config.max_connections`.
///
/// The returned pool is cheap to clone and is shared through the
/// application state.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );

    Ok(pool)
}

/// Applies pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
