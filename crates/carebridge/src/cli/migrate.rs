//! Migrate command implementation

use anyhow::{Context, Result};
use carebridge_storage::{PostgresConfig, PostgresStorage};

/// Configuration for the migrate command
pub struct MigrateConfig {
    pub database_url: String,
}

/// Create any missing tables, then exit
pub async fn migrate(config: MigrateConfig) -> Result<()> {
    PostgresStorage::new(PostgresConfig::new(&config.database_url).with_run_migrations(true))
        .await
        .context("migration failed")?;
    tracing::info!("database schema is up to date");
    Ok(())
}
