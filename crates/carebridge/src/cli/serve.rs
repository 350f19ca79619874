//! Serve command implementation

use anyhow::{Context, Result};
use carebridge_server::router;
use carebridge_storage::{DynStorage, MemoryStorage, PostgresConfig, create_postgres_storage};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Configuration for the serve command
pub struct ServeConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub memory: bool,
    pub pool_size: u32,
}

/// Run the HTTP API until the process is stopped
pub async fn serve(config: ServeConfig) -> Result<()> {
    let storage = build_storage(&config).await?;
    let app = router(storage);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "carebridge listening");
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}

async fn build_storage(config: &ServeConfig) -> Result<DynStorage> {
    if config.memory {
        tracing::warn!("using in-memory storage; data is lost on exit");
        return Ok(Arc::new(MemoryStorage::new()));
    }
    let url = config
        .database_url
        .as_deref()
        .context("--database-url (or DATABASE_URL) is required unless --memory is set")?;
    let storage = create_postgres_storage(
        PostgresConfig::new(url).with_pool_size(config.pool_size),
    )
    .await
    .context("failed to connect to the database")?;
    Ok(storage)
}
