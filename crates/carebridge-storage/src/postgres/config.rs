//! Configuration for the PostgreSQL backend

/// Connection settings for [`super::PostgresStorage`]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    database_url: String,
    pool_size: u32,
    run_migrations: bool,
}

impl PostgresConfig {
    /// Configuration with defaults: five pooled connections, migrations on
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size: 5,
            run_migrations: true,
        }
    }

    /// Set the maximum number of pooled connections
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Control whether connecting also creates missing tables
    pub fn with_run_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn pool_size(&self) -> u32 {
        self.pool_size
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations
    }
}
