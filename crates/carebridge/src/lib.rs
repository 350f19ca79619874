//! Healthcare provider onboarding and EHR integration registry
//!
//! This crate ties the workspace together:
//! - Entity schema and validation (`carebridge-schema`)
//! - Storage backends (`carebridge-storage`)
//! - The HTTP API (`carebridge-server`)
//!
//! # Example
//!
//! ```ignore
//! use carebridge::{MemoryStorage, router};
//! use std::sync::Arc;
//!
//! let app = router(Arc::new(MemoryStorage::new()));
//! // serve `app` with axum
//! ```

// Re-export all public APIs from internal crates
pub use carebridge_schema as schema;
pub use carebridge_server as server;
pub use carebridge_storage as storage;

// Convenience re-exports
pub use carebridge_schema::{
    DataFetchRecord, EhrSystem, HealthcareProvider, ProviderStatus, ProviderType, User,
    ValidationError,
};
pub use carebridge_server::router;
pub use carebridge_storage::{
    DynStorage, MemoryStorage, PostgresConfig, PostgresStorage, Storage, StorageError,
};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
