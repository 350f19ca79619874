//! HTTP API for the carebridge registry
//!
//! Routes under `/api` map one-to-one onto [`Storage`] operations. The
//! storage instance is injected at router construction, so tests run the
//! full stack against the in-memory backend.

mod error;
mod ehr_systems;
mod history;
mod providers;

pub use error::ApiError;

use axum::Router;
use axum::routing::get;
use carebridge_storage::DynStorage;

/// Shared state available to every handler
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
}

/// Build the API router around an injected storage backend
pub fn router(storage: DynStorage) -> Router {
    let state = AppState { storage };
    Router::new()
        .route(
            "/api/providers",
            get(providers::list).post(providers::create),
        )
        .route(
            "/api/providers/{id}",
            get(providers::get_one)
                .patch(providers::update)
                .delete(providers::remove),
        )
        .route(
            "/api/ehr-systems",
            get(ehr_systems::list).post(ehr_systems::create),
        )
        .route(
            "/api/ehr-systems/{id}",
            get(ehr_systems::get_one).patch(ehr_systems::update),
        )
        .route("/api/data-history", get(history::list).post(history::create))
        .route(
            "/api/data-history/provider/{providerId}",
            get(history::for_provider),
        )
        .with_state(state)
}
