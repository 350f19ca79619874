//! Data-fetch history routes

use crate::error::ApiError;
use crate::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use carebridge_schema::{CreateFetchRecord, DataFetchRecord};
use carebridge_storage::StorageError;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListParams {
    search: Option<String>,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DataFetchRecord>>, ApiError> {
    let records = match params.search {
        Some(term) => state.storage.search_fetch_records(&term).await?,
        None => state.storage.fetch_records().await?,
    };
    Ok(Json(records))
}

pub(super) async fn for_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Vec<DataFetchRecord>>, ApiError> {
    Ok(Json(
        state.storage.fetch_records_for_provider(provider_id).await?,
    ))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateFetchRecord>,
) -> Result<(StatusCode, Json<DataFetchRecord>), ApiError> {
    let draft = body.validate()?;
    let record = state
        .storage
        .create_fetch_record(draft)
        .await
        .map_err(|err| match err {
            StorageError::ForeignKey { .. } => {
                ApiError::not_found("Healthcare provider not found")
            }
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(record)))
}
