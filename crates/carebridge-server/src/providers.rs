//! Healthcare provider routes

use crate::error::ApiError;
use crate::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use carebridge_schema::{CreateProvider, HealthcareProvider, ProviderPatch};
use carebridge_storage::StorageError;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListParams {
    search: Option<String>,
    ehr_id: Option<Uuid>,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<HealthcareProvider>>, ApiError> {
    let providers = match (params.search, params.ehr_id) {
        (Some(term), _) => state.storage.search_providers(&term).await?,
        (None, Some(ehr_id)) => state.storage.providers_by_ehr(ehr_id).await?,
        (None, None) => state.storage.providers().await?,
    };
    Ok(Json(providers))
}

pub(super) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HealthcareProvider>, ApiError> {
    let provider = state
        .storage
        .provider(id)
        .await?
        .ok_or(ApiError::not_found("Healthcare provider not found"))?;
    Ok(Json(provider))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProvider>,
) -> Result<(StatusCode, Json<HealthcareProvider>), ApiError> {
    let draft = body.validate()?;
    let provider = state
        .storage
        .create_provider(draft)
        .await
        .map_err(reject_unknown_ehr)?;
    Ok((StatusCode::CREATED, Json(provider)))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProviderPatch>,
) -> Result<Json<HealthcareProvider>, ApiError> {
    let update = body.validate()?;
    let provider = state
        .storage
        .update_provider(id, update)
        .await
        .map_err(reject_unknown_ehr)?
        .ok_or(ApiError::not_found("Healthcare provider not found"))?;
    Ok(Json(provider))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.storage.delete_provider(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Healthcare provider not found"))
    }
}

/// An unknown `ehrId` is the caller's mistake, not a server fault
fn reject_unknown_ehr(err: StorageError) -> ApiError {
    match err {
        StorageError::ForeignKey { .. } => ApiError::Validation(
            carebridge_schema::ValidationError::field("ehrId", "references an unknown EHR system"),
        ),
        other => other.into(),
    }
}
