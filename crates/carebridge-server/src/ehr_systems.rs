//! EHR system routes

use crate::error::ApiError;
use crate::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use carebridge_schema::{CreateEhrSystem, EhrSystem, EhrSystemPatch};
use uuid::Uuid;

pub(super) async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<EhrSystem>>, ApiError> {
    Ok(Json(state.storage.ehr_systems().await?))
}

pub(super) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EhrSystem>, ApiError> {
    let system = state
        .storage
        .ehr_system(id)
        .await?
        .ok_or(ApiError::not_found("EHR system not found"))?;
    Ok(Json(system))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateEhrSystem>,
) -> Result<(StatusCode, Json<EhrSystem>), ApiError> {
    let draft = body.validate()?;
    let system = state.storage.create_ehr_system(draft).await?;
    Ok((StatusCode::CREATED, Json(system)))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<EhrSystemPatch>,
) -> Result<Json<EhrSystem>, ApiError> {
    let update = body.validate()?;
    let system = state
        .storage
        .update_ehr_system(id, update)
        .await?
        .ok_or(ApiError::not_found("EHR system not found"))?;
    Ok(Json(system))
}
