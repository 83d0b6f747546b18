use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::ContingentDto;
use crate::api::validation::ContingentInput;
use crate::auth::Actor;
use crate::database::models::{Contingent, Entity};
use crate::database::store::{ParentRef, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/Contingent
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ContingentDto>> {
    let contingents = Repository::<Contingent>::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(
        contingents.into_iter().map(ContingentDto::from).collect(),
    ))
}

/// GET /api/Contingent/inc/:id
pub async fn get_with_athletes(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<ContingentDto> {
    let Path(id) = path?;
    let contingent = Repository::<Contingent>::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(Contingent::kind()))?;
    let athletes = state
        .store
        .athletes_by_parent(ParentRef::Contingent(id))
        .await?;
    Ok(ApiResponse::success(ContingentDto::with_athletes(contingent, athletes)))
}

/// GET /api/Contingent/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<ContingentDto> {
    let Path(id) = path?;
    let contingent = Repository::<Contingent>::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(Contingent::kind()))?;
    Ok(ApiResponse::success(ContingentDto::from(contingent)))
}

/// POST /api/Contingent
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    payload: Result<Json<ContingentInput>, JsonRejection>,
) -> ApiResult<ContingentDto> {
    let Json(input) = payload?;
    let fields = input.into_create()?;

    let saved = state
        .guard
        .create(&actor, Contingent::new(fields.code, fields.name))
        .await?;

    let location = format!("{}/{}", Contingent::kind().route(), saved.id);
    Ok(ApiResponse::created(ContingentDto::from(saved)).with_location(location))
}

/// PUT /api/Contingent/:id - Contingents carry no row version, so the last write wins
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ContingentInput>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let fields = input.into_update(id)?;

    state
        .guard
        .update(&actor, id, None, move |contingent: &mut Contingent| {
            contingent.code = fields.code;
            contingent.name = fields.name;
        })
        .await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /api/Contingent/:id
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.guard.delete::<Contingent>(&actor, id).await?;
    Ok(ApiResponse::no_content())
}
