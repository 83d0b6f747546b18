use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::SportDto;
use crate::api::validation::SportInput;
use crate::auth::Actor;
use crate::database::models::{Entity, Sport};
use crate::database::store::{ParentRef, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/Sport - All sports, without athletes
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<SportDto>> {
    let sports = Repository::<Sport>::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(sports.into_iter().map(SportDto::from).collect()))
}

/// GET /api/Sport/inc/:id - One sport with its athletes
pub async fn get_with_athletes(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<SportDto> {
    let Path(id) = path?;
    let sport = Repository::<Sport>::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(Sport::kind()))?;
    let athletes = state.store.athletes_by_parent(ParentRef::Sport(id)).await?;
    Ok(ApiResponse::success(SportDto::with_athletes(sport, athletes)))
}

/// GET /api/Sport/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<SportDto> {
    let Path(id) = path?;
    let sport = Repository::<Sport>::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(Sport::kind()))?;
    Ok(ApiResponse::success(SportDto::from(sport)))
}

/// POST /api/Sport
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    payload: Result<Json<SportInput>, JsonRejection>,
) -> ApiResult<SportDto> {
    let Json(input) = payload?;
    let fields = input.into_create()?;

    let saved = state
        .guard
        .create(&actor, Sport::new(fields.code, fields.name))
        .await?;

    let location = format!("{}/{}", Sport::kind().route(), saved.id);
    Ok(ApiResponse::created(SportDto::from(saved)).with_location(location))
}

/// PUT /api/Sport/:id - Full update guarded by the caller's row version
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SportInput>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let (fields, token) = input.into_update(id)?;

    state
        .guard
        .update(&actor, id, Some(token), move |sport: &mut Sport| {
            sport.code = fields.code;
            sport.name = fields.name;
        })
        .await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /api/Sport/:id
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.guard.delete::<Sport>(&actor, id).await?;
    Ok(ApiResponse::no_content())
}
