use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::AthleteDto;
use crate::api::validation::AthleteInput;
use crate::auth::Actor;
use crate::database::models::{Athlete, Contingent, Entity, Sport};
use crate::database::store::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/Athlete - All athletes ordered by last then first name
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<AthleteDto>> {
    let athletes = Repository::<Athlete>::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(athletes.into_iter().map(AthleteDto::from).collect()))
}

/// GET /api/Athlete/inc/:id - One athlete with its sport and contingent
pub async fn get_with_parents(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<AthleteDto> {
    let Path(id) = path?;
    let store = state.store.as_ref();
    let athlete = Repository::<Athlete>::find(store, id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(Athlete::kind()))?;
    let sport = Repository::<Sport>::find(store, athlete.sport_id).await?;
    let contingent = Repository::<Contingent>::find(store, athlete.contingent_id).await?;
    Ok(ApiResponse::success(AthleteDto::with_parents(athlete, sport, contingent)))
}

/// GET /api/Athlete/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<AthleteDto> {
    let Path(id) = path?;
    let athlete = Repository::<Athlete>::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(Athlete::kind()))?;
    Ok(ApiResponse::success(AthleteDto::from(athlete)))
}

/// POST /api/Athlete
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    payload: Result<Json<AthleteInput>, JsonRejection>,
) -> ApiResult<AthleteDto> {
    let Json(input) = payload?;
    let fields = input.into_create()?;

    let saved = state.guard.create(&actor, Athlete::new(fields)).await?;
    tracing::info!("Registered athlete {} ({})", saved.full_name(), saved.athlete_code);

    let location = format!("{}/{}", Athlete::kind().route(), saved.id);
    Ok(ApiResponse::created(AthleteDto::from(saved)).with_location(location))
}

/// PUT /api/Athlete/:id - Full update guarded by the caller's row version
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<AthleteInput>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let (fields, token) = input.into_update(id)?;

    state
        .guard
        .update(&actor, id, Some(token), move |athlete: &mut Athlete| {
            athlete.apply(fields)
        })
        .await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /api/Athlete/:id
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.guard.delete::<Athlete>(&actor, id).await?;
    Ok(ApiResponse::no_content())
}
