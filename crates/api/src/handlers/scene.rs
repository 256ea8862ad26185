//! Handlers for the `/scenes` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyreel_core::error::CoreError;
use storyreel_core::status::GenerationKind;
use storyreel_core::types::DbId;
use storyreel_db::models::scene::{Scene, UpdateScene};
use storyreel_db::repositories::SceneRepo;
use storyreel_pipeline::stage;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/scenes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Scene>> {
    let scene = SceneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Scene", id }))?;
    Ok(Json(scene))
}

/// PUT /api/v1/scenes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScene>,
) -> AppResult<Json<Scene>> {
    if let Some(description) = &input.description {
        storyreel_core::breakdown::validate_description(description)?;
    }
    let scene = SceneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Scene", id }))?;
    Ok(Json(scene))
}

/// DELETE /api/v1/scenes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = SceneRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Scene", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/scenes/{id}/confirm-description
pub async fn confirm_description(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Scene>> {
    let scene = stage::confirm_description(&state.pool, id).await?;
    Ok(Json(scene))
}

/// POST /api/v1/scenes/{id}/confirm-image
pub async fn confirm_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Scene>> {
    let scene = stage::confirm_artifact(&state.pool, id, GenerationKind::Image).await?;
    Ok(Json(scene))
}

/// POST /api/v1/scenes/{id}/confirm-video
pub async fn confirm_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Scene>> {
    let scene = stage::confirm_artifact(&state.pool, id, GenerationKind::Video).await?;
    Ok(Json(scene))
}
