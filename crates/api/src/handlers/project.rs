//! Handlers for the `/projects` resource.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use storyreel_core::error::CoreError;
use storyreel_core::status::GenerationKind;
use storyreel_core::types::DbId;
use storyreel_db::models::chain::VideoChain;
use storyreel_db::models::project::{CreateProject, Project, UpdateProject};
use storyreel_db::models::scene::Scene;
use storyreel_db::repositories::{ProjectRepo, SceneRepo, VideoChainRepo};
use storyreel_pipeline::batch::{self, BatchResult};
use storyreel_pipeline::stage;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }
    let project = ProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/scenes
pub async fn list_scenes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Scene>>> {
    let scenes = SceneRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(scenes))
}

/// Request body for adding a single scene in free mode.
#[derive(serde::Deserialize)]
pub struct AddSceneRequest {
    pub description: String,
}

/// POST /api/v1/projects/{id}/scenes
pub async fn add_scene(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddSceneRequest>,
) -> AppResult<(StatusCode, Json<Scene>)> {
    storyreel_core::breakdown::validate_description(&input.description)?;
    let scene = SceneRepo::append(&state.pool, id, &input.description, "free").await?;
    Ok((StatusCode::CREATED, Json(scene)))
}

/// POST /api/v1/projects/{id}/scenes/generate
///
/// Breaks the project story into scenes, replacing any existing set.
pub async fn generate_scenes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<Vec<Scene>>)> {
    let scenes = stage::generate_scenes(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(scenes)))
}

/// Response for confirm-all.
#[derive(Serialize)]
pub struct ConfirmAllResponse {
    pub confirmed: u64,
}

/// POST /api/v1/projects/{id}/scenes/confirm-all
pub async fn confirm_all_descriptions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ConfirmAllResponse>> {
    let confirmed = stage::confirm_all_descriptions(&state.pool, id).await?;
    Ok(Json(ConfirmAllResponse { confirmed }))
}

/// POST /api/v1/projects/{id}/generate-images
pub async fn generate_images(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BatchResult>> {
    run_batch(&state, id, GenerationKind::Image).await
}

/// POST /api/v1/projects/{id}/generate-videos
pub async fn generate_videos(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BatchResult>> {
    run_batch(&state, id, GenerationKind::Video).await
}

async fn run_batch(
    state: &AppState,
    project_id: DbId,
    kind: GenerationKind,
) -> AppResult<Json<BatchResult>> {
    let report = batch::generate_batch(
        &state.pool,
        state.provider.as_ref(),
        state.store.as_ref(),
        project_id,
        kind,
        Duration::from_secs(state.config.poll_interval_secs),
        state.config.max_poll_attempts,
    )
    .await?;
    Ok(Json(report))
}

/// GET /api/v1/projects/{id}/chains
pub async fn list_chains(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<VideoChain>>> {
    let chains = VideoChainRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(chains))
}
