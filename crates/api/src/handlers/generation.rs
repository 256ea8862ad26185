//! Handlers for generation tasks: start, poll, and list versions.
//!
//! Starting a generation returns immediately with the vendor task ID;
//! the client drives completion by polling the task-status endpoint,
//! which finalizes server-side state as soon as the provider reports a
//! terminal status.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use storyreel_core::status::GenerationKind;
use storyreel_core::types::DbId;
use storyreel_db::models::artifact::{Image, Video};
use storyreel_db::repositories::{ImageRepo, VideoRepo};
use storyreel_pipeline::tracker::{self, FinalizeOutcome, StartedGeneration};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Parse the `{kind}` path segment.
fn parse_kind(kind: &str) -> Result<GenerationKind, AppError> {
    match kind {
        "image" => Ok(GenerationKind::Image),
        "video" => Ok(GenerationKind::Video),
        other => Err(AppError::BadRequest(format!(
            "Unknown generation kind '{other}', expected 'image' or 'video'"
        ))),
    }
}

/// POST /api/v1/scenes/{id}/generate-image
pub async fn generate_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<StartedGeneration>)> {
    let started =
        tracker::start_generation(&state.pool, state.provider.as_ref(), id, GenerationKind::Image)
            .await?;
    Ok((StatusCode::ACCEPTED, Json(started)))
}

/// POST /api/v1/scenes/{id}/generate-video
pub async fn generate_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<StartedGeneration>)> {
    let started =
        tracker::start_generation(&state.pool, state.provider.as_ref(), id, GenerationKind::Video)
            .await?;
    Ok((StatusCode::ACCEPTED, Json(started)))
}

/// Task status payload returned to polling clients.
#[derive(Serialize)]
pub struct TaskStatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/v1/generation/tasks/{kind}/{task_id}
///
/// Polls the provider once and finalizes the task if it reached a
/// terminal state. Idempotent: an already-finalized task answers from
/// the database.
pub async fn task_status(
    State(state): State<AppState>,
    Path((kind, task_id)): Path<(String, String)>,
) -> AppResult<Json<TaskStatusResponse>> {
    let kind = parse_kind(&kind)?;
    let outcome = tracker::finalize_if_ready(
        &state.pool,
        state.provider.as_ref(),
        state.store.as_ref(),
        kind,
        &task_id,
    )
    .await?;

    let response = match outcome {
        FinalizeOutcome::StillProcessing => TaskStatusResponse {
            status: "processing",
            artifact_id: None,
            url: None,
            warning: None,
            error: None,
        },
        FinalizeOutcome::Completed {
            artifact_id,
            url,
            warning,
        } => TaskStatusResponse {
            status: "completed",
            artifact_id: Some(artifact_id),
            url: Some(url),
            warning,
            error: None,
        },
        FinalizeOutcome::Failed { message } => TaskStatusResponse {
            status: "failed",
            artifact_id: None,
            url: None,
            warning: None,
            error: Some(message),
        },
    };
    Ok(Json(response))
}

/// GET /api/v1/scenes/{id}/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Image>>> {
    let images = ImageRepo::list_by_scene(&state.pool, id).await?;
    Ok(Json(images))
}

/// GET /api/v1/scenes/{id}/videos
pub async fn list_videos(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Video>>> {
    let videos = VideoRepo::list_by_scene(&state.pool, id).await?;
    Ok(Json(videos))
}
