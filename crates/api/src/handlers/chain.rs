//! Handlers for video chains and continuation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use storyreel_core::types::DbId;
use storyreel_db::models::chain::{CreateVideoChain, VideoChain, VideoChainItem};
use storyreel_db::repositories::VideoChainRepo;
use storyreel_pipeline::chain::{self, ChainWithItems, ContinueVideoResult};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/chains
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateVideoChain>,
) -> AppResult<(StatusCode, Json<VideoChain>)> {
    let created = VideoChainRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/chains/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ChainWithItems>> {
    let chain = chain::get_chain(&state.pool, id).await?;
    Ok(Json(chain))
}

/// Request body for appending an existing video to a chain.
#[derive(Deserialize)]
pub struct AppendItemRequest {
    pub video_id: DbId,
    pub parent_video_id: Option<DbId>,
}

/// POST /api/v1/chains/{id}/items
pub async fn append_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AppendItemRequest>,
) -> AppResult<(StatusCode, Json<VideoChainItem>)> {
    let item =
        chain::append_to_chain(&state.pool, id, input.video_id, input.parent_video_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/videos/{video_id}/chain
///
/// Returns `null` for a video outside any chain.
pub async fn lookup_for_video(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<Option<ChainWithItems>>> {
    let membership = chain::lookup_chain_for_video(&state.pool, video_id).await?;
    Ok(Json(membership))
}

/// Request body for generating a continuation clip.
#[derive(Deserialize)]
pub struct ContinueRequest {
    /// Scene that receives the new clip.
    pub scene_id: DbId,
    /// Prompt for the clip; defaults to the scene's stored description.
    #[serde(default)]
    pub description: Option<String>,
    /// Pre-extracted first-frame source; skips local frame extraction.
    #[serde(default)]
    pub last_frame_url: Option<String>,
}

/// POST /api/v1/videos/{video_id}/continue
pub async fn continue_video(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Json(input): Json<ContinueRequest>,
) -> AppResult<(StatusCode, Json<ContinueVideoResult>)> {
    let result = chain::continue_video(
        &state.pool,
        state.provider.as_ref(),
        state.extractor.as_ref(),
        video_id,
        input.scene_id,
        input.description.as_deref(),
        input.last_frame_url.as_deref(),
    )
    .await?;
    Ok((StatusCode::ACCEPTED, Json(result)))
}
