//! Video continuation chains.
//!
//! A chain is a flat ordered list of completed videos; each new clip is
//! seeded with the final frame of its parent. Chain bookkeeping is
//! best-effort: a continuation whose generation task was submitted is a
//! success even if linking the chain rows fails afterwards.

use std::path::Path;

use sqlx::PgPool;
use storyreel_core::error::CoreError;
use storyreel_core::status::{validate_transition, GenerationKind};
use storyreel_core::types::DbId;
use storyreel_db::models::chain::{CreateVideoChain, VideoChain, VideoChainItem};
use storyreel_db::repositories::chain_repo::VideoChainRepo;
use storyreel_db::repositories::image_repo::ImageRepo;
use storyreel_db::repositories::scene_repo::SceneRepo;
use storyreel_db::repositories::video_repo::VideoRepo;
use storyreel_provider::{CreateJobRequest, GenerativeProvider};

use crate::error::{PipelineError, PipelineResult};
use crate::frame::{continuation_source, FrameExtractor};
use crate::tracker;

/// A chain with its ordered members.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChainWithItems {
    pub chain: VideoChain,
    pub items: Vec<VideoChainItem>,
}

/// Result of a continuation request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ContinueVideoResult {
    pub task_id: String,
    /// Placeholder row for the clip being generated.
    pub video_id: DbId,
    /// `None` when chain linking failed; the generation itself still
    /// proceeds and the clip can be linked manually later.
    pub chain_item_id: Option<DbId>,
}

/// Append a completed video to an existing chain.
///
/// A video belongs to at most one chain; membership elsewhere is a
/// conflict (backstopped by `uq_chain_items_video`).
pub async fn append_to_chain(
    pool: &PgPool,
    chain_id: DbId,
    video_id: DbId,
    parent_video_id: Option<DbId>,
) -> PipelineResult<VideoChainItem> {
    VideoChainRepo::find_by_id(pool, chain_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("video_chain", chain_id))?;
    let video = VideoRepo::find_by_id(pool, video_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("video", video_id))?;
    if video.is_in_flight() {
        return Err(CoreError::Validation(
            "Only completed videos can join a chain".to_string(),
        )
        .into());
    }
    if VideoChainRepo::find_item_by_video(pool, video_id)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(format!(
            "Video {video_id} already belongs to a chain"
        ))
        .into());
    }

    let item = VideoChainRepo::append_item(pool, chain_id, video_id, parent_video_id).await?;
    Ok(item)
}

/// Look up the chain a video belongs to, with all its members in order.
pub async fn lookup_chain_for_video(
    pool: &PgPool,
    video_id: DbId,
) -> PipelineResult<Option<ChainWithItems>> {
    let Some(item) = VideoChainRepo::find_item_by_video(pool, video_id).await? else {
        return Ok(None);
    };
    let chain = VideoChainRepo::find_by_id(pool, item.chain_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("video_chain", item.chain_id))?;
    let items = VideoChainRepo::list_items(pool, item.chain_id).await?;
    Ok(Some(ChainWithItems { chain, items }))
}

/// Fetch a chain with its members by chain ID.
pub async fn get_chain(pool: &PgPool, chain_id: DbId) -> PipelineResult<ChainWithItems> {
    let chain = VideoChainRepo::find_by_id(pool, chain_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("video_chain", chain_id))?;
    let items = VideoChainRepo::list_items(pool, chain_id).await?;
    Ok(ChainWithItems { chain, items })
}

/// Generate a continuation of `parent_video_id` onto `scene_id`.
///
/// The new clip is seeded with the parent's last frame (or the scene's
/// image when extraction is unavailable); a caller-supplied
/// `last_frame_url` takes precedence and skips extraction entirely. The
/// clip's prompt is `description` when given, otherwise the scene's
/// stored description. The scene's own image precondition does not
/// apply — only the status-transition rules do. Chain linking afterwards
/// is best-effort: failure is logged and the result carries
/// `chain_item_id: None`.
pub async fn continue_video(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    extractor: &dyn FrameExtractor,
    parent_video_id: DbId,
    scene_id: DbId,
    description: Option<&str>,
    last_frame_url: Option<&str>,
) -> PipelineResult<ContinueVideoResult> {
    if let Some(description) = description {
        storyreel_core::breakdown::validate_description(description)?;
    }
    let parent = VideoRepo::find_by_id(pool, parent_video_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("video", parent_video_id))?;
    if parent.is_in_flight() {
        return Err(CoreError::Validation(
            "Cannot continue from a video that is still generating".to_string(),
        )
        .into());
    }

    let scene = SceneRepo::find_by_id(pool, scene_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("scene", scene_id))?;
    validate_transition(GenerationKind::Video, &scene.progress()?)?;

    if !provider.is_configured() {
        return Err(CoreError::NotConfigured(
            "Generation provider is not configured".to_string(),
        )
        .into());
    }

    let source = match last_frame_url {
        Some(url) => Some(url.to_string()),
        None => {
            let scene_image_url = ImageRepo::latest_completed_for_scene(pool, scene_id)
                .await?
                .map(|image| image.url);
            let parent_path =
                (!parent.storage_path.is_empty()).then(|| Path::new(&parent.storage_path));
            let frame_path =
                std::env::temp_dir().join(format!("storyreel-last-frame-{parent_video_id}.png"));
            continuation_source(
                extractor,
                parent_path,
                &frame_path,
                scene_image_url.as_deref(),
            )
            .await
        }
    };

    let request = CreateJobRequest::video(
        description.unwrap_or(&scene.description),
        None,
        source,
        None,
    );
    let started =
        tracker::submit(pool, provider, scene_id, GenerationKind::Video, &request).await?;

    // Best-effort linking: the generation already succeeded, a linking
    // failure must not undo it.
    let chain_item_id =
        match link_continuation(pool, &parent, parent_video_id, started.artifact_id).await {
            Ok(item) => Some(item.id),
            Err(error) => {
                tracing::warn!(
                    parent_video_id,
                    video_id = started.artifact_id,
                    %error,
                    "Continuation generated but chain linking failed"
                );
                None
            }
        };

    Ok(ContinueVideoResult {
        task_id: started.task_id,
        video_id: started.artifact_id,
        chain_item_id,
    })
}

/// Link a freshly created continuation clip after the parent.
///
/// Reuses the parent's chain when it has one; otherwise creates a chain
/// holding the parent at index 0 and the child at index 1.
async fn link_continuation(
    pool: &PgPool,
    parent: &storyreel_db::models::artifact::Video,
    parent_video_id: DbId,
    child_video_id: DbId,
) -> PipelineResult<VideoChainItem> {
    let chain_id = match VideoChainRepo::find_item_by_video(pool, parent_video_id).await? {
        Some(item) => item.chain_id,
        None => {
            let scene = SceneRepo::find_by_id(pool, parent.scene_id)
                .await?
                .ok_or_else(|| PipelineError::not_found("scene", parent.scene_id))?;
            let chain = VideoChainRepo::create(
                pool,
                &CreateVideoChain {
                    project_id: scene.project_id,
                    name: format!("Chain from video {parent_video_id}"),
                },
            )
            .await?;
            VideoChainRepo::append_item(pool, chain.id, parent_video_id, None).await?;
            chain.id
        }
    };
    let item =
        VideoChainRepo::append_item(pool, chain_id, child_video_id, Some(parent_video_id)).await?;
    Ok(item)
}
