//! Generation task lifecycle: create, poll, finalize.
//!
//! Persistence happens placeholder-first: the vendor task ID is written
//! to a new artifact version row *before* the scene flips to
//! `processing`, so a crashed process can always resume from the
//! database. Finalization is idempotent — an already-completed row is
//! reported as completed without touching the provider.

use sqlx::PgPool;
use std::time::Duration;
use storyreel_core::error::CoreError;
use storyreel_core::polling::{poll_until_terminal, PollOutcome, TerminalResult};
use storyreel_core::status::{validate_start, GenerationKind, GenerationStatus};
use storyreel_core::types::DbId;
use storyreel_db::models::artifact::CompletedArtifact;
use storyreel_db::repositories::image_repo::ImageRepo;
use storyreel_db::repositories::project_repo::ProjectRepo;
use storyreel_db::repositories::scene_repo::SceneRepo;
use storyreel_db::repositories::video_repo::VideoRepo;
use storyreel_provider::{CreateJobRequest, GenerativeProvider, JobStatus};

use crate::error::{PipelineError, PipelineResult};
use crate::store::ArtifactStore;

/// A freshly submitted generation task.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StartedGeneration {
    pub scene_id: DbId,
    /// The placeholder artifact row awaiting finalization.
    pub artifact_id: DbId,
    pub task_id: String,
}

/// Result of one finalization attempt for an in-flight task.
#[derive(Debug, Clone)]
pub enum FinalizeOutcome {
    /// The provider has not finished yet; nothing was persisted.
    StillProcessing,
    /// The artifact is persisted and the scene is `completed`.
    Completed {
        artifact_id: DbId,
        url: String,
        /// Set when the download or local write failed; the provider URL
        /// is still authoritative and the generation still counts as a
        /// success.
        warning: Option<String>,
    },
    /// The provider reported failure; the placeholder was discarded and
    /// the scene is `failed`.
    Failed { message: String },
}

/// Result of driving a task to a terminal state with a bounded poll loop.
#[derive(Debug, Clone)]
pub enum GenerationRun {
    Completed {
        artifact_id: DbId,
        url: String,
        warning: Option<String>,
    },
    Failed {
        message: String,
    },
    /// The poll bound was exhausted; the scene stays `processing` and
    /// the task can be resumed later by task ID.
    TimedOut {
        task_id: String,
    },
}

/// Submit a generation task for one scene.
///
/// Validates the scene's state machine first, then submits to the
/// provider, inserts the placeholder version row, and finally flips the
/// scene to `processing`. If the provider rejects the submission the
/// scene is marked `failed` before the error propagates, so status and
/// error never disagree.
pub async fn start_generation(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    scene_id: DbId,
    kind: GenerationKind,
) -> PipelineResult<StartedGeneration> {
    let scene = SceneRepo::find_by_id(pool, scene_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("scene", scene_id))?;

    validate_start(kind, &scene.progress()?)?;

    if !provider.is_configured() {
        return Err(CoreError::NotConfigured(
            "Generation provider is not configured".to_string(),
        )
        .into());
    }

    let project = ProjectRepo::find_by_id(pool, scene.project_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("project", scene.project_id))?;

    let request = match kind {
        GenerationKind::Image => CreateJobRequest::image(&scene.description, project.style.clone()),
        GenerationKind::Video => {
            // validate_start guarantees a completed image exists.
            let image = ImageRepo::latest_completed_for_scene(pool, scene_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!("scene {scene_id} has no completed image"))
                })?;
            CreateJobRequest::video(
                &scene.description,
                project.style.clone(),
                Some(image.url),
                None,
            )
        }
    };

    submit(pool, provider, scene_id, kind, &request).await
}

/// Submit a prepared job request and persist the in-flight state.
///
/// Shared by [`start_generation`] and video continuation, which builds
/// its own request seeded from the parent's last frame.
pub(crate) async fn submit(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    scene_id: DbId,
    kind: GenerationKind,
    request: &CreateJobRequest,
) -> PipelineResult<StartedGeneration> {
    let created = match provider.create_job(request).await {
        Ok(created) => created,
        Err(error) => {
            SceneRepo::set_status(pool, scene_id, kind, GenerationStatus::Failed).await?;
            tracing::error!(scene_id, kind = kind.as_str(), %error, "Job submission failed");
            return Err(error.into());
        }
    };

    let artifact_id = match kind {
        GenerationKind::Image => {
            ImageRepo::create_in_flight(pool, scene_id, &created.job_id)
                .await?
                .id
        }
        GenerationKind::Video => {
            VideoRepo::create_in_flight(pool, scene_id, &created.job_id)
                .await?
                .id
        }
    };
    SceneRepo::set_status(pool, scene_id, kind, GenerationStatus::Processing).await?;

    tracing::info!(
        scene_id,
        kind = kind.as_str(),
        task_id = %created.job_id,
        artifact_id,
        "Generation task submitted"
    );
    Ok(StartedGeneration {
        scene_id,
        artifact_id,
        task_id: created.job_id,
    })
}

/// Poll one in-flight task once and persist the outcome if terminal.
///
/// Safe to call repeatedly and from multiple entry points (status
/// endpoint, worker sweeper): a row that is no longer in flight is
/// reported as completed without another provider call.
pub async fn finalize_if_ready(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    store: &dyn ArtifactStore,
    kind: GenerationKind,
    task_id: &str,
) -> PipelineResult<FinalizeOutcome> {
    let (artifact_id, scene_id, version, in_flight, existing_url) = match kind {
        GenerationKind::Image => {
            let image = ImageRepo::find_by_task_id(pool, task_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Validation(format!("No image task with ID {task_id}"))
                })?;
            (image.id, image.scene_id, image.version, image.is_in_flight(), image.url)
        }
        GenerationKind::Video => {
            let video = VideoRepo::find_by_task_id(pool, task_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Validation(format!("No video task with ID {task_id}"))
                })?;
            (video.id, video.scene_id, video.version, video.is_in_flight(), video.url)
        }
    };

    if !in_flight {
        return Ok(FinalizeOutcome::Completed {
            artifact_id,
            url: existing_url,
            warning: None,
        });
    }

    let poll = provider.poll_job(task_id).await?;
    match poll.status {
        JobStatus::Pending | JobStatus::Processing => Ok(FinalizeOutcome::StillProcessing),
        JobStatus::Failed => {
            let message = poll
                .error_message
                .unwrap_or_else(|| "Provider reported failure without a message".to_string());
            match kind {
                GenerationKind::Image => ImageRepo::delete(pool, artifact_id).await?,
                GenerationKind::Video => VideoRepo::delete(pool, artifact_id).await?,
            };
            SceneRepo::set_status(pool, scene_id, kind, GenerationStatus::Failed).await?;
            tracing::warn!(scene_id, task_id, kind = kind.as_str(), message, "Generation failed");
            Ok(FinalizeOutcome::Failed { message })
        }
        JobStatus::Completed => {
            let url = poll.artifact_url.ok_or_else(|| {
                storyreel_provider::ProviderError::InvalidResponse(
                    "Completed job carried no artifact URL".to_string(),
                )
            })?;

            // Download failure does not fail the generation: the provider
            // URL stands in for the local copy and a warning is surfaced.
            let (storage_path, warning) = match provider.download_artifact(&url).await {
                Ok(bytes) => match store.put(kind, scene_id, version, &bytes).await {
                    Ok(path) => (path, None),
                    Err(error) => (
                        String::new(),
                        Some(format!("Artifact stored remotely only: {error}")),
                    ),
                },
                Err(error) => (
                    String::new(),
                    Some(format!("Artifact download failed: {error}")),
                ),
            };
            if let Some(warning) = &warning {
                tracing::warn!(scene_id, task_id, warning, "Completed with warning");
            }

            let completed = CompletedArtifact {
                storage_path,
                url: url.clone(),
                duration_secs: None,
            };
            match kind {
                GenerationKind::Image => {
                    ImageRepo::complete(pool, artifact_id, &completed).await?;
                }
                GenerationKind::Video => {
                    VideoRepo::complete(pool, artifact_id, &completed).await?;
                }
            }
            SceneRepo::set_status(pool, scene_id, kind, GenerationStatus::Completed).await?;
            tracing::info!(scene_id, task_id, kind = kind.as_str(), "Generation completed");
            Ok(FinalizeOutcome::Completed {
                artifact_id,
                url,
                warning,
            })
        }
    }
}

/// Drive an in-flight task to a terminal state with a bounded poll loop.
///
/// Exhausting the bound yields [`GenerationRun::TimedOut`] and leaves the
/// scene `processing`; a later call (or the worker sweeper) picks the
/// task back up by its ID.
pub async fn run_to_terminal(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    store: &dyn ArtifactStore,
    kind: GenerationKind,
    task_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> PipelineResult<GenerationRun> {
    let result = poll_until_terminal(
        || async move {
            match finalize_if_ready(pool, provider, store, kind, task_id).await? {
                FinalizeOutcome::StillProcessing => Ok::<_, PipelineError>(PollOutcome::InProgress),
                FinalizeOutcome::Completed {
                    artifact_id,
                    url,
                    warning,
                } => Ok(PollOutcome::Completed((artifact_id, url, warning))),
                FinalizeOutcome::Failed { message } => Ok(PollOutcome::Failed(message)),
            }
        },
        interval,
        max_attempts,
    )
    .await?;

    Ok(match result {
        TerminalResult::Completed((artifact_id, url, warning)) => GenerationRun::Completed {
            artifact_id,
            url,
            warning,
        },
        TerminalResult::Failed(message) => GenerationRun::Failed { message },
        TerminalResult::TimedOut => {
            tracing::warn!(task_id, kind = kind.as_str(), "Poll bound exhausted, task still in flight");
            GenerationRun::TimedOut {
                task_id: task_id.to_string(),
            }
        }
    })
}
