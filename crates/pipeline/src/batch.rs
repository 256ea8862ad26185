//! Batch generation across a project's scenes.
//!
//! Scenes are processed strictly sequentially in `order_index` order.
//! One scene's failure never aborts the batch: it is recorded in that
//! scene's result slot and the orchestrator moves on, so the report
//! always carries one entry per eligible scene.

use sqlx::PgPool;
use std::time::Duration;
use storyreel_core::status::{validate_start, GenerationKind};
use storyreel_core::types::DbId;
use storyreel_db::repositories::scene_repo::SceneRepo;
use storyreel_provider::GenerativeProvider;

use crate::error::{PipelineError, PipelineResult};
use crate::store::ArtifactStore;
use crate::tracker::{self, GenerationRun};

/// Outcome for one scene within a batch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UnitResult {
    pub scene_id: DbId,
    pub order_index: i32,
    pub success: bool,
    /// The poll budget ran out before a terminal answer; the scene is
    /// still `processing` and the task is resumable by its ID.
    pub timed_out: bool,
    /// Completed artifact row, when successful.
    pub artifact_id: Option<DbId>,
    /// Vendor task ID, when a task was submitted (including timeouts).
    pub task_id: Option<String>,
    /// Human-readable reason, when unsuccessful.
    pub error: Option<String>,
}

/// Report for a whole batch run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchResult {
    pub results: Vec<UnitResult>,
    pub succeeded: usize,
    pub failed: usize,
    /// Tasks whose outcome is still unknown; not counted as failed.
    pub timed_out: usize,
    /// Scenes that passed the eligibility check and were attempted.
    pub total_eligible: usize,
}

/// Generate artifacts of `kind` for every eligible scene of a project.
///
/// Eligibility is the scene state machine's start check; ineligible
/// scenes (already confirmed, already processing, precondition unmet)
/// are skipped silently rather than reported as failures. A timed-out
/// poll is an unknown outcome, reported apart from failures: the scene
/// stays `processing` with its task resumable.
pub async fn generate_batch(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    store: &dyn ArtifactStore,
    project_id: DbId,
    kind: GenerationKind,
    poll_interval: Duration,
    max_poll_attempts: u32,
) -> PipelineResult<BatchResult> {
    let scenes = SceneRepo::list_by_project(pool, project_id).await?;
    if scenes.is_empty() {
        return Err(PipelineError::not_found("project_scenes", project_id));
    }

    let mut results = Vec::new();
    for scene in &scenes {
        let progress = scene.progress()?;
        if validate_start(kind, &progress).is_err() {
            tracing::debug!(
                scene_id = scene.id,
                kind = kind.as_str(),
                "Scene not eligible for batch generation, skipping"
            );
            continue;
        }

        let result = run_unit(pool, provider, store, scene.id, kind, poll_interval, max_poll_attempts)
            .await;
        results.push(UnitResult {
            scene_id: scene.id,
            order_index: scene.order_index,
            success: result.success,
            timed_out: result.timed_out,
            artifact_id: result.artifact_id,
            task_id: result.task_id,
            error: result.error,
        });
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    let timed_out = results.iter().filter(|r| r.timed_out).count();
    let failed = results.len() - succeeded - timed_out;
    tracing::info!(
        project_id,
        kind = kind.as_str(),
        succeeded,
        failed,
        timed_out,
        "Batch generation finished"
    );
    Ok(BatchResult {
        total_eligible: results.len(),
        succeeded,
        failed,
        timed_out,
        results,
    })
}

struct UnitOutcome {
    success: bool,
    timed_out: bool,
    artifact_id: Option<DbId>,
    task_id: Option<String>,
    error: Option<String>,
}

/// Run one scene end to end, converting every error into a unit outcome
/// so the caller's loop never aborts.
async fn run_unit(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    store: &dyn ArtifactStore,
    scene_id: DbId,
    kind: GenerationKind,
    poll_interval: Duration,
    max_poll_attempts: u32,
) -> UnitOutcome {
    let started = match tracker::start_generation(pool, provider, scene_id, kind).await {
        Ok(started) => started,
        Err(error) => {
            return UnitOutcome {
                success: false,
                timed_out: false,
                artifact_id: None,
                task_id: None,
                error: Some(error.to_string()),
            };
        }
    };

    match tracker::run_to_terminal(
        pool,
        provider,
        store,
        kind,
        &started.task_id,
        poll_interval,
        max_poll_attempts,
    )
    .await
    {
        Ok(GenerationRun::Completed { artifact_id, .. }) => UnitOutcome {
            success: true,
            timed_out: false,
            artifact_id: Some(artifact_id),
            task_id: Some(started.task_id),
            error: None,
        },
        Ok(GenerationRun::Failed { message }) => UnitOutcome {
            success: false,
            timed_out: false,
            artifact_id: None,
            task_id: Some(started.task_id),
            error: Some(message),
        },
        Ok(GenerationRun::TimedOut { task_id }) => UnitOutcome {
            success: false,
            timed_out: true,
            artifact_id: None,
            task_id: Some(task_id),
            error: Some("Polling timed out; task is still in flight".to_string()),
        },
        Err(error) => UnitOutcome {
            success: false,
            timed_out: false,
            artifact_id: None,
            task_id: Some(started.task_id),
            error: Some(error.to_string()),
        },
    }
}
