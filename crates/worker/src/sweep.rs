//! One sweep pass over all in-flight generation tasks.

use chrono::Utc;
use sqlx::PgPool;
use storyreel_core::status::GenerationKind;
use storyreel_core::types::{DbId, Timestamp};
use storyreel_db::repositories::{ImageRepo, VideoRepo};
use storyreel_pipeline::store::ArtifactStore;
use storyreel_pipeline::tracker::{self, FinalizeOutcome};
use storyreel_pipeline::PipelineResult;
use storyreel_provider::GenerativeProvider;

/// Counters for a single sweep pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// In-flight rows found.
    pub scanned: u32,
    /// Tasks finalized as completed this pass.
    pub completed: u32,
    /// Tasks the provider reported as failed (placeholder discarded).
    pub failed: u32,
    /// Tasks still running at the provider.
    pub still_processing: u32,
    /// Tasks whose poll errored; they stay in flight for the next pass.
    pub errors: u32,
}

struct InFlightTask {
    kind: GenerationKind,
    scene_id: DbId,
    task_id: String,
    created_at: Timestamp,
}

/// Poll every in-flight task once and finalize those that finished.
///
/// A poll or persistence error on one task is logged and counted; it
/// never aborts the pass. Tasks older than `expiry_secs` are logged as
/// long-running but left in flight, since only the provider can say
/// whether a job is dead.
pub async fn sweep_once(
    pool: &PgPool,
    provider: &dyn GenerativeProvider,
    store: &dyn ArtifactStore,
    expiry_secs: i64,
) -> PipelineResult<SweepReport> {
    let mut tasks = Vec::new();
    for image in ImageRepo::list_in_flight(pool).await? {
        if let Some(task_id) = image.task_id {
            tasks.push(InFlightTask {
                kind: GenerationKind::Image,
                scene_id: image.scene_id,
                task_id,
                created_at: image.created_at,
            });
        }
    }
    for video in VideoRepo::list_in_flight(pool).await? {
        if let Some(task_id) = video.task_id {
            tasks.push(InFlightTask {
                kind: GenerationKind::Video,
                scene_id: video.scene_id,
                task_id,
                created_at: video.created_at,
            });
        }
    }

    let mut report = SweepReport {
        scanned: tasks.len() as u32,
        ..SweepReport::default()
    };

    for task in tasks {
        let age_secs = (Utc::now() - task.created_at).num_seconds();
        if age_secs > expiry_secs {
            tracing::warn!(
                kind = task.kind.as_str(),
                scene_id = task.scene_id,
                task_id = %task.task_id,
                age_secs,
                "In-flight task exceeds expiry threshold; leaving it to the provider"
            );
        }

        match tracker::finalize_if_ready(pool, provider, store, task.kind, &task.task_id).await {
            Ok(FinalizeOutcome::Completed { artifact_id, warning, .. }) => {
                report.completed += 1;
                tracing::info!(
                    kind = task.kind.as_str(),
                    scene_id = task.scene_id,
                    task_id = %task.task_id,
                    artifact_id,
                    warning = warning.as_deref(),
                    "Swept task to completion"
                );
            }
            Ok(FinalizeOutcome::Failed { message }) => {
                report.failed += 1;
                tracing::warn!(
                    kind = task.kind.as_str(),
                    scene_id = task.scene_id,
                    task_id = %task.task_id,
                    %message,
                    "Provider reported task failure"
                );
            }
            Ok(FinalizeOutcome::StillProcessing) => {
                report.still_processing += 1;
            }
            Err(e) => {
                report.errors += 1;
                tracing::warn!(
                    kind = task.kind.as_str(),
                    scene_id = task.scene_id,
                    task_id = %task.task_id,
                    error = %e,
                    "Sweep poll failed; task stays in flight"
                );
            }
        }
    }

    Ok(report)
}
