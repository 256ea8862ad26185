//! Integration tests for batch generation.
//!
//! One scene's failure must not abort the batch, and ineligible scenes
//! are skipped rather than reported as failures.

use std::time::Duration;

use sqlx::PgPool;
use storyreel_core::status::{GenerationKind, GenerationStatus};
use storyreel_db::repositories::SceneRepo;
use storyreel_pipeline::batch;
use storyreel_provider::{JobPoll, JobStatus};

mod support;
use support::{scene_ready_for_image, MemoryStore, MockProvider};

fn completed_poll(url: &str) -> JobPoll {
    JobPoll {
        status: JobStatus::Completed,
        artifact_url: Some(url.to_string()),
        error_message: None,
    }
}

fn failed_poll(message: &str) -> JobPoll {
    JobPoll {
        status: JobStatus::Failed,
        artifact_url: None,
        error_message: Some(message.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Test: all scenes succeed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_all_succeed(pool: PgPool) {
    let project_id = support::create_project(&pool, "BatchOk").await;
    let s0 = scene_ready_for_image(&pool, project_id, 0).await;
    let s1 = scene_ready_for_image(&pool, project_id, 1).await;

    let provider = MockProvider::new();
    provider.script_create("t0");
    provider.script_create("t1");
    // Scripted polls pop in submission order: the batch is sequential.
    provider.script_poll(completed_poll("https://cdn.example/0.png"));
    provider.script_poll(completed_poll("https://cdn.example/1.png"));
    let store = MemoryStore::new();

    let report = batch::generate_batch(
        &pool,
        &provider,
        &store,
        project_id,
        GenerationKind::Image,
        Duration::ZERO,
        3,
    )
    .await
    .unwrap();

    assert_eq!(report.total_eligible, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.results[0].scene_id, s0);
    assert_eq!(report.results[1].scene_id, s1);
    assert!(report.results.iter().all(|r| r.success));
}

// ---------------------------------------------------------------------------
// Test: one failure does not abort the batch (scenario E)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_isolates_failures(pool: PgPool) {
    let project_id = support::create_project(&pool, "BatchFail").await;
    let s0 = scene_ready_for_image(&pool, project_id, 0).await;
    let s1 = scene_ready_for_image(&pool, project_id, 1).await;
    let s2 = scene_ready_for_image(&pool, project_id, 2).await;

    let provider = MockProvider::new();
    provider.script_create("t0");
    provider.script_create("t1");
    provider.script_create("t2");
    provider.script_poll(completed_poll("https://cdn.example/0.png"));
    provider.script_poll(failed_poll("content rejected"));
    provider.script_poll(completed_poll("https://cdn.example/2.png"));
    let store = MemoryStore::new();

    let report = batch::generate_batch(
        &pool,
        &provider,
        &store,
        project_id,
        GenerationKind::Image,
        Duration::ZERO,
        3,
    )
    .await
    .unwrap();

    assert_eq!(report.total_eligible, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);

    let failed = &report.results[1];
    assert_eq!(failed.scene_id, s1);
    assert!(!failed.success);
    assert_eq!(failed.error.as_deref(), Some("content rejected"));

    // The scenes around the failure completed normally.
    for scene_id in [s0, s2] {
        let scene = SceneRepo::find_by_id(&pool, scene_id).await.unwrap().unwrap();
        assert_eq!(scene.image_status, GenerationStatus::Completed.id());
    }
    let scene = SceneRepo::find_by_id(&pool, s1).await.unwrap().unwrap();
    assert_eq!(scene.image_status, GenerationStatus::Failed.id());
}

// ---------------------------------------------------------------------------
// Test: ineligible scenes are skipped silently
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_skips_ineligible_scenes(pool: PgPool) {
    let project_id = support::create_project(&pool, "BatchSkip").await;
    // s0 has no confirmed description, s1 is eligible.
    support::create_scene(&pool, project_id, 0).await;
    let s1 = scene_ready_for_image(&pool, project_id, 1).await;

    let provider = MockProvider::new();
    provider.script_create("t1");
    provider.script_poll(completed_poll("https://cdn.example/1.png"));
    let store = MemoryStore::new();

    let report = batch::generate_batch(
        &pool,
        &provider,
        &store,
        project_id,
        GenerationKind::Image,
        Duration::ZERO,
        3,
    )
    .await
    .unwrap();

    assert_eq!(report.total_eligible, 1);
    assert_eq!(report.results[0].scene_id, s1);
    assert_eq!(report.succeeded, 1);
}

// ---------------------------------------------------------------------------
// Test: a poll timeout is an unknown outcome, not a failure
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_reports_timeout_separately(pool: PgPool) {
    let project_id = support::create_project(&pool, "BatchTimeout").await;
    let s0 = scene_ready_for_image(&pool, project_id, 0).await;

    let provider = MockProvider::stuck("t0");
    let store = MemoryStore::new();

    let report = batch::generate_batch(
        &pool,
        &provider,
        &store,
        project_id,
        GenerationKind::Image,
        Duration::ZERO,
        2,
    )
    .await
    .unwrap();

    assert_eq!(report.total_eligible, 1);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.timed_out, 1);

    let unit = &report.results[0];
    assert!(!unit.success);
    assert!(unit.timed_out);
    assert_eq!(unit.task_id.as_deref(), Some("t0"));

    // The scene is still processing and its task remains resumable.
    let scene = SceneRepo::find_by_id(&pool, s0).await.unwrap().unwrap();
    assert_eq!(scene.image_status, GenerationStatus::Processing.id());
}

// ---------------------------------------------------------------------------
// Test: a project with no scenes is an error
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_requires_scenes(pool: PgPool) {
    let project_id = support::create_project(&pool, "BatchEmpty").await;
    let provider = MockProvider::new();
    let store = MemoryStore::new();

    let result = batch::generate_batch(
        &pool,
        &provider,
        &store,
        project_id,
        GenerationKind::Image,
        Duration::ZERO,
        3,
    )
    .await;
    assert!(result.is_err());
}
