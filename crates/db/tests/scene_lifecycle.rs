//! Integration tests for project/scene CRUD and status transitions.
//!
//! Exercises `ProjectRepo` and `SceneRepo` against a real database:
//! - Project creation defaults and stage advancement guard
//! - Scene replacement (regeneration deletes first) and free-mode append
//! - Description confirmation, single and bulk
//! - Status columns and the confirmed-implies-completed guard

use sqlx::PgPool;
use storyreel_core::stage::ProjectStage;
use storyreel_core::status::{GenerationKind, GenerationStatus};
use storyreel_db::models::project::CreateProject;
use storyreel_db::models::scene::CreateScene;
use storyreel_db::repositories::{ProjectRepo, SceneRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        story: Some("A knight rides out.\n\nShe returns at dusk.".to_string()),
        style: None,
        mode: None,
    }
}

fn new_scene(project_id: i64, order_index: i32) -> CreateScene {
    CreateScene {
        project_id,
        order_index,
        description: format!("Scene {order_index}"),
        mode: None,
    }
}

// ---------------------------------------------------------------------------
// Test: project creation defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_project_defaults(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Quest")).await.unwrap();

    assert!(project.id > 0, "id should be auto-generated");
    assert_eq!(project.stage, ProjectStage::Draft.id());
    assert_eq!(project.mode, "story");
}

// ---------------------------------------------------------------------------
// Test: stage advancement is monotonic at the SQL level
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_advance_stage_is_monotonic(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Stages")).await.unwrap();

    let advanced = ProjectRepo::advance_stage(&pool, project.id, ProjectStage::Images)
        .await
        .unwrap()
        .expect("forward advance should match");
    assert_eq!(advanced.stage, ProjectStage::Images.id());

    // A stale advance to an earlier (or equal) stage matches no row.
    let regressed = ProjectRepo::advance_stage(&pool, project.id, ProjectStage::Scenes)
        .await
        .unwrap();
    assert!(regressed.is_none(), "stage must never decrease");

    let same = ProjectRepo::advance_stage(&pool, project.id, ProjectStage::Images)
        .await
        .unwrap();
    assert!(same.is_none(), "re-advancing to the current stage is a no-op");

    let reloaded = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(reloaded.stage, ProjectStage::Images.id());
}

// ---------------------------------------------------------------------------
// Test: replace_for_project regenerates the scene set
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_scenes_deletes_then_inserts(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Replace")).await.unwrap();
    SceneRepo::create(&pool, &new_scene(project.id, 0)).await.unwrap();
    SceneRepo::create(&pool, &new_scene(project.id, 1)).await.unwrap();

    let descriptions = vec![
        "Dawn breaks".to_string(),
        "The river".to_string(),
        "The castle".to_string(),
    ];
    let scenes = SceneRepo::replace_for_project(&pool, project.id, &descriptions)
        .await
        .unwrap();

    assert_eq!(scenes.len(), 3);
    let listed = SceneRepo::list_by_project(&pool, project.id).await.unwrap();
    assert_eq!(listed.len(), 3, "old scenes should be gone");
    for (index, scene) in listed.iter().enumerate() {
        assert_eq!(scene.order_index, index as i32);
        assert_eq!(scene.description, descriptions[index]);
        assert_eq!(scene.image_status, GenerationStatus::Pending.id());
        assert!(!scene.description_confirmed);
    }
}

// ---------------------------------------------------------------------------
// Test: append assigns the next order_index
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_append_scene_orders_after_existing(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Append")).await.unwrap();

    let first = SceneRepo::append(&pool, project.id, "Opening", "free").await.unwrap();
    let second = SceneRepo::append(&pool, project.id, "Next", "free").await.unwrap();

    assert_eq!(first.order_index, 0);
    assert_eq!(second.order_index, 1);
    assert_eq!(second.mode, "free");
}

// ---------------------------------------------------------------------------
// Test: bulk description confirmation counts newly confirmed scenes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_confirm_all_descriptions(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Confirm")).await.unwrap();
    let scenes = SceneRepo::replace_for_project(
        &pool,
        project.id,
        &["a".to_string(), "b".to_string(), "c".to_string()],
    )
    .await
    .unwrap();

    SceneRepo::confirm_description(&pool, scenes[0].id).await.unwrap();

    let confirmed = SceneRepo::confirm_all_descriptions(&pool, project.id).await.unwrap();
    assert_eq!(confirmed, 2, "only previously unconfirmed scenes count");

    let listed = SceneRepo::list_by_project(&pool, project.id).await.unwrap();
    assert!(listed.iter().all(|s| s.description_confirmed));
}

// ---------------------------------------------------------------------------
// Test: confirm_artifact requires completed status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_confirm_artifact_requires_completed(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Gate")).await.unwrap();
    let scene = SceneRepo::create(&pool, &new_scene(project.id, 0)).await.unwrap();

    // Pending image cannot be confirmed.
    let rejected = SceneRepo::confirm_artifact(&pool, scene.id, GenerationKind::Image)
        .await
        .unwrap();
    assert!(rejected.is_none(), "confirm must require completed status");

    SceneRepo::set_status(&pool, scene.id, GenerationKind::Image, GenerationStatus::Completed)
        .await
        .unwrap();
    let confirmed = SceneRepo::confirm_artifact(&pool, scene.id, GenerationKind::Image)
        .await
        .unwrap()
        .expect("completed image should confirm");
    assert!(confirmed.image_confirmed);
    assert_eq!(confirmed.image_status, GenerationStatus::Completed.id());
}

// ---------------------------------------------------------------------------
// Test: image and video sub-machines are independent columns
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_status_columns_are_independent(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Independent")).await.unwrap();
    let scene = SceneRepo::create(&pool, &new_scene(project.id, 0)).await.unwrap();

    SceneRepo::set_status(&pool, scene.id, GenerationKind::Image, GenerationStatus::Processing)
        .await
        .unwrap();
    let reloaded = SceneRepo::find_by_id(&pool, scene.id).await.unwrap().unwrap();

    assert_eq!(reloaded.image_status, GenerationStatus::Processing.id());
    assert_eq!(reloaded.video_status, GenerationStatus::Pending.id());
}
