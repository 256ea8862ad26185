//! Scene breakdown, confirmations, and reactive stage advancement.
//!
//! Every confirmation re-evaluates the project's stage predicate over
//! all of its scenes; the SQL monotonicity guard in
//! `ProjectRepo::advance_stage` makes concurrent re-evaluations safe.

use sqlx::PgPool;
use storyreel_core::breakdown::{split_story, MAX_SCENES_PER_PROJECT};
use storyreel_core::error::CoreError;
use storyreel_core::stage::{evaluate_advance, ProjectStage};
use storyreel_core::status::{validate_confirm, GenerationKind};
use storyreel_core::types::DbId;
use storyreel_db::models::project::Project;
use storyreel_db::models::scene::Scene;
use storyreel_db::repositories::project_repo::ProjectRepo;
use storyreel_db::repositories::scene_repo::SceneRepo;

use crate::error::{PipelineError, PipelineResult};

/// Break a project's story into scenes, replacing any existing set.
///
/// Allowed at stage `draft` (first breakdown, advances to `scenes`) and
/// at stage `scenes` (regeneration, which discards existing scenes and
/// their artifacts). Once generation work has begun the breakdown is
/// locked: regenerating would orphan confirmed artifacts.
pub async fn generate_scenes(pool: &PgPool, project_id: DbId) -> PipelineResult<Vec<Scene>> {
    let project = find_project(pool, project_id).await?;
    let stage = decode_stage(&project)?;
    if stage > ProjectStage::Scenes {
        return Err(CoreError::Conflict(format!(
            "Scenes can no longer be regenerated at stage {}",
            stage.as_str()
        ))
        .into());
    }

    let descriptions = split_story(&project.story, MAX_SCENES_PER_PROJECT)?;
    let scenes = SceneRepo::replace_for_project(pool, project_id, &descriptions).await?;
    ProjectRepo::advance_stage(pool, project_id, ProjectStage::Scenes).await?;

    tracing::info!(project_id, count = scenes.len(), "Scene breakdown generated");
    Ok(scenes)
}

/// Confirm one scene's description, then re-evaluate the project stage.
pub async fn confirm_description(pool: &PgPool, scene_id: DbId) -> PipelineResult<Scene> {
    let scene = SceneRepo::confirm_description(pool, scene_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("scene", scene_id))?;
    reevaluate_stage(pool, scene.project_id).await?;
    Ok(scene)
}

/// Confirm every description of a project at once. Returns the number of
/// scenes newly confirmed.
pub async fn confirm_all_descriptions(pool: &PgPool, project_id: DbId) -> PipelineResult<u64> {
    find_project(pool, project_id).await?;
    let confirmed = SceneRepo::confirm_all_descriptions(pool, project_id).await?;
    reevaluate_stage(pool, project_id).await?;
    Ok(confirmed)
}

/// Confirm a scene's completed artifact, then re-evaluate the stage.
///
/// Confirmation is irreversible and only legal from `completed`; the
/// repo's SQL guard enforces the same invariant at the database level.
pub async fn confirm_artifact(
    pool: &PgPool,
    scene_id: DbId,
    kind: GenerationKind,
) -> PipelineResult<Scene> {
    let scene = SceneRepo::find_by_id(pool, scene_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("scene", scene_id))?;
    validate_confirm(kind, &scene.progress()?)?;

    let scene = SceneRepo::confirm_artifact(pool, scene_id, kind)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Scene {scene_id} {} is no longer confirmable",
                kind.as_str()
            ))
        })?;
    reevaluate_stage(pool, scene.project_id).await?;
    Ok(scene)
}

/// Re-evaluate the stage predicate and advance the project if every
/// scene satisfies it.
///
/// Returns the stage advanced to, if any. Concurrent calls are safe:
/// the `stage < $2` SQL guard makes stale advances match no row.
pub async fn reevaluate_stage(
    pool: &PgPool,
    project_id: DbId,
) -> PipelineResult<Option<ProjectStage>> {
    let project = find_project(pool, project_id).await?;
    let stage = decode_stage(&project)?;

    let scenes = SceneRepo::list_by_project(pool, project_id).await?;
    let progress = scenes
        .iter()
        .map(Scene::progress)
        .collect::<Result<Vec<_>, _>>()?;

    let Some(next) = evaluate_advance(stage, &progress) else {
        return Ok(None);
    };
    let advanced = ProjectRepo::advance_stage(pool, project_id, next).await?;
    if advanced.is_some() {
        tracing::info!(project_id, stage = next.as_str(), "Project stage advanced");
    }
    Ok(advanced.map(|_| next))
}

async fn find_project(pool: &PgPool, project_id: DbId) -> PipelineResult<Project> {
    ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("project", project_id))
}

fn decode_stage(project: &Project) -> Result<ProjectStage, CoreError> {
    ProjectStage::from_id(project.stage)
        .ok_or_else(|| CoreError::Internal(format!("invalid stage {}", project.stage)))
}
