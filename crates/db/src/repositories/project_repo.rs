//! Repository for the `projects` table.

use sqlx::PgPool;
use storyreel_core::stage::ProjectStage;
use storyreel_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, story, style, stage, mode, created_at, updated_at";

/// Provides CRUD and stage-transition operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project at stage `draft`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, story, style, mode)
             VALUES ($1, COALESCE($2, ''), $3, COALESCE($4, 'story'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.story)
            .bind(&input.style)
            .bind(&input.mode)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update project content. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                story = COALESCE($3, story),
                style = COALESCE($4, style)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.story)
            .bind(&input.style)
            .fetch_optional(pool)
            .await
    }

    /// Advance the project stage, guarded for monotonicity in SQL.
    ///
    /// The `stage < $2` predicate makes the stage non-decreasing even
    /// under concurrent confirmations: a stale advance simply matches no
    /// row. Returns the updated project, or `None` if the project does
    /// not exist or is already at (or past) `stage`.
    pub async fn advance_stage(
        pool: &PgPool,
        id: DbId,
        stage: ProjectStage,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET stage = $2
             WHERE id = $1 AND stage < $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(stage.id())
            .fetch_optional(pool)
            .await
    }

    /// Delete a project (cascades to scenes, artifacts, and chains).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
