//! Repository for the `scenes` table.

use sqlx::PgPool;
use storyreel_core::status::{GenerationKind, GenerationStatus};
use storyreel_core::types::DbId;

use crate::models::scene::{CreateScene, Scene, UpdateScene};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, order_index, description, description_confirmed, \
    image_status, image_confirmed, video_status, video_confirmed, mode, \
    created_at, updated_at";

/// The status/confirmed column pair for a generation kind.
fn status_columns(kind: GenerationKind) -> (&'static str, &'static str) {
    match kind {
        GenerationKind::Image => ("image_status", "image_confirmed"),
        GenerationKind::Video => ("video_status", "video_confirmed"),
    }
}

/// Provides CRUD and status-transition operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a single scene, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScene) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes (project_id, order_index, description, mode)
             VALUES ($1, $2, $3, COALESCE($4, 'story'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(input.project_id)
            .bind(input.order_index)
            .bind(&input.description)
            .bind(&input.mode)
            .fetch_one(pool)
            .await
    }

    /// Replace all scenes of a project with a fresh ordered set.
    ///
    /// Regeneration semantics: existing scenes (and their artifacts, via
    /// cascade) are deleted first, then the new descriptions are inserted
    /// with `order_index` 0..N, all in one transaction.
    pub async fn replace_for_project(
        pool: &PgPool,
        project_id: DbId,
        descriptions: &[String],
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM scenes WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO scenes (project_id, order_index, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let mut scenes = Vec::with_capacity(descriptions.len());
        for (index, description) in descriptions.iter().enumerate() {
            let scene = sqlx::query_as::<_, Scene>(&query)
                .bind(project_id)
                .bind(index as i32)
                .bind(description)
                .fetch_one(&mut *tx)
                .await?;
            scenes.push(scene);
        }

        tx.commit().await?;
        Ok(scenes)
    }

    /// Insert a scene at the end of the project's order (free mode).
    pub async fn append(
        pool: &PgPool,
        project_id: DbId,
        description: &str,
        mode: &str,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes (project_id, order_index, description, mode)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(order_index), -1) + 1 FROM scenes WHERE project_id = $1),
                $2, $3
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(description)
            .bind(mode)
            .fetch_one(pool)
            .await
    }

    /// Find a scene by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all scenes for a project in presentation order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes
             WHERE project_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update scene content. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET description = COALESCE($2, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Set the generation status for one kind on a scene.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        kind: GenerationKind,
        status: GenerationStatus,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let (status_col, _) = status_columns(kind);
        let query = format!(
            "UPDATE scenes SET {status_col} = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a scene's description as confirmed.
    pub async fn confirm_description(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET description_confirmed = TRUE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Confirm all descriptions of a project at once. Returns the number
    /// of scenes that were newly confirmed.
    pub async fn confirm_all_descriptions(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scenes SET description_confirmed = TRUE
             WHERE project_id = $1 AND description_confirmed = FALSE",
        )
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Set the confirmed flag for one kind on a scene.
    ///
    /// The `{status_col} = 3` guard enforces the invariant
    /// `confirmed => status = completed` at the database level: a scene
    /// whose artifact is not completed matches no row.
    pub async fn confirm_artifact(
        pool: &PgPool,
        id: DbId,
        kind: GenerationKind,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let (status_col, confirmed_col) = status_columns(kind);
        let query = format!(
            "UPDATE scenes SET {confirmed_col} = TRUE
             WHERE id = $1 AND {status_col} = {completed}
             RETURNING {COLUMNS}",
            completed = GenerationStatus::Completed.id(),
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a scene (cascades to artifacts and materials).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
