//! Repository for the `images` table.

use sqlx::PgPool;
use storyreel_core::types::DbId;

use crate::models::artifact::{CompletedArtifact, Image};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scene_id, storage_path, url, version, task_id, \
    created_at, updated_at";

/// Provides versioned artifact operations for scene images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert an in-flight placeholder carrying the vendor task ID,
    /// auto-assigning the next version for the scene.
    ///
    /// The `MAX(version) + 1` subquery runs inside the insert, so two
    /// concurrent generations on the same scene cannot collide; the
    /// `uq_images_scene_version` constraint backstops the race.
    pub async fn create_in_flight(
        pool: &PgPool,
        scene_id: DbId,
        task_id: &str,
    ) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (scene_id, version, task_id)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version), 0) + 1 FROM images WHERE scene_id = $1),
                $2
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(scene_id)
            .bind(task_id)
            .fetch_one(pool)
            .await
    }

    /// Fill in the artifact location on a previously in-flight row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        artifact: &CompletedArtifact,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!(
            "UPDATE images SET storage_path = $2, url = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .bind(&artifact.storage_path)
            .bind(&artifact.url)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by its vendor task ID.
    pub async fn find_by_task_id(
        pool: &PgPool,
        task_id: &str,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE task_id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    /// List all versions for a scene, newest version first.
    pub async fn list_by_scene(pool: &PgPool, scene_id: DbId) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images
             WHERE scene_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    /// The authoritative (highest-version, completed) image for a scene.
    pub async fn latest_completed_for_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images
             WHERE scene_id = $1 AND url <> ''
             ORDER BY version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(scene_id)
            .fetch_optional(pool)
            .await
    }

    /// List in-flight rows (non-empty task ID, empty URL) for
    /// the worker sweeper to resume.
    pub async fn list_in_flight(pool: &PgPool) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images
             WHERE task_id IS NOT NULL AND url = ''
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Image>(&query).fetch_all(pool).await
    }

    /// Delete a row. Used to discard the placeholder of a failed task.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
