//! Repository for the `materials` table.

use sqlx::PgPool;
use storyreel_core::types::DbId;

use crate::models::material::{CreateMaterial, Material};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scene_id, material_type, storage_path, url, metadata, \
    order_index, created_at";

/// Provides attachment operations for scene materials.
pub struct MaterialRepo;

impl MaterialRepo {
    /// Insert a new material, returning the created row.
    ///
    /// The typed metadata union is encoded to JSONB here, at the boundary.
    pub async fn create(pool: &PgPool, input: &CreateMaterial) -> Result<Material, sqlx::Error> {
        let metadata = serde_json::to_value(&input.metadata)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO materials (scene_id, material_type, storage_path, url, metadata, order_index)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), $5, COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(input.scene_id)
            .bind(&input.material_type)
            .bind(&input.storage_path)
            .bind(&input.url)
            .bind(metadata)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// Find a material by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Material>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials WHERE id = $1");
        sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all materials for a scene in presentation order.
    pub async fn list_by_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<Material>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM materials
             WHERE scene_id = $1
             ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a material row. The backing object is deliberately left in
    /// storage (no garbage collection). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
