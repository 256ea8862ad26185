//! Repository for the `video_chains` and `video_chain_items` tables.

use sqlx::PgPool;
use storyreel_core::types::DbId;

use crate::models::chain::{CreateVideoChain, VideoChain, VideoChainItem};

/// Column lists shared across queries to avoid repetition.
const CHAIN_COLUMNS: &str = "id, project_id, name, created_at";
const ITEM_COLUMNS: &str = "id, chain_id, video_id, order_index, parent_video_id, created_at";

/// Provides chain and chain-membership operations.
pub struct VideoChainRepo;

impl VideoChainRepo {
    /// Insert a new, empty chain.
    pub async fn create(pool: &PgPool, input: &CreateVideoChain) -> Result<VideoChain, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_chains (project_id, name)
             VALUES ($1, $2)
             RETURNING {CHAIN_COLUMNS}"
        );
        sqlx::query_as::<_, VideoChain>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a chain by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VideoChain>, sqlx::Error> {
        let query = format!("SELECT {CHAIN_COLUMNS} FROM video_chains WHERE id = $1");
        sqlx::query_as::<_, VideoChain>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all chains for a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<VideoChain>, sqlx::Error> {
        let query = format!(
            "SELECT {CHAIN_COLUMNS} FROM video_chains
             WHERE project_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, VideoChain>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Append a video to a chain, auto-assigning the next order index.
    ///
    /// The `MAX(order_index) + 1` subquery keeps ordering strictly
    /// increasing under concurrency; `uq_chain_items_video` rejects a
    /// video that already belongs to any chain.
    pub async fn append_item(
        pool: &PgPool,
        chain_id: DbId,
        video_id: DbId,
        parent_video_id: Option<DbId>,
    ) -> Result<VideoChainItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_chain_items (chain_id, video_id, order_index, parent_video_id)
             VALUES (
                $1, $2,
                (SELECT COALESCE(MAX(order_index), -1) + 1 FROM video_chain_items WHERE chain_id = $1),
                $3
             )
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, VideoChainItem>(&query)
            .bind(chain_id)
            .bind(video_id)
            .bind(parent_video_id)
            .fetch_one(pool)
            .await
    }

    /// The single chain membership of a video, if any.
    pub async fn find_item_by_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Option<VideoChainItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM video_chain_items WHERE video_id = $1");
        sqlx::query_as::<_, VideoChainItem>(&query)
            .bind(video_id)
            .fetch_optional(pool)
            .await
    }

    /// List the items of a chain in order.
    pub async fn list_items(
        pool: &PgPool,
        chain_id: DbId,
    ) -> Result<Vec<VideoChainItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM video_chain_items
             WHERE chain_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, VideoChainItem>(&query)
            .bind(chain_id)
            .fetch_all(pool)
            .await
    }
}
