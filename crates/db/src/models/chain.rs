//! Video chain models and DTOs.
//!
//! A chain is a flat ordered list of videos linked by continuation
//! (parent last frame seeds the child's first frame). `parent_video_id`
//! is informational lineage metadata; the ordering never depends on it,
//! and the structure is deliberately not a tree.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::types::{DbId, Timestamp};

/// A row from the `video_chains` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoChain {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A row from the `video_chain_items` table.
///
/// `order_index` is strictly increasing within a chain; a video belongs
/// to at most one chain (`video_id` is globally unique here).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoChainItem {
    pub id: DbId,
    pub chain_id: DbId,
    pub video_id: DbId,
    pub order_index: i32,
    pub parent_video_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a chain.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoChain {
    pub project_id: DbId,
    pub name: String,
}
