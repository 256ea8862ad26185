//! Image and video artifact models and DTOs.
//!
//! Artifacts are versioned per scene: regeneration appends a new version
//! and the latest by `version` is authoritative. A row with a non-empty
//! `task_id` and empty `storage_path`/`url` is a resumable in-flight
//! generation, not a completed artifact.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::types::{DbId, Timestamp};

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub scene_id: DbId,
    pub storage_path: String,
    pub url: String,
    pub version: i32,
    pub task_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub scene_id: DbId,
    pub storage_path: String,
    pub url: String,
    pub version: i32,
    pub task_id: Option<String>,
    pub duration_secs: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Is this row an in-flight generation awaiting finalization?
    ///
    /// `url` is the completion marker: a finished-with-warning row may
    /// have an empty `storage_path` (download failed) but always has the
    /// provider URL.
    pub fn is_in_flight(&self) -> bool {
        self.task_id.is_some() && self.url.is_empty()
    }
}

impl Image {
    /// Is this row an in-flight generation awaiting finalization?
    pub fn is_in_flight(&self) -> bool {
        self.task_id.is_some() && self.url.is_empty()
    }
}

/// DTO for persisting a completed artifact (image or video alike).
#[derive(Debug, Clone, Deserialize)]
pub struct CompletedArtifact {
    pub storage_path: String,
    pub url: String,
    pub duration_secs: Option<f64>,
}
