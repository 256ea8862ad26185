//! Scene entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::error::CoreError;
use storyreel_core::status::{GenerationStatus, SceneProgress};
use storyreel_core::types::{DbId, StatusId, Timestamp};

/// A row from the `scenes` table.
///
/// `image_status` and `video_status` map to
/// [`storyreel_core::status::GenerationStatus`] (1-based SMALLINT).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub order_index: i32,
    pub description: String,
    pub description_confirmed: bool,
    pub image_status: StatusId,
    pub image_confirmed: bool,
    pub video_status: StatusId,
    pub video_confirmed: bool,
    pub mode: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scene {
    /// Decode the status columns into a [`SceneProgress`] snapshot for
    /// the core state machines.
    pub fn progress(&self) -> Result<SceneProgress, CoreError> {
        let image_status = GenerationStatus::from_id(self.image_status).ok_or_else(|| {
            CoreError::Internal(format!("invalid image_status {}", self.image_status))
        })?;
        let video_status = GenerationStatus::from_id(self.video_status).ok_or_else(|| {
            CoreError::Internal(format!("invalid video_status {}", self.video_status))
        })?;
        Ok(SceneProgress {
            description_confirmed: self.description_confirmed,
            image_status,
            image_confirmed: self.image_confirmed,
            video_status,
            video_confirmed: self.video_confirmed,
        })
    }
}

/// DTO for creating a new scene.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScene {
    pub project_id: DbId,
    pub order_index: i32,
    pub description: String,
    /// Defaults to `'story'` if omitted.
    pub mode: Option<String>,
}

/// DTO for updating scene content. Status transitions go through the
/// dedicated repo methods, not this DTO.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScene {
    pub description: Option<String>,
}
