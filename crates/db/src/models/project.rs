//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::types::{DbId, StatusId, Timestamp};

/// A project row from the `projects` table.
///
/// `stage` maps to [`storyreel_core::stage::ProjectStage`] (1-based
/// SMALLINT) and is monotonically non-decreasing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub story: String,
    pub style: Option<String>,
    pub stage: StatusId,
    pub mode: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub story: Option<String>,
    pub style: Option<String>,
    /// Defaults to `'story'` if omitted.
    pub mode: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub story: Option<String>,
    pub style: Option<String>,
}
