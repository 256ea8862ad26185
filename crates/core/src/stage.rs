//! Project stage state machine.
//!
//! A project moves through five ordered stages and never regresses.
//! Advancement out of `scenes`, `images`, and `videos` is computed
//! reactively after each scene confirmation by re-evaluating the
//! completion predicate over every scene in the project; the transition
//! out of `draft` is operation-driven (scene breakdown).

use serde::Serialize;

use crate::status::{GenerationStatus, SceneProgress};
use crate::types::StatusId;

/// Ordered production stage of a project. Stored as SMALLINT (1-based).
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStage {
    Draft = 1,
    Scenes = 2,
    Images = 3,
    Videos = 4,
    Completed = 5,
}

impl ProjectStage {
    /// Database SMALLINT value for this stage.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Decode a database SMALLINT value.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Draft),
            2 => Some(Self::Scenes),
            3 => Some(Self::Images),
            4 => Some(Self::Videos),
            5 => Some(Self::Completed),
            _ => None,
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_id(self.id() + 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scenes => "scenes",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Completed => "completed",
        }
    }
}

/// Does `scene` satisfy the completion predicate required to leave `stage`?
///
/// - `scenes`: the description is confirmed.
/// - `images`: the image is completed and confirmed.
/// - `videos`: the video is completed and confirmed.
/// - `draft` and `completed` have no scene-level predicate.
pub fn scene_satisfies_stage(stage: ProjectStage, scene: &SceneProgress) -> bool {
    match stage {
        ProjectStage::Draft | ProjectStage::Completed => false,
        ProjectStage::Scenes => scene.description_confirmed,
        ProjectStage::Images => {
            scene.image_status == GenerationStatus::Completed && scene.image_confirmed
        }
        ProjectStage::Videos => {
            scene.video_status == GenerationStatus::Completed && scene.video_confirmed
        }
    }
}

/// Evaluate reactive stage advancement after a confirmation.
///
/// Returns the stage to advance to when every scene satisfies the
/// predicate for `current`, or `None` when the project stays put. An
/// empty scene list never advances (a project with no scenes has nothing
/// to confirm).
pub fn evaluate_advance(current: ProjectStage, scenes: &[SceneProgress]) -> Option<ProjectStage> {
    if scenes.is_empty() {
        return None;
    }
    if !scenes.iter().all(|s| scene_satisfies_stage(current, s)) {
        return None;
    }
    current.next()
}
