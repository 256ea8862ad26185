//! Per-scene generation status state machine.
//!
//! Each scene carries two independent sub-machines, one per generation
//! kind (image, video). Transitions:
//!
//! - `pending -> processing` on task creation, gated by a precondition
//!   (image needs a confirmed description; video needs a completed image).
//! - `processing -> completed | failed` via task finalization.
//! - `failed -> processing` regeneration, allowed freely.
//! - `completed -> processing` regeneration, only while unconfirmed.
//!   A confirmed artifact is permanently terminal: there is no un-confirm
//!   operation, so the gate is one-way by design.
//! - confirmation is only legal from `completed` and is irreversible.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::StatusId;

/// Status of one generation sub-machine. Stored as SMALLINT (1-based).
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Pending = 1,
    Processing = 2,
    Completed = 3,
    Failed = 4,
}

impl GenerationStatus {
    /// Database SMALLINT value for this status.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Decode a database SMALLINT value.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            2 => Some(Self::Processing),
            3 => Some(Self::Completed),
            4 => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Which of the two sub-machines an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Image,
    Video,
}

impl GenerationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Snapshot of the per-scene fields the state machines read.
#[derive(Debug, Clone, Copy)]
pub struct SceneProgress {
    pub description_confirmed: bool,
    pub image_status: GenerationStatus,
    pub image_confirmed: bool,
    pub video_status: GenerationStatus,
    pub video_confirmed: bool,
}

impl SceneProgress {
    /// Status of the sub-machine for `kind`.
    pub fn status(&self, kind: GenerationKind) -> GenerationStatus {
        match kind {
            GenerationKind::Image => self.image_status,
            GenerationKind::Video => self.video_status,
        }
    }

    /// Confirmation flag for `kind`.
    pub fn confirmed(&self, kind: GenerationKind) -> bool {
        match kind {
            GenerationKind::Image => self.image_confirmed,
            GenerationKind::Video => self.video_confirmed,
        }
    }
}

/// Validate that a generation task may start for `kind` on this scene.
///
/// Checks the stage precondition first, then the status transition rules
/// (including the confirmed one-way gate). Returns `Validation` for unmet
/// preconditions and `Conflict` for illegal transitions; callers must not
/// mutate any state when this fails.
pub fn validate_start(kind: GenerationKind, scene: &SceneProgress) -> Result<(), CoreError> {
    match kind {
        GenerationKind::Image => {
            if !scene.description_confirmed {
                return Err(CoreError::Validation(
                    "Scene description must be confirmed before image generation".to_string(),
                ));
            }
        }
        GenerationKind::Video => {
            if scene.image_status != GenerationStatus::Completed {
                return Err(CoreError::Validation(
                    "Scene image must be completed before video generation".to_string(),
                ));
            }
        }
    }

    validate_transition(kind, scene)
}

/// Validate only the status-transition half of starting a task: legal
/// from `pending`, `failed`, and unconfirmed `completed`.
///
/// Video continuation uses this directly — it seeds from the parent
/// video's last frame, so the own-image precondition does not apply.
pub fn validate_transition(kind: GenerationKind, scene: &SceneProgress) -> Result<(), CoreError> {
    match scene.status(kind) {
        GenerationStatus::Pending | GenerationStatus::Failed => Ok(()),
        GenerationStatus::Processing => Err(CoreError::Conflict(format!(
            "A {} generation task is already in flight for this scene",
            kind.as_str()
        ))),
        GenerationStatus::Completed => {
            if scene.confirmed(kind) {
                Err(CoreError::Conflict(format!(
                    "The {} is confirmed and can no longer be regenerated",
                    kind.as_str()
                )))
            } else {
                Ok(())
            }
        }
    }
}

/// Validate that the artifact of `kind` may be confirmed on this scene.
///
/// Confirmation is only legal from `completed`. Re-confirming an already
/// confirmed scene is a harmless no-op.
pub fn validate_confirm(kind: GenerationKind, scene: &SceneProgress) -> Result<(), CoreError> {
    if scene.status(kind) != GenerationStatus::Completed {
        return Err(CoreError::Validation(format!(
            "Cannot confirm {}: status is {}, not completed",
            kind.as_str(),
            scene.status(kind).as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn base_scene() -> SceneProgress {
        SceneProgress {
            description_confirmed: true,
            image_status: GenerationStatus::Pending,
            image_confirmed: false,
            video_status: GenerationStatus::Pending,
            video_confirmed: false,
        }
    }

    // -- Start preconditions --

    #[test]
    fn image_start_requires_confirmed_description() {
        let mut scene = base_scene();
        scene.description_confirmed = false;
        assert_matches!(
            validate_start(GenerationKind::Image, &scene),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn video_start_requires_completed_image() {
        let scene = base_scene();
        assert_matches!(
            validate_start(GenerationKind::Video, &scene),
            Err(CoreError::Validation(_))
        );

        let mut scene = base_scene();
        scene.image_status = GenerationStatus::Completed;
        assert_matches!(validate_start(GenerationKind::Video, &scene), Ok(()));
    }

    // -- Status transitions --

    #[test]
    fn start_allowed_from_pending_and_failed() {
        let mut scene = base_scene();
        assert_matches!(validate_start(GenerationKind::Image, &scene), Ok(()));

        scene.image_status = GenerationStatus::Failed;
        assert_matches!(validate_start(GenerationKind::Image, &scene), Ok(()));
    }

    #[test]
    fn start_rejected_while_processing() {
        let mut scene = base_scene();
        scene.image_status = GenerationStatus::Processing;
        assert_matches!(
            validate_start(GenerationKind::Image, &scene),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn regeneration_allowed_from_unconfirmed_completed() {
        let mut scene = base_scene();
        scene.image_status = GenerationStatus::Completed;
        assert_matches!(validate_start(GenerationKind::Image, &scene), Ok(()));
    }

    #[test]
    fn confirmed_artifact_is_terminal() {
        let mut scene = base_scene();
        scene.image_status = GenerationStatus::Completed;
        scene.image_confirmed = true;
        assert_matches!(
            validate_start(GenerationKind::Image, &scene),
            Err(CoreError::Conflict(_))
        );
    }

    // -- Confirmation --

    #[test]
    fn confirm_only_legal_from_completed() {
        let scene = base_scene();
        assert_matches!(
            validate_confirm(GenerationKind::Image, &scene),
            Err(CoreError::Validation(_))
        );

        let mut scene = base_scene();
        scene.image_status = GenerationStatus::Completed;
        assert_matches!(validate_confirm(GenerationKind::Image, &scene), Ok(()));
    }

    #[test]
    fn status_ids_round_trip() {
        for id in 1..=4 {
            assert_eq!(GenerationStatus::from_id(id).unwrap().id(), id);
        }
        assert_eq!(GenerationStatus::from_id(5), None);
    }
}
