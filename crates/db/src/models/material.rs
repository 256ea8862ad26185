//! Material (free-form scene attachment) model and DTOs.
//!
//! The JSONB `metadata` column is decoded once at the boundary into the
//! tagged [`MaterialMeta`] union rather than duck-typed field access.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::error::CoreError;
use storyreel_core::types::{DbId, Timestamp};

/// A row from the `materials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Material {
    pub id: DbId,
    pub scene_id: DbId,
    pub material_type: String,
    pub storage_path: String,
    pub url: String,
    pub metadata: serde_json::Value,
    pub order_index: i32,
    pub created_at: Timestamp,
}

/// Strongly-typed metadata payload, keyed by material kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MaterialMeta {
    /// Inline text content (no backing file).
    Text { content: String },
    /// An uploaded file (image, video, or audio).
    File {
        original_name: String,
        content_type: Option<String>,
        size_bytes: Option<i64>,
    },
}

impl Material {
    /// Decode the raw JSONB metadata into the tagged union.
    pub fn meta(&self) -> Result<MaterialMeta, CoreError> {
        serde_json::from_value(self.metadata.clone())
            .map_err(|e| CoreError::Internal(format!("invalid material metadata: {e}")))
    }
}

/// DTO for attaching a material to a scene.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaterial {
    pub scene_id: DbId,
    /// One of `image`, `video`, `audio`, `text`.
    pub material_type: String,
    pub storage_path: Option<String>,
    pub url: Option<String>,
    pub metadata: MaterialMeta,
    pub order_index: Option<i32>,
}

/// All material types accepted by the `materials` table.
pub const VALID_MATERIAL_TYPES: &[&str] = &["image", "video", "audio", "text"];

/// Validate a material type string against [`VALID_MATERIAL_TYPES`].
pub fn validate_material_type(material_type: &str) -> Result<(), CoreError> {
    if VALID_MATERIAL_TYPES.contains(&material_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid material type '{material_type}'. Must be one of: {}",
            VALID_MATERIAL_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_round_trips_text_variant() {
        let meta = MaterialMeta::Text {
            content: "voiceover line".to_string(),
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["kind"], "text");
        let back: MaterialMeta = serde_json::from_value(value).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn meta_decodes_file_variant() {
        let value = serde_json::json!({
            "kind": "file",
            "original_name": "ref.png",
            "content_type": "image/png",
            "size_bytes": 2048,
        });
        let meta: MaterialMeta = serde_json::from_value(value).unwrap();
        assert_eq!(
            meta,
            MaterialMeta::File {
                original_name: "ref.png".to_string(),
                content_type: Some("image/png".to_string()),
                size_bytes: Some(2048),
            }
        );
    }

    #[test]
    fn unknown_material_type_is_rejected() {
        assert!(validate_material_type("model").is_err());
        assert!(validate_material_type("text").is_ok());
    }
}
