//! Artifact storage seam.
//!
//! The pipeline downloads finished artifacts and hands the bytes to an
//! [`ArtifactStore`]; where they land (local disk, object storage) is a
//! collaborator concern. Storage failure after a successful generation
//! is non-fatal — the provider URL is still recorded.

use std::path::PathBuf;

use storyreel_core::status::GenerationKind;
use storyreel_core::types::DbId;

/// Persists artifact bytes and returns the storage path.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write the artifact for `scene_id`/`version` and return its
    /// storage path.
    async fn put(
        &self,
        kind: GenerationKind,
        scene_id: DbId,
        version: i32,
        bytes: &[u8],
    ) -> std::io::Result<String>;
}

/// Stores artifacts under a local root directory:
/// `{root}/{images|videos}/{scene_id}/{version}.{png|mp4}`.
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, kind: GenerationKind, scene_id: DbId, version: i32) -> PathBuf {
        let (dir, ext) = match kind {
            GenerationKind::Image => ("images", "png"),
            GenerationKind::Video => ("videos", "mp4"),
        };
        self.root.join(dir).join(scene_id.to_string()).join(format!("{version}.{ext}"))
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn put(
        &self,
        kind: GenerationKind,
        scene_id: DbId,
        version: i32,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        let path = self.path_for(kind, scene_id, version);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_writes_under_kind_and_scene() {
        let dir = std::env::temp_dir().join(format!("storyreel-store-{}", std::process::id()));
        let store = LocalArtifactStore::new(&dir);

        let path = store
            .put(GenerationKind::Video, 7, 2, b"fake-mp4")
            .await
            .unwrap();

        assert!(path.ends_with("videos/7/2.mp4"), "unexpected path: {path}");
        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(written, b"fake-mp4");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
