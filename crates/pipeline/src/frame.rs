//! Last-frame extraction for video continuation.
//!
//! A continuation seeds the next clip with the final frame of its
//! parent. Extraction shells out to ffmpeg when available; when it is
//! not, [`continuation_source`] falls back to reusing the parent scene's
//! completed image so continuation still works, just with weaker visual
//! continuity.

use std::path::Path;

use storyreel_core::capability::frame_extractor_available;

/// Extracts the last frame of a stored video into an image file.
#[async_trait::async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Write the last frame of `video_path` to `output_path` (PNG).
    async fn extract_last_frame(
        &self,
        video_path: &Path,
        output_path: &Path,
    ) -> std::io::Result<()>;

    /// Is the underlying tool available on this host?
    fn is_available(&self) -> bool;
}

/// ffmpeg-backed extractor. `is_available` is memoized process-wide.
pub struct FfmpegFrameExtractor;

#[async_trait::async_trait]
impl FrameExtractor for FfmpegFrameExtractor {
    async fn extract_last_frame(
        &self,
        video_path: &Path,
        output_path: &Path,
    ) -> std::io::Result<()> {
        // -sseof -1: seek to one second before the end, then keep only
        // the final decoded frame.
        let status = tokio::process::Command::new("ffmpeg")
            .arg("-y")
            .arg("-sseof")
            .arg("-1")
            .arg("-i")
            .arg(video_path)
            .arg("-update")
            .arg("1")
            .arg("-frames:v")
            .arg("1")
            .arg(output_path)
            .status()
            .await?;

        if !status.success() {
            return Err(std::io::Error::other(format!(
                "ffmpeg exited with {status} extracting last frame of {}",
                video_path.display()
            )));
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        frame_extractor_available()
    }
}

/// The image URL a continuation should seed from.
///
/// Prefers the extracted last frame of the parent video; falls back to
/// the parent scene's completed image URL when extraction is
/// unavailable or fails. Returns `None` only when neither exists.
pub async fn continuation_source(
    extractor: &dyn FrameExtractor,
    parent_video_path: Option<&Path>,
    frame_output_path: &Path,
    scene_image_url: Option<&str>,
) -> Option<String> {
    if let Some(video_path) = parent_video_path {
        if extractor.is_available() {
            match extractor.extract_last_frame(video_path, frame_output_path).await {
                Ok(()) => return Some(frame_output_path.to_string_lossy().into_owned()),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        video = %video_path.display(),
                        "Frame extraction failed, falling back to scene image"
                    );
                }
            }
        }
    }
    scene_image_url.map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    struct FixedExtractor {
        available: bool,
        fails: bool,
    }

    #[async_trait::async_trait]
    impl FrameExtractor for FixedExtractor {
        async fn extract_last_frame(
            &self,
            _video_path: &Path,
            _output_path: &Path,
        ) -> std::io::Result<()> {
            if self.fails {
                Err(std::io::Error::other("boom"))
            } else {
                Ok(())
            }
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[tokio::test]
    async fn prefers_extracted_frame() {
        let extractor = FixedExtractor {
            available: true,
            fails: false,
        };
        let source = continuation_source(
            &extractor,
            Some(Path::new("/tmp/parent.mp4")),
            &PathBuf::from("/tmp/frame.png"),
            Some("https://example.invalid/image.png"),
        )
        .await;
        assert_eq!(source.as_deref(), Some("/tmp/frame.png"));
    }

    #[tokio::test]
    async fn falls_back_to_scene_image_when_unavailable() {
        let extractor = FixedExtractor {
            available: false,
            fails: false,
        };
        let source = continuation_source(
            &extractor,
            Some(Path::new("/tmp/parent.mp4")),
            &PathBuf::from("/tmp/frame.png"),
            Some("https://example.invalid/image.png"),
        )
        .await;
        assert_eq!(source.as_deref(), Some("https://example.invalid/image.png"));
    }

    #[tokio::test]
    async fn falls_back_when_extraction_fails() {
        let extractor = FixedExtractor {
            available: true,
            fails: true,
        };
        let source = continuation_source(
            &extractor,
            Some(Path::new("/tmp/parent.mp4")),
            &PathBuf::from("/tmp/frame.png"),
            Some("https://example.invalid/image.png"),
        )
        .await;
        assert_eq!(source.as_deref(), Some("https://example.invalid/image.png"));
    }

    #[tokio::test]
    async fn none_when_no_source_exists() {
        let extractor = FixedExtractor {
            available: false,
            fails: false,
        };
        let source =
            continuation_source(&extractor, None, &PathBuf::from("/tmp/frame.png"), None).await;
        assert_eq!(source, None);
    }
}
