//! Process-wide capability cache.
//!
//! Answers "is the frame-extraction tool available?" exactly once per
//! process. The probe result is memoized behind a `OnceLock`, so the
//! check is cheap on every continuation request and never races.

use std::process::Command;
use std::sync::OnceLock;

/// A memoized boolean capability probe.
pub struct CapabilityCache {
    flag: OnceLock<bool>,
}

impl CapabilityCache {
    pub const fn new() -> Self {
        Self {
            flag: OnceLock::new(),
        }
    }

    /// Return the cached result, running `probe` only on the first call.
    pub fn check(&self, probe: impl FnOnce() -> bool) -> bool {
        *self.flag.get_or_init(probe)
    }
}

impl Default for CapabilityCache {
    fn default() -> Self {
        Self::new()
    }
}

static FRAME_EXTRACTOR: CapabilityCache = CapabilityCache::new();

/// Is ffmpeg available for last-frame extraction?
///
/// Probed once per process; subsequent calls return the cached result.
pub fn frame_extractor_available() -> bool {
    FRAME_EXTRACTOR.check(|| {
        let available = Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        tracing::info!(available, "Probed ffmpeg for frame extraction");
        available
    })
}
