//! Job types, status normalization, and the provider error taxonomy.

use serde::Serialize;

/// Normalized status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Normalize a vendor-specific status string.
    ///
    /// Unknown strings map to `Processing`: a status we cannot interpret
    /// is not evidence the job finished, so keep polling.
    pub fn normalize(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" | "queued" | "submitted" | "created" => Self::Pending,
            "processing" | "running" | "in_progress" | "generating" => Self::Processing,
            "completed" | "succeeded" | "success" | "done" | "finished" => Self::Completed,
            "failed" | "error" | "cancelled" | "canceled" | "rejected" => Self::Failed,
            other => {
                tracing::warn!(status = other, "Unknown provider status, treating as processing");
                Self::Processing
            }
        }
    }

    /// Has the job reached a terminal state?
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Input for creating a generation job.
#[derive(Debug, Clone, Serialize)]
pub struct CreateJobRequest {
    /// What to generate (the scene description).
    pub subject_description: String,
    /// Optional visual style applied project-wide.
    pub style: Option<String>,
    /// First-frame source image (video jobs only).
    pub source_image_url: Option<String>,
    /// Requested clip length in seconds (video jobs only).
    pub duration_secs: Option<f64>,
    /// Output size, e.g. `1280x720`.
    pub size: Option<String>,
}

impl CreateJobRequest {
    /// A plain image request from a description and optional style.
    pub fn image(subject_description: impl Into<String>, style: Option<String>) -> Self {
        Self {
            subject_description: subject_description.into(),
            style,
            source_image_url: None,
            duration_secs: None,
            size: None,
        }
    }

    /// A video request seeded with a first-frame image.
    pub fn video(
        subject_description: impl Into<String>,
        style: Option<String>,
        source_image_url: Option<String>,
        duration_secs: Option<f64>,
    ) -> Self {
        Self {
            subject_description: subject_description.into(),
            style,
            source_image_url,
            duration_secs,
            size: None,
        }
    }
}

/// Result of submitting a job.
#[derive(Debug, Clone)]
pub struct CreatedJob {
    /// Vendor-assigned job identifier.
    pub job_id: String,
    pub status: JobStatus,
}

/// Result of polling a job.
#[derive(Debug, Clone)]
pub struct JobPoll {
    pub status: JobStatus,
    /// Present when `status` is `completed`.
    pub artifact_url: Option<String>,
    /// Present when `status` is `failed`.
    pub error_message: Option<String>,
}

impl Default for JobPoll {
    fn default() -> Self {
        Self {
            status: JobStatus::Processing,
            artifact_url: None,
            error_message: None,
        }
    }
}

/// Errors from the provider adapter layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Credentials are missing; the adapter never attempted a call.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The vendor rejected our credentials (401/403). Never retried.
    #[error("Provider authentication failed ({status})")]
    Auth { status: u16 },

    /// The request hit its deadline. Terminal for this call; the caller
    /// may re-invoke.
    #[error("Provider request timed out: {0}")]
    Timeout(String),

    /// The vendor returned a non-2xx response (after retries).
    #[error("Provider error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The request itself failed (network, DNS, TLS) after retries.
    #[error("Provider request failed: {0}")]
    Request(String),

    /// The vendor returned a 2xx response we could not interpret.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// May a fresh attempt of the same request succeed?
    ///
    /// Auth and configuration problems will not fix themselves, and a
    /// timeout is terminal within one adapter call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotConfigured(_) | Self::Auth { .. } | Self::Timeout(_) => false,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Request(_) => true,
            Self::InvalidResponse(_) => false,
        }
    }
}
