//! Provider adapter: a uniform interface to an external generative
//! service.
//!
//! The adapter only makes network calls — it never persists anything.
//! Vendor-specific status strings are normalized to [`job::JobStatus`],
//! and per-vendor retry/backoff and error mapping live behind the
//! [`GenerativeProvider`] trait so the pipeline layer stays
//! vendor-agnostic.

pub mod http;
pub mod job;
pub mod retry;

pub use http::{HttpProvider, ProviderConfig};
pub use job::{CreateJobRequest, CreatedJob, JobPoll, JobStatus, ProviderError};

/// Uniform contract for one external generative service.
#[async_trait::async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Submit a generation job; returns the vendor job ID and its
    /// initial status.
    async fn create_job(&self, input: &CreateJobRequest) -> Result<CreatedJob, ProviderError>;

    /// Query the current status of a job.
    async fn poll_job(&self, job_id: &str) -> Result<JobPoll, ProviderError>;

    /// Download a finished artifact by reference (URL).
    async fn download_artifact(&self, artifact_ref: &str) -> Result<Vec<u8>, ProviderError>;

    /// Can this adapter make calls at all? Callers fail fast with a
    /// service-unavailable error instead of attempting network calls.
    fn is_configured(&self) -> bool;
}
