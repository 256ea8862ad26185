//! HTTP implementation of [`GenerativeProvider`] using [`reqwest`].
//!
//! Speaks a plain JSON task API (`POST /v1/tasks`, `GET /v1/tasks/{id}`)
//! with bearer-token auth. Vendor status strings are normalized before
//! they leave this module.

use std::time::Duration;

use serde::Deserialize;

use crate::job::{CreateJobRequest, CreatedJob, JobPoll, JobStatus, ProviderError};
use crate::retry::{with_retry, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BASE};
use crate::GenerativeProvider;

/// Provider configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base API URL, e.g. `https://api.vendor.example`.
    pub base_url: String,
    /// Bearer token; the adapter is unconfigured without it.
    pub api_key: Option<String>,
    /// Per-request deadline in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per adapter call (see `retry`).
    pub max_attempts: u32,
    /// Base retry delay in milliseconds (`delay = base * attempt`).
    pub retry_base_ms: u64,
}

impl ProviderConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                        |
    /// |------------------------------|--------------------------------|
    /// | `PROVIDER_BASE_URL`          | `https://api.vendor.example`   |
    /// | `PROVIDER_API_KEY`           | unset (adapter unconfigured)   |
    /// | `PROVIDER_TIMEOUT_SECS`      | `60`                           |
    /// | `PROVIDER_MAX_ATTEMPTS`      | `3`                            |
    /// | `PROVIDER_RETRY_BASE_MS`     | `500`                          |
    pub fn from_env() -> Self {
        let base_url = std::env::var("PROVIDER_BASE_URL")
            .unwrap_or_else(|_| "https://api.vendor.example".into());

        let api_key = std::env::var("PROVIDER_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let request_timeout_secs: u64 = std::env::var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("PROVIDER_TIMEOUT_SECS must be a valid u64");

        let max_attempts: u32 = std::env::var("PROVIDER_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("PROVIDER_MAX_ATTEMPTS must be a valid u32");

        let retry_base_ms: u64 = std::env::var("PROVIDER_RETRY_BASE_MS")
            .unwrap_or_else(|_| DEFAULT_RETRY_BASE.as_millis().to_string())
            .parse()
            .expect("PROVIDER_RETRY_BASE_MS must be a valid u64");

        Self {
            base_url,
            api_key,
            request_timeout_secs,
            max_attempts,
            retry_base_ms,
        }
    }
}

/// HTTP adapter for one generative service.
pub struct HttpProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

/// Response from `POST /v1/tasks`.
#[derive(Debug, Deserialize)]
struct CreateTaskResponse {
    task_id: String,
    status: Option<String>,
}

/// Response from `GET /v1/tasks/{id}`.
#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    status: String,
    artifact_url: Option<String>,
    error_message: Option<String>,
}

impl HttpProvider {
    /// Create an adapter from configuration. Building the client cannot
    /// fail for the options used here, so this is infallible.
    pub fn new(config: ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("reqwest client with static options");
        Self { client, config }
    }

    fn retry_base(&self) -> Duration {
        Duration::from_millis(self.config.retry_base_ms)
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("PROVIDER_API_KEY is not set".into()))
    }

    /// Map a transport error: a hit deadline is terminal, everything
    /// else is a retryable request failure.
    fn map_transport(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }

    /// Classify a non-2xx response. 401/403 are fatal auth errors.
    async fn classify_response(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::Auth {
                status: status.as_u16(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for HttpProvider {
    async fn create_job(&self, input: &CreateJobRequest) -> Result<CreatedJob, ProviderError> {
        let key = self.api_key()?.to_string();
        let url = format!("{}/v1/tasks", self.config.base_url);

        let parsed: CreateTaskResponse = with_retry(
            || {
                let url = url.clone();
                let key = key.clone();
                async move {
                    let response = self
                        .client
                        .post(&url)
                        .bearer_auth(&key)
                        .json(input)
                        .send()
                        .await
                        .map_err(Self::map_transport)?;
                    let response = Self::classify_response(response).await?;
                    response
                        .json()
                        .await
                        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
                }
            },
            self.retry_base(),
            self.config.max_attempts,
        )
        .await?;

        let status = parsed
            .status
            .as_deref()
            .map(JobStatus::normalize)
            .unwrap_or(JobStatus::Pending);

        tracing::info!(job_id = %parsed.task_id, ?status, "Created provider job");

        Ok(CreatedJob {
            job_id: parsed.task_id,
            status,
        })
    }

    async fn poll_job(&self, job_id: &str) -> Result<JobPoll, ProviderError> {
        let key = self.api_key()?.to_string();
        let url = format!("{}/v1/tasks/{job_id}", self.config.base_url);

        let parsed: TaskStatusResponse = with_retry(
            || {
                let url = url.clone();
                let key = key.clone();
                async move {
                    let response = self
                        .client
                        .get(&url)
                        .bearer_auth(&key)
                        .send()
                        .await
                        .map_err(Self::map_transport)?;
                    let response = Self::classify_response(response).await?;
                    response
                        .json()
                        .await
                        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
                }
            },
            self.retry_base(),
            self.config.max_attempts,
        )
        .await?;

        Ok(JobPoll {
            status: JobStatus::normalize(&parsed.status),
            artifact_url: parsed.artifact_url,
            error_message: parsed.error_message,
        })
    }

    async fn download_artifact(&self, artifact_ref: &str) -> Result<Vec<u8>, ProviderError> {
        let bytes = with_retry(
            || async move {
                let response = self
                    .client
                    .get(artifact_ref)
                    .send()
                    .await
                    .map_err(Self::map_transport)?;
                let response = Self::classify_response(response).await?;
                response
                    .bytes()
                    .await
                    .map_err(|e| ProviderError::Request(e.to_string()))
            },
            self.retry_base(),
            self.config.max_attempts,
        )
        .await?;
        Ok(bytes.to_vec())
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}
