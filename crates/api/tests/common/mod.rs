//! Shared helpers for API integration tests.
//!
//! Each integration test binary compiles its own copy; not every test
//! uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use storyreel_api::config::ServerConfig;
use storyreel_api::router::build_app_router;
use storyreel_api::state::AppState;
use storyreel_core::status::GenerationKind;
use storyreel_core::types::DbId;
use storyreel_pipeline::frame::FrameExtractor;
use storyreel_pipeline::store::ArtifactStore;
use storyreel_provider::{
    CreateJobRequest, CreatedJob, GenerativeProvider, JobPoll, JobStatus, ProviderError,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        artifacts_dir: "./artifacts".to_string(),
        poll_interval_secs: 0,
        max_poll_attempts: 3,
    }
}

/// Scripted provider for HTTP tests: answers from queues; an exhausted
/// poll queue repeats its last answer.
pub struct ScriptedProvider {
    pub configured: bool,
    create_script: Mutex<VecDeque<String>>,
    poll_script: Mutex<VecDeque<JobPoll>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            configured: true,
            create_script: Mutex::new(VecDeque::new()),
            poll_script: Mutex::new(VecDeque::new()),
        }
    }

    pub fn unconfigured() -> Self {
        let mut provider = Self::new();
        provider.configured = false;
        provider
    }

    /// Queue a job that is created as `task_id` and completes with `url`.
    pub fn completing(task_id: &str, url: &str) -> Self {
        let provider = Self::new();
        provider.script(task_id, url);
        provider
    }

    pub fn script_create(&self, task_id: &str) {
        self.create_script
            .lock()
            .unwrap()
            .push_back(task_id.to_string());
    }

    pub fn script(&self, task_id: &str, url: &str) {
        self.script_create(task_id);
        self.poll_script.lock().unwrap().push_back(JobPoll {
            status: JobStatus::Completed,
            artifact_url: Some(url.to_string()),
            error_message: None,
        });
    }

    pub fn script_poll(&self, poll: JobPoll) {
        self.poll_script.lock().unwrap().push_back(poll);
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for ScriptedProvider {
    async fn create_job(&self, _input: &CreateJobRequest) -> Result<CreatedJob, ProviderError> {
        let job_id = self
            .create_script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected create_job call");
        Ok(CreatedJob {
            job_id,
            status: JobStatus::Pending,
        })
    }

    async fn poll_job(&self, _job_id: &str) -> Result<JobPoll, ProviderError> {
        let mut script = self.poll_script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.pop_front().unwrap())
        } else {
            script
                .front()
                .cloned()
                .ok_or_else(|| ProviderError::Request("poll script empty".to_string()))
        }
    }

    async fn download_artifact(&self, _artifact_ref: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(b"artifact-bytes".to_vec())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Store that records nothing on disk.
pub struct NullStore;

#[async_trait::async_trait]
impl ArtifactStore for NullStore {
    async fn put(
        &self,
        kind: GenerationKind,
        scene_id: DbId,
        version: i32,
        _bytes: &[u8],
    ) -> std::io::Result<String> {
        Ok(format!("{}/{scene_id}/{version}", kind.as_str()))
    }
}

/// Extractor that is never available.
pub struct NoExtractor;

#[async_trait::async_trait]
impl FrameExtractor for NoExtractor {
    async fn extract_last_frame(
        &self,
        _video_path: &Path,
        _output_path: &Path,
    ) -> std::io::Result<()> {
        unreachable!("extractor is reported unavailable")
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Build the full application router with all middleware layers, using
/// the given pool and a scripted provider.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool, provider: Arc<dyn GenerativeProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        provider,
        store: Arc::new(NullStore),
        extractor: Arc::new(NoExtractor),
    };
    build_app_router(state, &config)
}

/// Build a test app with a provider that is never called.
pub fn build_plain_app(pool: PgPool) -> Router {
    build_test_app(pool, Arc::new(ScriptedProvider::new()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
