//! Shared test doubles and fixtures for pipeline integration tests.
//!
//! Each integration test binary compiles its own copy; not every test
//! uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use sqlx::PgPool;
use storyreel_core::status::{GenerationKind, GenerationStatus};
use storyreel_core::types::DbId;
use storyreel_db::models::project::CreateProject;
use storyreel_db::models::scene::CreateScene;
use storyreel_db::repositories::{ProjectRepo, SceneRepo};
use storyreel_pipeline::store::ArtifactStore;
use storyreel_provider::{
    CreateJobRequest, CreatedJob, GenerativeProvider, JobPoll, JobStatus, ProviderError,
};

// ---------------------------------------------------------------------------
// Mock provider
// ---------------------------------------------------------------------------

/// Scripted provider: answers calls from queues filled by the test.
/// An exhausted queue repeats its last scripted answer.
pub struct MockProvider {
    pub configured: bool,
    create_script: Mutex<VecDeque<Result<CreatedJob, String>>>,
    poll_script: Mutex<VecDeque<JobPoll>>,
    pub download_fails: bool,
    pub poll_calls: Mutex<u32>,
    /// Every request passed to `create_job`, in call order.
    pub create_requests: Mutex<Vec<CreateJobRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            configured: true,
            create_script: Mutex::new(VecDeque::new()),
            poll_script: Mutex::new(VecDeque::new()),
            download_fails: false,
            poll_calls: Mutex::new(0),
            create_requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider whose next job is created as `task_id` and completes
    /// immediately with `url`.
    pub fn completing(task_id: &str, url: &str) -> Self {
        let provider = Self::new();
        provider.script_create(task_id);
        provider.script_poll(JobPoll {
            status: JobStatus::Completed,
            artifact_url: Some(url.to_string()),
            error_message: None,
        });
        provider
    }

    /// Provider whose next job fails with `message` on the first poll.
    pub fn failing(task_id: &str, message: &str) -> Self {
        let provider = Self::new();
        provider.script_create(task_id);
        provider.script_poll(JobPoll {
            status: JobStatus::Failed,
            artifact_url: None,
            error_message: Some(message.to_string()),
        });
        provider
    }

    /// Provider that never finishes: every poll reports processing.
    pub fn stuck(task_id: &str) -> Self {
        let provider = Self::new();
        provider.script_create(task_id);
        provider.script_poll(JobPoll {
            status: JobStatus::Processing,
            artifact_url: None,
            error_message: None,
        });
        provider
    }

    pub fn script_create(&self, task_id: &str) {
        self.create_script.lock().unwrap().push_back(Ok(CreatedJob {
            job_id: task_id.to_string(),
            status: JobStatus::Pending,
        }));
    }

    pub fn script_create_error(&self, message: &str) {
        self.create_script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn script_poll(&self, poll: JobPoll) {
        self.poll_script.lock().unwrap().push_back(poll);
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for MockProvider {
    async fn create_job(&self, input: &CreateJobRequest) -> Result<CreatedJob, ProviderError> {
        self.create_requests.lock().unwrap().push(input.clone());
        let mut script = self.create_script.lock().unwrap();
        match script.pop_front() {
            Some(Ok(job)) => Ok(job),
            Some(Err(message)) => Err(ProviderError::Api {
                status: 422,
                body: message,
            }),
            None => panic!("unexpected create_job call"),
        }
    }

    async fn poll_job(&self, _job_id: &str) -> Result<JobPoll, ProviderError> {
        *self.poll_calls.lock().unwrap() += 1;
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
        if self.download_fails {
            Err(ProviderError::Request("connection reset".to_string()))
        } else {
            Ok(b"artifact-bytes".to_vec())
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

// ---------------------------------------------------------------------------
// In-memory artifact store
// ---------------------------------------------------------------------------

/// Records puts without touching the filesystem.
pub struct MemoryStore {
    pub puts: Mutex<Vec<(GenerationKind, DbId, i32)>>,
    pub fails: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fails: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fails: true,
        }
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryStore {
    async fn put(
        &self,
        kind: GenerationKind,
        scene_id: DbId,
        version: i32,
        _bytes: &[u8],
    ) -> std::io::Result<String> {
        if self.fails {
            return Err(std::io::Error::other("disk full"));
        }
        self.puts.lock().unwrap().push((kind, scene_id, version));
        Ok(format!("{}/{scene_id}/{version}", kind.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_project(pool: &PgPool, title: &str) -> DbId {
    ProjectRepo::create(
        pool,
        &CreateProject {
            title: title.to_string(),
            story: None,
            style: None,
            mode: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn create_scene(pool: &PgPool, project_id: DbId, order_index: i32) -> DbId {
    SceneRepo::create(
        pool,
        &CreateScene {
            project_id,
            order_index,
            description: format!("Scene {order_index}"),
            mode: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// A scene whose description is confirmed, ready for image generation.
pub async fn scene_ready_for_image(pool: &PgPool, project_id: DbId, order_index: i32) -> DbId {
    let scene_id = create_scene(pool, project_id, order_index).await;
    SceneRepo::confirm_description(pool, scene_id).await.unwrap();
    scene_id
}

/// A scene with a completed image, ready for video generation.
pub async fn scene_ready_for_video(pool: &PgPool, project_id: DbId, order_index: i32) -> DbId {
    use storyreel_db::models::artifact::CompletedArtifact;
    use storyreel_db::repositories::ImageRepo;

    let scene_id = scene_ready_for_image(pool, project_id, order_index).await;
    let image = ImageRepo::create_in_flight(pool, scene_id, &format!("img-task-{scene_id}"))
        .await
        .unwrap();
    ImageRepo::complete(
        pool,
        image.id,
        &CompletedArtifact {
            storage_path: format!("images/{scene_id}/1.png"),
            url: format!("https://cdn.example/images/{scene_id}/1.png"),
            duration_secs: None,
        },
    )
    .await
    .unwrap();
    SceneRepo::set_status(pool, scene_id, GenerationKind::Image, GenerationStatus::Completed)
        .await
        .unwrap();
    scene_id
}
