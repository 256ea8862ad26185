use std::sync::Arc;

use storyreel_pipeline::frame::FrameExtractor;
use storyreel_pipeline::store::ArtifactStore;
use storyreel_provider::GenerativeProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storyreel_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generative provider adapter.
    pub provider: Arc<dyn GenerativeProvider>,
    /// Artifact storage backend.
    pub store: Arc<dyn ArtifactStore>,
    /// Last-frame extractor for video continuation.
    pub extractor: Arc<dyn FrameExtractor>,
}
