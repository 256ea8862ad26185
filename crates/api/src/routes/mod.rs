//! Route definitions, grouped per resource.

pub mod chain;
pub mod generation;
pub mod health;
pub mod material;
pub mod project;
pub mod scene;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/scenes", scene::router())
        .nest("/generation", generation::router())
        .nest("/chains", chain::router())
        .nest("/videos", chain::video_router())
        .nest("/materials", material::router())
}
