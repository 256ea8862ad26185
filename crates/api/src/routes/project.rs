//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                               list
/// POST   /                               create
/// GET    /{id}                           get_by_id
/// PUT    /{id}                           update
/// DELETE /{id}                           delete
///
/// GET    /{id}/scenes                    list_scenes
/// POST   /{id}/scenes                    add_scene (free mode)
/// POST   /{id}/scenes/generate           generate_scenes (breakdown)
/// POST   /{id}/scenes/confirm-all        confirm_all_descriptions
/// POST   /{id}/generate-images           batch image generation
/// POST   /{id}/generate-videos           batch video generation
/// GET    /{id}/chains                    list_chains
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/scenes",
            get(project::list_scenes).post(project::add_scene),
        )
        .route("/{id}/scenes/generate", post(project::generate_scenes))
        .route(
            "/{id}/scenes/confirm-all",
            post(project::confirm_all_descriptions),
        )
        .route("/{id}/generate-images", post(project::generate_images))
        .route("/{id}/generate-videos", post(project::generate_videos))
        .route("/{id}/chains", get(project::list_chains))
}
