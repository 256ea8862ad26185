//! Route definitions for the `/scenes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{generation, material, scene};
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// GET    /{id}                      get_by_id
/// PUT    /{id}                      update
/// DELETE /{id}                      delete
/// POST   /{id}/confirm-description  confirm_description
///
/// POST   /{id}/generate-image       start image generation
/// POST   /{id}/generate-video       start video generation
/// POST   /{id}/confirm-image        confirm_image
/// POST   /{id}/confirm-video        confirm_video
/// GET    /{id}/images               list image versions
/// GET    /{id}/videos               list video versions
///
/// GET    /{id}/materials            list materials
/// POST   /{id}/materials            attach material
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(scene::get_by_id).put(scene::update).delete(scene::delete),
        )
        .route("/{id}/confirm-description", post(scene::confirm_description))
        .route("/{id}/generate-image", post(generation::generate_image))
        .route("/{id}/generate-video", post(generation::generate_video))
        .route("/{id}/confirm-image", post(scene::confirm_image))
        .route("/{id}/confirm-video", post(scene::confirm_video))
        .route("/{id}/images", get(generation::list_images))
        .route("/{id}/videos", get(generation::list_videos))
        .route(
            "/{id}/materials",
            get(material::list_by_scene).post(material::create),
        )
}
