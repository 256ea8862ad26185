//! Route definitions for video chains and continuation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chain;
use crate::state::AppState;

/// Routes mounted at `/chains`.
///
/// ```text
/// POST /                 create
/// GET  /{id}             get_by_id (with items)
/// POST /{id}/items       append_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(chain::create))
        .route("/{id}", get(chain::get_by_id))
        .route("/{id}/items", post(chain::append_item))
}

/// Routes mounted at `/videos`.
///
/// ```text
/// GET  /{video_id}/chain      chain membership lookup
/// POST /{video_id}/continue   generate a continuation clip
/// ```
pub fn video_router() -> Router<AppState> {
    Router::new()
        .route("/{video_id}/chain", get(chain::lookup_for_video))
        .route("/{video_id}/continue", post(chain::continue_video))
}
