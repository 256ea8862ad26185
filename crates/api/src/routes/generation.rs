//! Route definitions for generation task tracking.

use axum::routing::get;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generation`.
///
/// ```text
/// GET /tasks/{kind}/{task_id}   poll-and-finalize one task
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/tasks/{kind}/{task_id}", get(generation::task_status))
}
