//! Route definitions for standalone material operations.

use axum::routing::get;
use axum::Router;

use crate::handlers::material;
use crate::state::AppState;

/// Routes mounted at `/materials`.
///
/// ```text
/// GET    /{id}   get_by_id
/// DELETE /{id}   delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(material::get_by_id).delete(material::delete))
}
