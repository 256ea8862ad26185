//! Handlers for scene materials (free-form attachments).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyreel_core::error::CoreError;
use storyreel_core::types::DbId;
use storyreel_db::models::material::{validate_material_type, CreateMaterial, Material};
use storyreel_db::repositories::MaterialRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/scenes/{id}/materials
///
/// Overrides `input.scene_id` with the value from the URL path.
pub async fn create(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(mut input): Json<CreateMaterial>,
) -> AppResult<(StatusCode, Json<Material>)> {
    validate_material_type(&input.material_type)?;
    input.scene_id = scene_id;
    let material = MaterialRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /api/v1/scenes/{id}/materials
pub async fn list_by_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<Json<Vec<Material>>> {
    let materials = MaterialRepo::list_by_scene(&state.pool, scene_id).await?;
    Ok(Json(materials))
}

/// GET /api/v1/materials/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Material>> {
    let material = MaterialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;
    Ok(Json(material))
}

/// DELETE /api/v1/materials/{id}
///
/// Removes the row only; the backing object stays in storage.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = MaterialRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
