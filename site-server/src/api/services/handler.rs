//! Service API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert::{repo_error, to_document};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Service, ServiceCreate, ServiceUpdate};
use crate::db::repository::{Repository, ServiceRepository};
use crate::images::descriptor;
use crate::utils::validation::{validate_image_list, validate_payload};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::ServiceNotFound, format!("Service {} not found", id))
}

/// GET /api/services
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Service>>> {
    let services = ServiceRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(services))
}

/// GET /api/services/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(service))
}

/// POST /api/services
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    validate_payload(&payload)?;
    validate_image_list(&payload.images, "images")?;

    let service = ServiceRepository::new(state.db.clone())
        .create(payload)
        .await?;

    tracing::info!(id = ?service.id, title = %service.title, operator = %admin.username, "Service created");
    Ok(Json(service))
}

/// PUT /api/services/:id
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ServiceUpdate>,
) -> AppResult<Json<Service>> {
    validate_payload(&payload)?;
    if let Some(images) = &payload.images {
        validate_image_list(images, "images")?;
    }

    let repo = ServiceRepository::new(state.db.clone());
    let old = repo.find_by_id(&id).await?.ok_or_else(|| not_found(&id))?;
    let service = repo
        .update(&id, payload)
        .await
        .map_err(|e| repo_error(e, ErrorCode::ServiceNotFound))?;

    let released = state
        .release_images(&descriptor::SERVICE, &to_document(&old), &to_document(&service))
        .await;

    tracing::info!(id = %id, released, operator = %admin.username, "Service updated");
    Ok(Json(service))
}

/// DELETE /api/services/:id
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ServiceRepository::new(state.db.clone())
        .delete(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let released = state
        .release_all_images(&descriptor::SERVICE, &to_document(&service))
        .await;

    tracing::info!(id = %id, released, operator = %admin.username, "Service deleted");
    Ok(Json(ApiResponse::message("Service deleted successfully")))
}
