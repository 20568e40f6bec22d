//! Client Testimonial API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert::{repo_error, to_document};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::db::repository::{ClientRepository, Repository};
use crate::images::descriptor;
use crate::utils::validation::{validate_image_ref, validate_payload};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::ClientNotFound, format!("Client {} not found", id))
}

/// GET /api/clients - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(clients))
}

/// GET /api/clients/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let client = ClientRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(client))
}

/// POST /api/clients
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_payload(&payload)?;
    if let Some(image) = &payload.image {
        validate_image_ref(image, "image")?;
    }

    let client = ClientRepository::new(state.db.clone())
        .create(payload)
        .await?;

    tracing::info!(id = ?client.id, name = %client.name, operator = %admin.username, "Client created");
    Ok(Json(client))
}

/// PUT /api/clients/:id
///
/// A replaced or cleared photo is deleted from local storage.
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    validate_payload(&payload)?;
    if let Some(image) = &payload.image {
        validate_image_ref(image, "image")?;
    }

    let repo = ClientRepository::new(state.db.clone());
    let old = repo.find_by_id(&id).await?.ok_or_else(|| not_found(&id))?;
    let client = repo
        .update(&id, payload)
        .await
        .map_err(|e| repo_error(e, ErrorCode::ClientNotFound))?;

    let released = state
        .release_images(&descriptor::CLIENT, &to_document(&old), &to_document(&client))
        .await;

    tracing::info!(id = %id, released, operator = %admin.username, "Client updated");
    Ok(Json(client))
}

/// DELETE /api/clients/:id
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let client = ClientRepository::new(state.db.clone())
        .delete(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let released = state
        .release_all_images(&descriptor::CLIENT, &to_document(&client))
        .await;

    tracing::info!(id = %id, released, operator = %admin.username, "Client deleted");
    Ok(Json(ApiResponse::message("Client deleted successfully")))
}
