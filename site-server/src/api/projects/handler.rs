//! Project API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert::{repo_error, to_document};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Project, ProjectCreate, ProjectUpdate};
use crate::db::repository::{ProjectRepository, Repository};
use crate::images::descriptor;
use crate::utils::validation::{validate_image_list, validate_payload};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::ProjectNotFound, format!("Project {} not found", id))
}

/// GET /api/projects - 获取所有项目 (最新优先)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Project>>> {
    let repo = ProjectRepository::new(state.db.clone());
    let projects = repo.find_all().await?;
    Ok(Json(projects))
}

/// GET /api/projects/:id - 获取单个项目
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let repo = ProjectRepository::new(state.db.clone());
    let project = repo.find_by_id(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(Json(project))
}

/// POST /api/projects - 创建项目
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<ProjectCreate>,
) -> AppResult<Json<Project>> {
    validate_payload(&payload)?;
    validate_image_list(&payload.images, "images")?;

    let repo = ProjectRepository::new(state.db.clone());
    let project = repo.create(payload).await?;

    tracing::info!(
        id = ?project.id,
        title = %project.title,
        operator = %admin.username,
        "Project created"
    );
    Ok(Json(project))
}

/// PUT /api/projects/:id - 更新项目
///
/// Images dropped from the list are deleted from local storage after the
/// update succeeds.
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ProjectUpdate>,
) -> AppResult<Json<Project>> {
    validate_payload(&payload)?;
    if let Some(images) = &payload.images {
        validate_image_list(images, "images")?;
    }

    let repo = ProjectRepository::new(state.db.clone());
    let old = repo.find_by_id(&id).await?.ok_or_else(|| not_found(&id))?;
    let project = repo
        .update(&id, payload)
        .await
        .map_err(|e| repo_error(e, ErrorCode::ProjectNotFound))?;

    let released = state
        .release_images(&descriptor::PROJECT, &to_document(&old), &to_document(&project))
        .await;

    tracing::info!(id = %id, released, operator = %admin.username, "Project updated");
    Ok(Json(project))
}

/// DELETE /api/projects/:id - 删除项目及其本地图片
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = ProjectRepository::new(state.db.clone());
    let project = repo.delete(&id).await?.ok_or_else(|| not_found(&id))?;

    let released = state
        .release_all_images(&descriptor::PROJECT, &to_document(&project))
        .await;

    tracing::info!(id = %id, released, operator = %admin.username, "Project deleted");
    Ok(Json(ApiResponse::message("Project deleted successfully")))
}
