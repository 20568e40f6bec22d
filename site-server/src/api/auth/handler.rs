//! Authentication Handlers
//!
//! Login, admin registration and the current-user lookup

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::ROLE_ADMIN;
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::validation::validate_payload;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Unknown user and wrong password produce the same error.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_payload(&req)?;

    let user = state.user_repo().find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => {
            let password_valid = user
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = req.username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }
            user
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let info = user.to_info();
    let token = state
        .jwt_service
        .generate_token(&info.id, &info.username, &info.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %info.id, username = %info.username, "User logged in successfully");

    Ok(Json(LoginResponse { token, user: info }))
}

/// POST /api/auth/register - 管理员创建账号
pub async fn register(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    validate_payload(&req)?;

    let role = req.role.as_deref().unwrap_or(ROLE_ADMIN);
    let user = state
        .user_repo()
        .create(&req.username, &req.password, role)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::UsernameExists, msg),
            other => other.into(),
        })?;

    tracing::info!(
        username = %user.username,
        created_by = %admin.username,
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User registered successfully")),
    ))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .user_repo()
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.username)))?;
    Ok(Json(user.to_info()))
}
