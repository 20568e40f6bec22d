use thiserror::Error;

use crate::auth::JwtError;
use crate::utils::AppError;

/// Startup and serving failures
///
/// Request-level failures are [`AppError`]s; this type covers everything
/// that stops the process before or while the listener runs.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("JWT 配置错误: {0}")]
    Jwt(#[from] JwtError),

    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
