//! 文件上传路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/upload | POST | 上传图片 (multipart: image 或 file) | 管理员 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/upload", post(handler::upload))
}
