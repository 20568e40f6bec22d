//! 本地图片静态服务
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /uploads/{filename} | GET | 读取本地图片 | 无 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/uploads/{filename}", get(handler::serve))
}
