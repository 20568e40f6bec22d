//! Business Info API 模块 (单例)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/info",
        get(handler::get).post(handler::upsert).put(handler::upsert),
    )
}
