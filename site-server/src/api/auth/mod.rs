//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// - /api/auth/login: public
/// - /api/auth/register: admin (AdminUser extractor)
/// - /api/auth/me: token (global require_auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/me", get(handler::me))
}
