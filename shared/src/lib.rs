//! Shared types for the site backend
//!
//! Error codes and response envelopes, wire DTOs exchanged with the admin
//! frontend, and small utilities used by both the HTTP server and the
//! maintenance CLI.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
