//! Wire DTOs
//!
//! Shared between site-server and the admin frontend (via API).
//! Persisted records live in `site-server::db::models`.

pub mod auth;
pub mod upload;

// Re-exports
pub use auth::*;
pub use upload::*;
