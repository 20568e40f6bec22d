//! Unified error system for the site backend
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code, message, and details
//! - [`ApiResponse`]: JSON envelope for errors and acknowledgements
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::validation("Title is required").with_detail("field", "title");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(ErrorCode::ValidationFailed.code()));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
