//! Services
//!
//! - [`ImageStore`]: where uploads land (local directory or S3)
//! - [`ImageCleanupService`]: deletion of locally stored images

pub mod image_cleanup;
pub mod image_store;

pub use image_cleanup::{DeletionFailure, DeletionReport, ImageCleanupService};
pub use image_store::ImageStore;
