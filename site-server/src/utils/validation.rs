//! Input validation helpers

use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Images per record
pub const MAX_IMAGES: usize = 50;

/// Run `validator` rules and map failures to a 400 with per-field details
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut err = AppError::validation("Validation failed");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        err = err.with_detail(field.to_string(), messages.join("; "));
    }
    err
}

/// Validate a list of image references sent by the frontend
pub fn validate_image_list(images: &[String], field: &str) -> Result<(), AppError> {
    if images.len() > MAX_IMAGES {
        return Err(AppError::validation(format!(
            "{field} has too many entries ({}, max {MAX_IMAGES})",
            images.len()
        )));
    }
    images
        .iter()
        .try_for_each(|image| validate_image_ref(image, field))
}

/// Validate one image reference
pub fn validate_image_ref(image: &str, field: &str) -> Result<(), AppError> {
    if image.len() > MAX_URL_LEN {
        return Err(AppError::validation(format!(
            "{field} entry is too long ({} chars, max {MAX_URL_LEN})",
            image.len()
        )));
    }
    Ok(())
}
