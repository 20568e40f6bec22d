//! Image Upload Handler
//!
//! Accepts PNG, JPEG and WebP uploads from admins and re-encodes them as
//! JPEG before handing them to the configured image store.

use std::io::Cursor;
use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::extract::multipart::MultipartError;
use http::StatusCode;
use image::codecs::jpeg::JpegEncoder;
use shared::models::UploadResponse;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Multipart field names carrying the file
const FILE_FIELDS: &[&str] = &["image", "file"];

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for site images
const JPEG_QUALITY: u8 = 85;

struct UploadedFile {
    filename: Option<String>,
    data: Vec<u8>,
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_bytes);
    }
    AppError::invalid(format!("Invalid multipart request: {}", e))
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!("File too large. Maximum size is {}", shared::util::format_mb(max_bytes as u64)),
    )
    .with_detail("maxBytes", max_bytes)
}

async fn read_file_field(multipart: &mut Multipart, max_bytes: usize) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if !field.name().is_some_and(|name| FILE_FIELDS.contains(&name)) {
            continue;
        }
        let filename = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
            .to_vec();
        return Ok(UploadedFile { filename, data });
    }

    Err(AppError::with_message(
        ErrorCode::NoFileProvided,
        "No file uploaded. Field name must be 'image' or 'file'",
    ))
}

/// Validate size and extension, then decode to prove it is an image
fn validate_image(file: &UploadedFile, max_bytes: usize) -> AppResult<image::DynamicImage> {
    if file.data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if file.data.len() > max_bytes {
        return Err(too_large(max_bytes));
    }

    let filename = file
        .filename
        .as_deref()
        .ok_or_else(|| AppError::new(ErrorCode::InvalidFilename))?;
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let is_image = mime_guess::from_path(filename)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE);
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) || !is_image {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    image::load_from_memory(&file.data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })
}

/// Re-encode as JPEG
fn compress_image(img: &image::DynamicImage) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {}", e),
            )
        })?;
    }
    Ok(buffer)
}

/// POST /api/upload
pub async fn upload(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let max_bytes = state.config.max_upload_bytes;
    let file = read_file_field(&mut multipart, max_bytes).await?;

    let img = validate_image(&file, max_bytes)?;
    let jpeg = compress_image(&img)?;
    let response = state.image_store.store(jpeg).await?;

    tracing::info!(
        original = file.filename.as_deref().unwrap_or_default(),
        size = file.data.len(),
        file_path = %response.file_path,
        operator = %admin.username,
        "Image uploaded"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn file(name: Option<&str>, data: Vec<u8>) -> UploadedFile {
        UploadedFile {
            filename: name.map(String::from),
            data,
        }
    }

    #[test]
    fn test_valid_png_is_reencoded_as_jpeg() {
        let img = validate_image(&file(Some("shop.PNG"), png_bytes()), 1024 * 1024).unwrap();
        let jpeg = compress_image(&img).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_rejections() {
        let err = validate_image(&file(Some("a.png"), vec![]), 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let err = validate_image(&file(Some("a.png"), png_bytes()), 8).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        let err = validate_image(&file(Some("a.gif"), png_bytes()), 1024 * 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = validate_image(&file(None, png_bytes()), 1024 * 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFilename);

        let err =
            validate_image(&file(Some("a.jpg"), b"not an image".to_vec()), 1024 * 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }
}
