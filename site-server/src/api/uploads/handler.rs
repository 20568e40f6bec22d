//! Local image serving

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
};
use http::{StatusCode, header};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /uploads/:filename
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
        return Err(AppError::with_message(
            ErrorCode::InvalidFilename,
            format!("Invalid filename: {}", filename),
        ));
    }

    let path = state.image_cleanup.uploads_dir().join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found(format!("Image {}", filename)));
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read image");
            return Err(AppError::storage("Failed to read image"));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(format!("Failed to build response: {}", e)))
}
