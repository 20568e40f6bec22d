//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::ProjectNotFound
            | Self::ServiceNotFound
            | Self::ClientNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::UsernameExists => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageError
            | Self::ImageProcessingFailed
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ProjectNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ClientNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AdminRequired.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::UsernameExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upload_statuses() {
        assert_eq!(
            ErrorCode::FileTooLarge.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::NoFileProvided.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::FileStorageFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
