//! Unified error codes for the site backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Content errors (projects, services, clients, business info)
//! - 4xxx: Upload / image storage errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Username is already taken
    UsernameExists = 1101,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Content ====================
    /// Project not found
    ProjectNotFound = 3001,
    /// Service not found
    ServiceNotFound = 3101,
    /// Client testimonial not found
    ClientNotFound = 3201,

    // ==================== 4xxx: Upload ====================
    /// File too large
    FileTooLarge = 4001,
    /// Unsupported file format
    UnsupportedFileFormat = 4002,
    /// Invalid/corrupted image file
    InvalidImageFile = 4003,
    /// No file provided in request
    NoFileProvided = 4004,
    /// Empty file provided
    EmptyFile = 4005,
    /// Image processing failed
    ImageProcessingFailed = 4006,
    /// File storage failed
    FileStorageFailed = 4007,
    /// Filename is not a plain storage filename
    InvalidFilename = 4008,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Storage backend error
    StorageError = 9004,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            ErrorCode::NotAuthenticated => "Access denied",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::UsernameExists => "User already exists",

            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Access denied: admins only",

            ErrorCode::ProjectNotFound => "Project not found",
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ClientNotFound => "Client not found",

            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file uploaded",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "Failed to upload image",
            ErrorCode::InvalidFilename => "Invalid filename",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1101 => Ok(ErrorCode::UsernameExists),

            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            3001 => Ok(ErrorCode::ProjectNotFound),
            3101 => Ok(ErrorCode::ServiceNotFound),
            3201 => Ok(ErrorCode::ClientNotFound),

            4001 => Ok(ErrorCode::FileTooLarge),
            4002 => Ok(ErrorCode::UnsupportedFileFormat),
            4003 => Ok(ErrorCode::InvalidImageFile),
            4004 => Ok(ErrorCode::NoFileProvided),
            4005 => Ok(ErrorCode::EmptyFile),
            4006 => Ok(ErrorCode::ImageProcessingFailed),
            4007 => Ok(ErrorCode::FileStorageFailed),
            4008 => Ok(ErrorCode::InvalidFilename),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::UsernameExists,
        ErrorCode::PermissionDenied,
        ErrorCode::AdminRequired,
        ErrorCode::ProjectNotFound,
        ErrorCode::ServiceNotFound,
        ErrorCode::ClientNotFound,
        ErrorCode::FileTooLarge,
        ErrorCode::UnsupportedFileFormat,
        ErrorCode::InvalidImageFile,
        ErrorCode::NoFileProvided,
        ErrorCode::EmptyFile,
        ErrorCode::ImageProcessingFailed,
        ErrorCode::FileStorageFailed,
        ErrorCode::InvalidFilename,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
        ErrorCode::StorageError,
    ];

    #[test]
    fn test_every_code_converts_back() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(6001), Err(InvalidErrorCode(6001)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::ProjectNotFound).unwrap();
        assert_eq!(json, "3001");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::FileTooLarge);
    }
}
