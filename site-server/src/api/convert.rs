//! 类型转换模块
//!
//! Repository errors into API errors, and records into the JSON the image
//! lifecycle reads.

use serde::Serialize;
use serde_json::Value;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository query failed");
                AppError::database(msg)
            }
        }
    }
}

/// Map a repository error, turning `NotFound` into a resource-specific code
pub fn repo_error(err: RepoError, not_found: ErrorCode) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(not_found, msg),
        other => other.into(),
    }
}

/// Record as JSON for the image lifecycle diff
///
/// Field names follow the wire (camelCase) form the descriptors use.
pub fn to_document<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::Duplicate("User 'a' already exists".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::Database("boom".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let err = repo_error(RepoError::NotFound("Project x".into()), ErrorCode::ProjectNotFound);
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
        assert_eq!(err.message, "Project x");
    }
}
