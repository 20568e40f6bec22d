//! Auth API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Register request (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Login / register response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public user information (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_fields() {
        let req = LoginRequest {
            username: String::new(),
            password: "secret".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_register_password_length() {
        let req = RegisterRequest {
            username: "editor".into(),
            password: "123".into(),
            role: None,
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            password: "123456".into(),
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
