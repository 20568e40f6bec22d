//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::UserInfo;
use surrealdb::RecordId;

pub const ROLE_ADMIN: &str = "admin";

/// Admin user matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub created_at: i64,
}

fn default_role() -> String {
    ROLE_ADMIN.to_string()
}

/// Stored form of a new user (carries the hash, unlike [`User`]'s
/// serialization)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: i64,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: serde_helpers::id_string(&self.id),
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}
