//! User Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{NewUser, User};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user with an argon2 hash of `password`
    pub async fn create(&self, username: &str, password: &str, role: &str) -> RepoResult<User> {
        if self.find_by_username(username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                username
            )));
        }

        let password_hash = User::hash_password(password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {}", e)))?;
        let user = NewUser {
            username: username.to_string(),
            password_hash,
            role: role.to_string(),
            created_at: shared::util::now_millis(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Replace a user's password
    pub async fn set_password(&self, username: &str, password: &str) -> RepoResult<User> {
        let password_hash = User::hash_password(password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {}", e)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE user SET passwordHash = $hash WHERE username = $username")
            .bind(("hash", password_hash))
            .bind(("username", username.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", username)))
    }

    /// Create the user, or reset its password if it already exists
    pub async fn ensure(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> RepoResult<(User, bool)> {
        if self.find_by_username(username).await?.is_some() {
            let user = self.set_password(username, password).await?;
            return Ok((user, false));
        }
        let user = self.create(username, password, role).await?;
        Ok((user, true))
    }

    pub async fn count(&self) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await?;
        let total: Option<usize> = result.take("total")?;
        Ok(total.unwrap_or(0))
    }
}
