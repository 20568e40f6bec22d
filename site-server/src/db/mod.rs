//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) and the repositories over it.

pub mod models;
pub mod repository;
pub mod seed;

use std::path::Path;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "site";
const DATABASE: &str = "site";

const SCHEMA: &str = "
    DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;
";

/// Database service, owns the embedded store handle
///
/// Cloning shares the handle. The store is released when the last clone is
/// dropped; [`DbService::close`] makes that explicit at the end of a CLI run.
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `path` and apply the schema
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::database(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!(path = %path.display(), "Database connection established (SurrealDB RocksDB)");
        Ok(Self { db })
    }

    /// Release this handle
    pub fn close(self) {
        drop(self.db);
        tracing::info!("Database connection closed");
    }
}
