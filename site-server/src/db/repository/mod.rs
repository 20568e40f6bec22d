//! Repository Module
//!
//! CRUD operations over the SurrealDB tables.

// Auth
pub mod user;

// Content
pub mod business_info;
pub mod client;
pub mod project;
pub mod service;

// Reconciliation reads
pub mod documents;

// Re-exports
pub use business_info::BusinessInfoRepository;
pub use client::ClientRepository;
pub use documents::DocumentReader;
pub use project::ProjectRepository;
pub use service::ServiceRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: &str, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: &str) -> RepoResult<Option<T>>;
}

// =============================================================================
// ID convention
// =============================================================================
//
// The API hands out ids as "table:key" strings. Handlers accept either that
// form or the bare key; repositories normalize with `record_id`.

/// Bare key of an id given as `"table:key"` or `"key"`
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Record id in `table` for an id given in either form
pub fn record_id(table: &str, id: &str) -> RecordId {
    RecordId::from_table_key(table, strip_table_prefix(table, id))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
