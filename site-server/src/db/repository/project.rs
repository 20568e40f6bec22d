//! Project Repository

use super::{BaseRepository, RepoError, RepoResult, Repository, record_id};
use crate::db::models::{Project, ProjectCreate, ProjectUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "project";

#[derive(Clone)]
pub struct ProjectRepository {
    base: BaseRepository,
}

impl ProjectRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

impl Repository<Project, ProjectCreate, ProjectUpdate> for ProjectRepository {
    /// Find all projects, newest first
    async fn find_all(&self) -> RepoResult<Vec<Project>> {
        let projects: Vec<Project> = self
            .base
            .db()
            .query("SELECT * FROM project ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(projects)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Project>> {
        let project: Option<Project> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(project)
    }

    async fn create(&self, data: ProjectCreate) -> RepoResult<Project> {
        let project = Project {
            id: None,
            title: data.title,
            category: data.category,
            location: data.location,
            description: data.description,
            images: data.images,
            featured: data.featured,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Project> = self.base.db().create(TABLE).content(project).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create project".to_string()))
    }

    async fn update(&self, id: &str, data: ProjectUpdate) -> RepoResult<Project> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Project {} not found", id)));
        }

        let updated: Option<Project> = self
            .base
            .db()
            .update(record_id(TABLE, id))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Project {} not found", id)))
    }

    async fn delete(&self, id: &str) -> RepoResult<Option<Project>> {
        let deleted: Option<Project> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted)
    }
}
