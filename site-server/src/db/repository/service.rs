//! Service Repository

use super::{BaseRepository, RepoError, RepoResult, Repository, record_id};
use crate::db::models::{Service, ServiceCreate, ServiceUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "service";

#[derive(Clone)]
pub struct ServiceRepository {
    base: BaseRepository,
}

impl ServiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

impl Repository<Service, ServiceCreate, ServiceUpdate> for ServiceRepository {
    /// Find all services in creation order
    async fn find_all(&self) -> RepoResult<Vec<Service>> {
        let services: Vec<Service> = self
            .base
            .db()
            .query("SELECT * FROM service ORDER BY createdAt")
            .await?
            .take(0)?;
        Ok(services)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Service>> {
        let service: Option<Service> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(service)
    }

    async fn create(&self, data: ServiceCreate) -> RepoResult<Service> {
        let now = shared::util::now_millis();
        let service = Service {
            id: None,
            title: data.title,
            description: data.description,
            icon: data.icon,
            details: data.details,
            features: data.features,
            quality_specs: data.quality_specs,
            images: data.images,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Service> = self.base.db().create(TABLE).content(service).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create service".to_string()))
    }

    async fn update(&self, id: &str, mut data: ServiceUpdate) -> RepoResult<Service> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Service {} not found", id)));
        }

        data.updated_at = Some(shared::util::now_millis());
        let updated: Option<Service> = self
            .base
            .db()
            .update(record_id(TABLE, id))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Service {} not found", id)))
    }

    async fn delete(&self, id: &str) -> RepoResult<Option<Service>> {
        let deleted: Option<Service> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted)
    }
}
