//! Client Testimonial Repository

use super::{BaseRepository, RepoError, RepoResult, Repository, record_id};
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "client";

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

impl Repository<Client, ClientCreate, ClientUpdate> for ClientRepository {
    /// Find all testimonials, newest first
    async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query("SELECT * FROM client ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(clients)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Client>> {
        let client: Option<Client> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(client)
    }

    async fn create(&self, data: ClientCreate) -> RepoResult<Client> {
        let client = Client {
            id: None,
            name: data.name,
            role: data.role,
            feedback: data.feedback,
            image: data.image.filter(|i| !i.is_empty()),
            rating: data.rating,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Client> = self.base.db().create(TABLE).content(client).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create client".to_string()))
    }

    async fn update(&self, id: &str, data: ClientUpdate) -> RepoResult<Client> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Client {} not found", id)));
        }

        let updated: Option<Client> = self
            .base
            .db()
            .update(record_id(TABLE, id))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))
    }

    async fn delete(&self, id: &str) -> RepoResult<Option<Client>> {
        let deleted: Option<Client> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted)
    }
}
