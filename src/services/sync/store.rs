use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::models::{CanonicalEvent, NewEvent, SyncFieldUpdate, User};
use crate::db::{EventRepository, UserRepository};
use crate::error::AppResult;

/// What the sync engine needs from the event store.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<CanonicalEvent>>;

    /// Create an event and return its id.
    async fn create(&self, event: &NewEvent) -> AppResult<String>;

    async fn update_fields(&self, id: &str, update: &SyncFieldUpdate) -> AppResult<()>;

    async fn assign_organizers(&self, id: &str, user_ids: &[String]) -> AppResult<()>;

    async fn find_users_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>>;
}

/// `EventStore` backed by the service's SQLite database.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<CanonicalEvent>> {
        EventRepository::find_by_slug(&self.pool, slug).await
    }

    async fn create(&self, event: &NewEvent) -> AppResult<String> {
        EventRepository::create(&self.pool, event).await
    }

    async fn update_fields(&self, id: &str, update: &SyncFieldUpdate) -> AppResult<()> {
        EventRepository::update_sync_fields(&self.pool, id, update).await
    }

    async fn assign_organizers(&self, id: &str, user_ids: &[String]) -> AppResult<()> {
        EventRepository::assign_organizers(&self.pool, id, user_ids).await
    }

    async fn find_users_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        UserRepository::find_by_ids(&self.pool, ids).await
    }
}
