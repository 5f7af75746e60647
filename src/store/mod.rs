pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Profile, PropertySummary, UserType, VisitRequest, VisitRequestView, VisitStatus};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("query error: {0}")]
    Query(String),
}

/// Profile persistence. Services do read-modify-write against whole
/// profiles; the store does not merge partial updates itself.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn find_profile_by_email(
        &self,
        email_id: &str,
        user_type: UserType,
    ) -> Result<Option<Profile>, StoreError>;

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Overwrite an existing profile. Last write wins; there is no
    /// optimistic-concurrency token.
    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;
}

/// Visit-request persistence. Requests are created by the tenant-side flow
/// and only ever updated by this subsystem, never deleted.
#[async_trait]
pub trait VisitRequestStore: Send + Sync {
    async fn get_visit_request(&self, id: Uuid) -> Result<Option<VisitRequest>, StoreError>;

    async fn insert_visit_request(&self, request: &VisitRequest) -> Result<(), StoreError>;

    async fn save_visit_request(&self, request: &VisitRequest) -> Result<(), StoreError>;

    /// Page of a landlord's requests, newest first, with tenant and property
    /// references resolved. A dangling property reference resolves to None;
    /// a request with a dangling tenant reference is excluded from both the
    /// page and `count_visit_requests`.
    async fn list_visit_requests(
        &self,
        landlord: Uuid,
        status: Option<VisitStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VisitRequestView>, StoreError>;

    async fn count_visit_requests(
        &self,
        landlord: Uuid,
        status: Option<VisitStatus>,
    ) -> Result<i64, StoreError>;
}

/// Full store capability handed to the services at construction.
#[async_trait]
pub trait Store: ProfileStore + VisitRequestStore {
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Register a property summary so visit-request listings can resolve it.
    /// Property records themselves belong to an external subsystem.
    async fn upsert_property(&self, property: &PropertySummary) -> Result<(), StoreError>;
}
