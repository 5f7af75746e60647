//! In-process store backend. Default for tests and available at runtime via
//! `RENTBASE_STORE=memory` for development without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Profile, PropertySummary, TenantSummary, UserType, VisitRequest, VisitRequestView, VisitStatus,
};

use super::{ProfileStore, Store, StoreError, VisitRequestStore};

#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    visit_requests: RwLock<HashMap<Uuid, VisitRequest>>,
    properties: RwLock<HashMap<Uuid, PropertySummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn resolve(&self, request: &VisitRequest) -> Option<VisitRequestView> {
        let profiles = self.profiles.read().await;
        let tenant = profiles.get(&request.tenant)?;
        let property = self.properties.read().await.get(&request.property).cloned();

        Some(VisitRequestView {
            id: request.id,
            tenant: TenantSummary {
                id: tenant.id,
                full_name: tenant.full_name.clone(),
                email_id: tenant.email_id.clone(),
                phonenumber: tenant.phonenumber.clone(),
                profile_photo: tenant.profile_photo.clone(),
            },
            property,
            status: request.status,
            progress: request.progress,
            scheduled_date: request.scheduled_date,
            notes: request.notes.clone(),
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
    }

    /// Requests whose tenant profile has vanished are excluded here so the
    /// listing and its count never disagree.
    async fn matching(&self, landlord: Uuid, status: Option<VisitStatus>) -> Vec<VisitRequest> {
        let profiles = self.profiles.read().await;
        let requests = self.visit_requests.read().await;
        let mut matched: Vec<VisitRequest> = requests
            .values()
            .filter(|r| r.landlord == landlord)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .filter(|r| profiles.contains_key(&r.tenant))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn find_profile_by_email(
        &self,
        email_id: &str,
        user_type: UserType,
    ) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|p| p.email_id == email_id && p.user_type == user_type)
            .cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());
        Ok(())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id) {
            return Err(StoreError::NotFound(format!(
                "profile {} not found",
                profile.id
            )));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl VisitRequestStore for MemoryStore {
    async fn get_visit_request(&self, id: Uuid) -> Result<Option<VisitRequest>, StoreError> {
        Ok(self.visit_requests.read().await.get(&id).cloned())
    }

    async fn insert_visit_request(&self, request: &VisitRequest) -> Result<(), StoreError> {
        self.visit_requests
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn save_visit_request(&self, request: &VisitRequest) -> Result<(), StoreError> {
        let mut requests = self.visit_requests.write().await;
        if !requests.contains_key(&request.id) {
            return Err(StoreError::NotFound(format!(
                "visit request {} not found",
                request.id
            )));
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn list_visit_requests(
        &self,
        landlord: Uuid,
        status: Option<VisitStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VisitRequestView>, StoreError> {
        let matched = self.matching(landlord, status).await;
        let mut page = Vec::new();
        for request in matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
        {
            if let Some(view) = self.resolve(&request).await {
                page.push(view);
            }
        }
        Ok(page)
    }

    async fn count_visit_requests(
        &self,
        landlord: Uuid,
        status: Option<VisitStatus>,
    ) -> Result<i64, StoreError> {
        Ok(self.matching(landlord, status).await.len() as i64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn upsert_property(&self, property: &PropertySummary) -> Result<(), StoreError> {
        self.properties
            .write()
            .await
            .insert(property.id, property.clone());
        Ok(())
    }
}
