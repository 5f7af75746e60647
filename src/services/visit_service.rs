use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Pagination, VisitAction, VisitRequest, VisitRequestPage, VisitStatus,
};
use crate::store::Store;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Landlord-side visit-request operations: paginated listing and the
/// accept/reject/schedule transition. Requests are created by the
/// tenant-side flow and never deleted here.
#[derive(Clone)]
pub struct VisitRequestService {
    store: Arc<dyn Store>,
}

impl VisitRequestService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// One page of the landlord's requests, newest first, with tenant and
    /// property references resolved to their restricted field subsets.
    pub async fn list_visit_requests(
        &self,
        landlord: Uuid,
        status_filter: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<VisitRequestPage, ApiError> {
        let status = match status_filter {
            None | Some("") => None,
            Some(raw) => Some(
                VisitStatus::parse(raw)
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid status '{}'", raw)))?,
            ),
        };

        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100);

        let visit_requests = self
            .store
            .list_visit_requests(landlord, status, (page - 1) * limit, limit)
            .await?;
        let total_items = self.store.count_visit_requests(landlord, status).await?;

        Ok(VisitRequestPage {
            visit_requests,
            pagination: Pagination::build(page, limit, total_items),
        })
    }

    /// Apply a landlord action to a request:
    ///
    /// - accept   -> landlord_approved, progress 80
    /// - reject   -> landlord_rejected, progress 100
    /// - schedule -> scheduled, progress 100, scheduled date and notes set
    ///
    /// Only the referenced landlord may transition a request. The prior
    /// status is deliberately not checked; repeat transitions overwrite the
    /// earlier ones, last write wins.
    pub async fn transition_visit_request(
        &self,
        request_id: Uuid,
        acting_landlord: Uuid,
        action: &str,
        date: Option<DateTime<Utc>>,
        note: Option<String>,
    ) -> Result<VisitRequest, ApiError> {
        let mut request = self
            .store
            .get_visit_request(request_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Visit request not found"))?;

        if request.landlord != acting_landlord {
            return Err(ApiError::forbidden("Unauthorized"));
        }

        let action = VisitAction::parse(action)
            .ok_or_else(|| ApiError::bad_request("Invalid action"))?;

        match action {
            VisitAction::Accept => {
                request.status = VisitStatus::LandlordApproved;
                request.progress = 80;
            }
            VisitAction::Reject => {
                request.status = VisitStatus::LandlordRejected;
                request.progress = 100;
            }
            VisitAction::Schedule => {
                let date = date
                    .ok_or_else(|| ApiError::bad_request("Scheduled date is required"))?;
                request.status = VisitStatus::Scheduled;
                request.progress = 100;
                request.scheduled_date = Some(date);
                request.notes = note;
            }
        }
        request.updated_at = Utc::now();

        self.store.save_visit_request(&request).await?;
        tracing::info!(
            request = %request.id,
            status = request.status.as_str(),
            "visit request transitioned"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::models::{Profile, PropertySummary, UserType};
    use crate::store::{MemoryStore, ProfileStore, VisitRequestStore};

    struct Fixture {
        service: VisitRequestService,
        store: Arc<MemoryStore>,
        landlord: Uuid,
        tenant: Uuid,
        property: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());

        let landlord = Profile::register(
            "Om Prakash",
            "om@example.com",
            "9000000010",
            UserType::Owner,
            hash_password("pw"),
        );
        let tenant = Profile::register(
            "Neha Gupta",
            "neha@example.com",
            "9000000011",
            UserType::Tenant,
            hash_password("pw"),
        );
        store.insert_profile(&landlord).await.unwrap();
        store.insert_profile(&tenant).await.unwrap();

        let property = PropertySummary {
            id: Uuid::new_v4(),
            title: "2BHK near station".into(),
            location: Some("Andheri West".into()),
            images: vec!["/files/p1.jpg".into()],
        };
        store.upsert_property(&property).await.unwrap();

        Fixture {
            service: VisitRequestService::new(store.clone()),
            store,
            landlord: landlord.id,
            tenant: tenant.id,
            property: property.id,
        }
    }

    async fn seed_request(fx: &Fixture) -> VisitRequest {
        let request = VisitRequest::new(fx.tenant, fx.landlord, fx.property);
        fx.store.insert_visit_request(&request).await.unwrap();
        request
    }

    #[tokio::test]
    async fn accept_moves_to_landlord_approved_at_80() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;

        let updated = fx
            .service
            .transition_visit_request(request.id, fx.landlord, "accept", None, None)
            .await
            .expect("accept");

        assert_eq!(updated.status, VisitStatus::LandlordApproved);
        assert_eq!(updated.progress, 80);
        assert!(updated.scheduled_date.is_none());
    }

    #[tokio::test]
    async fn reject_moves_to_landlord_rejected_at_100() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;

        let updated = fx
            .service
            .transition_visit_request(request.id, fx.landlord, "reject", None, None)
            .await
            .expect("reject");

        assert_eq!(updated.status, VisitStatus::LandlordRejected);
        assert_eq!(updated.progress, 100);
    }

    #[tokio::test]
    async fn schedule_sets_date_and_notes() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;
        let when = Utc::now() + chrono::Duration::days(3);

        let updated = fx
            .service
            .transition_visit_request(
                request.id,
                fx.landlord,
                "schedule",
                Some(when),
                Some("Bring ID proof".into()),
            )
            .await
            .expect("schedule");

        assert_eq!(updated.status, VisitStatus::Scheduled);
        assert_eq!(updated.progress, 100);
        assert_eq!(updated.scheduled_date, Some(when));
        assert_eq!(updated.notes.as_deref(), Some("Bring ID proof"));
    }

    #[tokio::test]
    async fn schedule_without_date_is_bad_request() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;

        let err = fx
            .service
            .transition_visit_request(request.id, fx.landlord, "schedule", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn bogus_action_is_bad_request_and_leaves_request_unchanged() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;

        let err = fx
            .service
            .transition_visit_request(request.id, fx.landlord, "bogus", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let stored = fx.store.get_visit_request(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, VisitStatus::Pending);
        assert_eq!(stored.progress, 0);
        assert_eq!(stored.updated_at, request.updated_at);
    }

    #[tokio::test]
    async fn foreign_landlord_is_forbidden() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;

        let err = fx
            .service
            .transition_visit_request(request.id, Uuid::new_v4(), "accept", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let stored = fx.store.get_visit_request(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, VisitStatus::Pending);
    }

    #[tokio::test]
    async fn missing_request_is_not_found() {
        let fx = fixture().await;
        let err = fx
            .service
            .transition_visit_request(Uuid::new_v4(), fx.landlord, "accept", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn repeat_transition_is_permitted_and_overwrites() {
        let fx = fixture().await;
        let request = seed_request(&fx).await;

        fx.service
            .transition_visit_request(request.id, fx.landlord, "accept", None, None)
            .await
            .expect("accept");
        let updated = fx
            .service
            .transition_visit_request(request.id, fx.landlord, "reject", None, None)
            .await
            .expect("re-transition");

        assert_eq!(updated.status, VisitStatus::LandlordRejected);
        assert_eq!(updated.progress, 100);
    }

    #[tokio::test]
    async fn listing_pages_newest_first_with_resolved_references() {
        let fx = fixture().await;
        let mut ids = Vec::new();
        for i in 0..15 {
            let mut request = VisitRequest::new(fx.tenant, fx.landlord, fx.property);
            request.created_at = Utc::now() - chrono::Duration::minutes(15 - i);
            fx.store.insert_visit_request(&request).await.unwrap();
            ids.push(request.id);
        }

        let first = fx
            .service
            .list_visit_requests(fx.landlord, None, Some(1), Some(10))
            .await
            .expect("page 1");
        assert_eq!(first.visit_requests.len(), 10);
        assert_eq!(first.pagination.current, 1);
        assert_eq!(first.pagination.total, 2);
        assert!(first.pagination.has_next);
        // newest request (largest created_at) comes first
        assert_eq!(first.visit_requests[0].id, *ids.last().unwrap());

        let view = &first.visit_requests[0];
        assert_eq!(view.tenant.full_name, "Neha Gupta");
        assert_eq!(view.tenant.email_id, "neha@example.com");
        let property = view.property.as_ref().expect("resolved property");
        assert_eq!(property.title, "2BHK near station");

        let second = fx
            .service
            .list_visit_requests(fx.landlord, None, Some(2), Some(10))
            .await
            .expect("page 2");
        assert_eq!(second.visit_requests.len(), 5);
        assert_eq!(second.pagination.current, 2);
        assert!(!second.pagination.has_next);
    }

    #[tokio::test]
    async fn dangling_tenant_is_excluded_from_page_and_pagination() {
        let fx = fixture().await;
        seed_request(&fx).await;

        // request whose tenant profile was never created
        let orphan = VisitRequest::new(Uuid::new_v4(), fx.landlord, fx.property);
        fx.store.insert_visit_request(&orphan).await.unwrap();

        let page = fx
            .service
            .list_visit_requests(fx.landlord, None, None, None)
            .await
            .expect("list");

        assert_eq!(page.visit_requests.len(), 1);
        assert_eq!(page.pagination.total, 1);
        assert!(!page.pagination.has_next);
        assert_eq!(
            fx.store.count_visit_requests(fx.landlord, None).await.unwrap(),
            page.visit_requests.len() as i64
        );
    }

    #[tokio::test]
    async fn listing_filters_by_status_and_ownership() {
        let fx = fixture().await;
        let mine = seed_request(&fx).await;
        seed_request(&fx).await;

        // a request owned by some other landlord never shows up
        let other = VisitRequest::new(fx.tenant, Uuid::new_v4(), fx.property);
        fx.store.insert_visit_request(&other).await.unwrap();

        fx.service
            .transition_visit_request(mine.id, fx.landlord, "accept", None, None)
            .await
            .unwrap();

        let approved = fx
            .service
            .list_visit_requests(fx.landlord, Some("landlord_approved"), None, None)
            .await
            .expect("filtered");
        assert_eq!(approved.visit_requests.len(), 1);
        assert_eq!(approved.visit_requests[0].id, mine.id);

        let all = fx
            .service
            .list_visit_requests(fx.landlord, None, None, None)
            .await
            .expect("all");
        assert_eq!(all.visit_requests.len(), 2);

        let err = fx
            .service
            .list_visit_requests(fx.landlord, Some("wat"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
