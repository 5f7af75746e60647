use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a visit request. Created in `Pending` by the
/// tenant-side flow; the landlord moves it through the remaining states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Pending,
    LandlordApproved,
    LandlordRejected,
    Scheduled,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Pending => "pending",
            VisitStatus::LandlordApproved => "landlord_approved",
            VisitStatus::LandlordRejected => "landlord_rejected",
            VisitStatus::Scheduled => "scheduled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VisitStatus::Pending),
            "landlord_approved" => Some(VisitStatus::LandlordApproved),
            "landlord_rejected" => Some(VisitStatus::LandlordRejected),
            "scheduled" => Some(VisitStatus::Scheduled),
            _ => None,
        }
    }
}

/// Landlord action on a visit request, as received in the PATCH body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    Accept,
    Reject,
    Schedule,
}

impl VisitAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(VisitAction::Accept),
            "reject" => Some(VisitAction::Reject),
            "schedule" => Some(VisitAction::Schedule),
            _ => None,
        }
    }
}

/// Record linking a tenant, a landlord and a property, tracking the
/// approval/scheduling status of a viewing. `progress` is an integer proxy
/// (0-100) for how far the request has advanced toward resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    pub id: Uuid,
    pub tenant: Uuid,
    pub landlord: Uuid,
    pub property: Uuid,
    pub status: VisitStatus,
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VisitRequest {
    /// New request in the initial state, as the tenant-side flow creates it.
    pub fn new(tenant: Uuid, landlord: Uuid, property: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant,
            landlord,
            property,
            status: VisitStatus::Pending,
            progress: 0,
            scheduled_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Restricted tenant fields exposed on a visit-request listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email_id: String,
    pub phonenumber: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

/// Restricted property fields exposed on a visit-request listing. Properties
/// live in an external collection; the store resolves the reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub images: Vec<String>,
}

/// A visit request with its tenant and property references resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequestView {
    pub id: Uuid,
    pub tenant: TenantSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertySummary>,
    pub status: VisitStatus,
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pagination block reported alongside a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: i64,
    pub total: i64,
    pub has_next: bool,
}

impl Pagination {
    pub fn build(page: i64, limit: i64, total_items: i64) -> Self {
        Self {
            current: page,
            total: (total_items + limit - 1) / limit.max(1),
            has_next: page * limit < total_items,
        }
    }
}

/// One page of a landlord's visit requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequestPage {
    pub visit_requests: Vec<VisitRequestView>,
    pub pagination: Pagination,
}
