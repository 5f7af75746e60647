use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{VisitRequest, VisitRequestPage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VisitListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/owner/visit-requests?status=&page=&limit=
pub async fn list_visit_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<VisitListQuery>,
) -> ApiResult<VisitRequestPage> {
    let page = state
        .visits
        .list_visit_requests(user.id, query.status.as_deref(), query.page, query.limit)
        .await?;
    Ok(ApiResponse::success(page))
}

#[derive(Debug, Deserialize)]
pub struct VisitActionRequest {
    pub action: String,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// PATCH /api/owner/visit-requests/:request_id
pub async fn update_visit_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<VisitActionRequest>,
) -> ApiResult<VisitRequest> {
    let updated = state
        .visits
        .transition_visit_request(request_id, user.id, &body.action, body.date, body.note)
        .await?;

    let message = match updated.status.as_str() {
        "landlord_approved" => "Visit request accepted successfully",
        "landlord_rejected" => "Visit request rejected successfully",
        _ => "Visit request scheduled successfully",
    };
    Ok(ApiResponse::with_message(message, updated))
}
