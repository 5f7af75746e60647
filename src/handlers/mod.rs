pub mod auth;
pub mod owner;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Rentbase API",
            "version": version,
            "description": "Property-rental marketplace backend (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/:usertype/register, /auth/:usertype/login, /auth/logout (public)",
                "profile": "/api/owner/profile[/avatar|/photo] (owner)",
                "documents": "/api/owner/documents[/:id], /api/owner/verify (owner)",
                "visits": "/api/owner/visit-requests[/:requestId] (owner)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
