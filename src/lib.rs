pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

/// Assemble the full router over the given state. Tests drive this router
/// in-process against the memory store.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        // Owner surface (bearer auth + owner guard)
        .merge(owner_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/:usertype/register", post(auth::register))
        .route("/auth/:usertype/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

fn owner_routes() -> Router<AppState> {
    use axum::middleware::from_fn;
    use handlers::owner::{documents, profile, visits};

    Router::new()
        // Profile
        .route(
            "/api/owner/profile",
            get(profile::get_profile)
                .post(profile::create_profile)
                .put(profile::update_profile),
        )
        .route("/api/owner/profile/avatar", post(profile::upload_avatar))
        .route("/api/owner/profile/photo", post(profile::upload_photo))
        // Documents and KYC
        .route(
            "/api/owner/documents",
            post(documents::upload_document).get(documents::list_documents),
        )
        .route("/api/owner/documents/:id", delete(documents::delete_document))
        .route("/api/owner/verify", patch(profile::verify_kyc))
        // Visit requests
        .route("/api/owner/visit-requests", get(visits::list_visit_requests))
        .route(
            "/api/owner/visit-requests/:request_id",
            patch(visits::update_visit_request),
        )
        // Guards run outermost-first: bearer_auth, then the owner check
        .route_layer(from_fn(middleware::require_owner))
        .route_layer(from_fn(middleware::bearer_auth))
}
