use std::sync::Arc;

use crate::services::{ProfileService, VisitRequestService};
use crate::storage::FileStorage;
use crate::store::Store;

/// Shared application state: the store and file-storage capabilities plus
/// the services built over them. Injected at router construction, never a
/// process-wide singleton, so tests can run the whole surface against the
/// in-memory backend.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub profiles: ProfileService,
    pub visits: VisitRequestService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, files: Arc<dyn FileStorage>) -> Self {
        Self {
            profiles: ProfileService::new(store.clone(), files),
            visits: VisitRequestService::new(store.clone()),
            store,
        }
    }
}
