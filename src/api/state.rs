use std::sync::Arc;

use crate::services::{DiscoveryService, DiscoverySettings, MovieApi, RequestTracker};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryService>,
    pub tracker: Arc<RequestTracker>,
}

impl AppState {
    /// Builds state around a movie data provider
    pub fn new(api: Arc<dyn MovieApi>, settings: DiscoverySettings) -> Self {
        Self {
            discovery: Arc::new(DiscoveryService::new(api, settings)),
            tracker: Arc::new(RequestTracker::new()),
        }
    }

    pub fn min_query_len(&self) -> usize {
        self.discovery.settings().min_query_len
    }
}
