use std::sync::Arc;

use crate::auth::Authenticator;
use crate::cache::FeedCache;
use crate::db::Store;
use crate::services::{FeedService, VideoSource};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub source: Arc<dyn VideoSource>,
    pub cache: Arc<FeedCache>,
    pub feed: Arc<FeedService>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Wires the feed service from the injected collaborators
    pub fn new(
        store: Arc<dyn Store>,
        source: Arc<dyn VideoSource>,
        cache: Arc<FeedCache>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let feed = Arc::new(FeedService::new(
            Arc::clone(&store),
            Arc::clone(&source),
            Arc::clone(&cache),
        ));

        Self {
            store,
            source,
            cache,
            feed,
            authenticator,
        }
    }
}
