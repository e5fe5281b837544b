//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, RankingCache};
use crate::graph::StationGraph;
use crate::store::TripStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station graph; immutable for the life of the process
    pub graph: Arc<StationGraph>,

    /// Recorded trips, refreshed in the background
    pub trips: TripStore,

    /// Cached similarity rankings
    pub rankings: Arc<RankingCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: StationGraph, trips: TripStore, cache_config: &CacheConfig) -> Self {
        Self {
            graph: Arc::new(graph),
            trips,
            rankings: Arc::new(RankingCache::new(cache_config)),
        }
    }
}
