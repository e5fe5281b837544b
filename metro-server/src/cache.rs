//! Caching layer for similarity rankings.
//!
//! Ranking a batch is linear in the total number of recorded stations, which
//! is cheap but not free when the same trip page is requested repeatedly.
//! Results are cached per (trip snapshot generation, query trip id): a new
//! generation means new keys, so a refresh can never serve a ranking of
//! trips that are no longer in the store.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Trip, TripId};
use crate::similarity::Scored;

/// Cache key: (trip snapshot generation, query trip id).
type RankingKey = (u64, TripId);

/// A cached ranking, shared between requests.
pub type RankingEntry = Arc<Vec<Scored<Trip>>>;

/// Configuration for the ranking cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached rankings.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache of ranked trip lists.
pub struct RankingCache {
    rankings: MokaCache<RankingKey, RankingEntry>,
}

impl RankingCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let rankings = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { rankings }
    }

    /// Get a cached ranking for `query` computed from snapshot `generation`.
    pub async fn get(&self, generation: u64, query: &TripId) -> Option<RankingEntry> {
        self.rankings.get(&(generation, query.clone())).await
    }

    /// Store a ranking.
    pub async fn insert(&self, generation: u64, query: TripId, entry: RankingEntry) {
        self.rankings.insert((generation, query), entry).await;
    }

    /// Drop every cached ranking, e.g. after the trip snapshot changed.
    pub fn invalidate_all(&self) {
        self.rankings.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn scored(id: &str, score: usize) -> Scored<Trip> {
        Scored {
            item: Trip {
                id: TripId::new(id),
                user_id: "u".to_string(),
                start_time: Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
                station_list: vec!["A".to_string()],
                length: None,
                start_station: "A".to_string(),
                end_station: "A".to_string(),
            },
            score,
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn insert_then_get() {
        let cache = RankingCache::new(&CacheConfig::default());
        let query = TripId::new("q");
        let entry = Arc::new(vec![scored("q", 3), scored("t1", 1)]);

        assert!(cache.get(0, &query).await.is_none());
        cache.insert(0, query.clone(), entry.clone()).await;

        let hit = cache.get(0, &query).await.unwrap();
        assert_eq!(hit.len(), 2);
        assert_eq!(hit[0].score, 3);
    }

    #[tokio::test]
    async fn generations_do_not_share_entries() {
        let cache = RankingCache::new(&CacheConfig::default());
        let query = TripId::new("q");
        cache
            .insert(0, query.clone(), Arc::new(vec![scored("q", 1)]))
            .await;

        assert!(cache.get(1, &query).await.is_none());
        assert!(cache.get(0, &TripId::new("other")).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_all_clears() {
        let cache = RankingCache::new(&CacheConfig::default());
        let query = TripId::new("q");
        cache
            .insert(0, query.clone(), Arc::new(vec![scored("q", 1)]))
            .await;

        cache.invalidate_all();
        assert!(cache.get(0, &query).await.is_none());
    }
}
