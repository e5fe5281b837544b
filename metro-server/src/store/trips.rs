//! Trip snapshots.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use super::error::StoreError;
use crate::domain::{Trip, TripId};

/// Trips files are either a bare array or the `{"data": [...]}` envelope
/// the trips API responds with.
#[derive(Deserialize)]
#[serde(untagged)]
enum TripsFile {
    Bare(Vec<Trip>),
    Envelope { data: Vec<Trip> },
}

/// Parse a trips file. `path` is only used to label errors.
///
/// Trip ids must be unique, otherwise "the query trip" would be ambiguous.
pub fn parse_trips(path: &Path, json: &str) -> Result<Vec<Trip>, StoreError> {
    let file: TripsFile = serde_json::from_str(json).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let trips = match file {
        TripsFile::Bare(trips) | TripsFile::Envelope { data: trips } => trips,
    };

    let mut seen = HashSet::with_capacity(trips.len());
    for trip in &trips {
        if !seen.insert(&trip.id) {
            return Err(StoreError::DuplicateTrip {
                path: path.to_path_buf(),
                id: trip.id.to_string(),
            });
        }
    }

    Ok(trips)
}

/// A consistent view of all trips at one point in time.
///
/// `generation` increases every time the store's contents are replaced, so
/// anything derived from a snapshot can be keyed by it.
#[derive(Debug, Clone)]
pub struct TripSnapshot {
    pub generation: u64,
    pub trips: Arc<Vec<Trip>>,
}

struct Inner {
    generation: u64,
    trips: Arc<Vec<Trip>>,
}

/// Thread-safe trip collection with support for background refresh.
///
/// Readers take cheap snapshots; a refresh swaps the whole collection at
/// once, so a reader never sees a half-loaded file.
#[derive(Clone)]
pub struct TripStore {
    inner: Arc<RwLock<Inner>>,
    path: Option<PathBuf>,
}

impl TripStore {
    /// Load trips from a JSON file. The store refreshes from the same file.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let trips = read_trips(&path).await?;
        info!(path = %path.display(), trips = trips.len(), "loaded trips");

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                generation: 0,
                trips: Arc::new(trips),
            })),
            path: Some(path),
        })
    }

    /// Create a store over trips already in memory (no backing file).
    pub fn from_trips(trips: Vec<Trip>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                generation: 0,
                trips: Arc::new(trips),
            })),
            path: None,
        }
    }

    pub async fn snapshot(&self) -> TripSnapshot {
        let guard = self.inner.read().await;
        TripSnapshot {
            generation: guard.generation,
            trips: guard.trips.clone(),
        }
    }

    /// Look up one trip by id.
    pub async fn get(&self, id: &TripId) -> Option<Trip> {
        let guard = self.inner.read().await;
        guard.trips.iter().find(|t| &t.id == id).cloned()
    }

    /// Trips that start, end, or pass through `station`.
    pub async fn visiting(&self, station: &str) -> Vec<Trip> {
        let guard = self.inner.read().await;
        guard
            .trips
            .iter()
            .filter(|t| t.visits(station))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.trips.len()
    }

    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.trips.is_empty()
    }

    /// Replace every trip, starting a new generation. Returns the new count.
    pub async fn replace(&self, trips: Vec<Trip>) -> usize {
        let count = trips.len();
        let mut guard = self.inner.write().await;
        guard.generation += 1;
        guard.trips = Arc::new(trips);
        count
    }

    /// Reload the backing file.
    ///
    /// On success, replaces the current trips. On failure, the existing
    /// trips are kept and the error is returned. A store with no backing
    /// file is left alone.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let Some(path) = &self.path else {
            return Ok(self.len().await);
        };
        let trips = read_trips(path).await?;
        Ok(self.replace(trips).await)
    }
}

async fn read_trips(path: &Path) -> Result<Vec<Trip>, StoreError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_trips(path, &json)
}
