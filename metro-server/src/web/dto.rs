//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Trip, TripId};
use crate::graph::{Connection, Route, Station, StationGraph};
use crate::similarity::Scored;

/// A station with its location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationResult {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub line: String,
}

impl StationResult {
    pub fn from_station(station: &Station) -> Self {
        let c = station.coordinates();
        Self {
            name: station.name().to_string(),
            lat: c.lat,
            lng: c.lng,
            line: station.line().to_string(),
        }
    }
}

/// Response listing every station.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

/// One drawable connection between two stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeResult {
    pub from: String,
    pub to: String,
    /// Line of the station the edge is reported from
    pub line: String,
    pub distance: f64,
    /// `[[lat, lng], [lat, lng]]`, ready for a polyline
    pub segment: [[f64; 2]; 2],
}

impl EdgeResult {
    pub fn from_connection(conn: &Connection<'_>) -> Self {
        let a = conn.a.coordinates();
        let b = conn.b.coordinates();
        Self {
            from: conn.a.name().to_string(),
            to: conn.b.name().to_string(),
            line: conn.a.line().to_string(),
            distance: conn.weight.get(),
            segment: [[a.lat, a.lng], [b.lat, b.lng]],
        }
    }
}

/// Response listing every connection once.
#[derive(Debug, Serialize)]
pub struct EdgesResponse {
    pub edges: Vec<EdgeResult>,
}

/// Request for a shortest path.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    /// Start station name
    pub from: String,

    /// End station name
    pub to: String,
}

/// Shortest-path result.
///
/// When no path exists `reachable` is false and `stations` is `null`, which
/// keeps "no path" apart from a start-equals-end path of one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResponse {
    pub from: String,
    pub to: String,
    pub reachable: bool,
    pub stations: Option<Vec<StationResult>>,
    pub total_distance: Option<f64>,
}

impl PathResponse {
    pub fn from_route(graph: &StationGraph, route: &Route) -> Self {
        let stations = route
            .stations
            .iter()
            .filter_map(|name| graph.get(name.as_str()))
            .map(StationResult::from_station)
            .collect();

        Self {
            from: route.start().to_string(),
            to: route.end().to_string(),
            reachable: true,
            stations: Some(stations),
            total_distance: Some(route.total),
        }
    }

    pub fn unreachable(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            reachable: false,
            stations: None,
            total_distance: None,
        }
    }
}

/// Request for trips ranked by similarity to one of them.
#[derive(Debug, Deserialize)]
pub struct SortedTripsRequest {
    /// Id of the query trip
    pub id: Option<String>,
}

/// Trips ranked best-first, each with its `lcsLen` score.
#[derive(Debug, Serialize)]
pub struct SortedTripsResponse {
    pub query_id: TripId,
    pub trips: Vec<Scored<Trip>>,
}

/// A plain list of trips.
#[derive(Debug, Serialize)]
pub struct TripsResponse {
    pub trips: Vec<Trip>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
