//! Recorded trips.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque trip identifier, as assigned by the trip store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        TripId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trip a user logged: the stations they passed through, in order.
///
/// `station_list` holds raw station tokens as recorded. They are not
/// validated against the current graph; a station that has since been
/// renamed or removed is simply a token nothing else matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub station_list: Vec<String>,
    /// Track length of the trip as recorded by the client (km).
    #[serde(default)]
    pub length: Option<f64>,
    pub start_station: String,
    pub end_station: String,
}

impl Trip {
    /// Returns true if the trip starts, ends, or passes through `station`.
    pub fn visits(&self, station: &str) -> bool {
        let station = station.trim();
        self.start_station.trim() == station
            || self.end_station.trim() == station
            || self.station_list.iter().any(|s| s.trim() == station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "trip-1",
            "userId": "user-7",
            "startTime": "2024-03-15T08:30:00Z",
            "stationList": ["Dwarka", "Janakpuri West", "Rajouri Garden"],
            "length": 9.4,
            "startStation": "Dwarka",
            "endStation": "Rajouri Garden"
        }"#
    }

    #[test]
    fn deserialize_camel_case() {
        let trip: Trip = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(trip.id, TripId::new("trip-1"));
        assert_eq!(trip.user_id, "user-7");
        assert_eq!(trip.station_list.len(), 3);
        assert_eq!(trip.length, Some(9.4));
        assert_eq!(trip.start_station, "Dwarka");
    }

    #[test]
    fn length_is_optional() {
        let json = r#"{
            "id": "t",
            "userId": "u",
            "startTime": "2024-03-15T08:30:00Z",
            "stationList": [],
            "startStation": "A",
            "endStation": "B"
        }"#;
        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.length, None);
    }

    #[test]
    fn serialize_round_trips_field_names() {
        let trip: Trip = serde_json::from_str(sample_json()).unwrap();
        let value = serde_json::to_value(&trip).unwrap();
        assert_eq!(value["userId"], "user-7");
        assert_eq!(value["stationList"][1], "Janakpuri West");
        assert_eq!(value["id"], "trip-1");
    }

    #[test]
    fn visits_checks_endpoints_and_list() {
        let trip: Trip = serde_json::from_str(sample_json()).unwrap();
        assert!(trip.visits("Dwarka"));
        assert!(trip.visits(" Janakpuri West "));
        assert!(trip.visits("Rajouri Garden"));
        assert!(!trip.visits("Kashmere Gate"));
    }
}
