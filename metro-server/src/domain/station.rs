//! Station identity and location types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name {input:?}: {reason}")]
pub struct InvalidStationName {
    input: String,
    reason: &'static str,
}

/// A station name, the key of the station graph.
///
/// Names are trimmed of surrounding whitespace on construction and must not
/// be empty afterwards. Comparison is case-sensitive, so `"Rajiv Chowk"` and
/// `"rajiv chowk"` are different stations.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationName;
///
/// let name = StationName::parse("  Kashmere Gate ").unwrap();
/// assert_eq!(name.as_str(), "Kashmere Gate");
///
/// // Blank names are rejected
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationName(String);

impl StationName {
    /// Parse a station name, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStationName {
                input: s.to_string(),
                reason: "must not be blank",
            });
        }
        Ok(StationName(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationName {
    type Error = InvalidStationName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        // Avoid reallocating when the input is already clean
        if !s.is_empty() && s.trim().len() == s.len() {
            return Ok(StationName(s));
        }
        StationName::parse(&s)
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl AsRef<str> for StationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position of a station (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
