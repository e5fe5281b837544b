//! Edge weight type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for a weight that cannot label a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid edge weight {value}: {reason}")]
pub struct InvalidWeight {
    value: f64,
    reason: &'static str,
}

/// A strictly positive, finite edge weight (track distance in km).
///
/// Zero-length edges would let Dijkstra settle stations in an order that
/// depends on tie-breaking alone, and negative edges break it outright, so
/// neither is representable.
///
/// # Examples
///
/// ```
/// use metro_server::domain::Weight;
///
/// assert_eq!(Weight::new(1.25).unwrap().get(), 1.25);
/// assert!(Weight::new(0.0).is_err());
/// assert!(Weight::new(-3.0).is_err());
/// assert!(Weight::new(f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    /// Validate a raw weight.
    pub fn new(value: f64) -> Result<Self, InvalidWeight> {
        if !value.is_finite() {
            return Err(InvalidWeight {
                value,
                reason: "must be finite",
            });
        }
        if value <= 0.0 {
            return Err(InvalidWeight {
                value,
                reason: "must be positive",
            });
        }
        Ok(Weight(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Weight {
    type Error = InvalidWeight;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Weight::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(w: Weight) -> Self {
        w.0
    }
}

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weight({})", self.0)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
