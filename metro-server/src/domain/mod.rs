//! Domain types for the metro route and trip-similarity server.
//!
//! This module contains the validated value types shared by the graph and
//! similarity engines. Types enforce their invariants at construction time,
//! so code that receives them can trust their validity.

mod station;
mod trip;
mod weight;

pub use station::{Coordinates, InvalidStationName, StationName};
pub use trip::{Trip, TripId};
pub use weight::{InvalidWeight, Weight};
