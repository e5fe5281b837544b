//! Loading graph and trip snapshots.
//!
//! This is the boundary with whatever owns the data. Graphs and trips are
//! read from JSON files into immutable snapshots that the engines borrow;
//! nothing in here runs an algorithm.

mod error;
mod graph_file;
mod trips;

pub use error::StoreError;
pub use graph_file::{load_graph, parse_graph};
pub use trips::{TripSnapshot, TripStore, parse_trips};
