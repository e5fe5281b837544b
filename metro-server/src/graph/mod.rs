//! Station graph and shortest-path search.
//!
//! The graph is built once from provider data and then only read. Searches
//! borrow it immutably and keep all of their working state locally, so any
//! number of searches can share one graph.

mod dijkstra;
mod model;


pub use dijkstra::{Route, RouteError, shortest_path};
pub use model::{
    Connection, Edge, GraphBuilder, GraphDocument, GraphError, Station, StationGraph, StationId,
    StationRecord,
};
