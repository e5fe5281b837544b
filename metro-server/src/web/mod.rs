//! Web layer for the metro route planner.
//!
//! Provides JSON endpoints for the station network, shortest paths and
//! similarity-ranked trips.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
