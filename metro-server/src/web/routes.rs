//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{debug, error, warn};

use crate::domain::{Trip, TripId};
use crate::graph::{RouteError, shortest_path};
use crate::similarity::{SimilarityError, rank_trips};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/edges", get(list_edges))
        .route("/api/path", get(find_path))
        .route("/api/trips", get(list_trips))
        .route("/api/trips/sorted", get(sorted_trips))
        .route("/api/trips/:id", get(get_trip))
        .route("/api/trips/station/:station", get(trips_visiting))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations, in name order.
async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let stations = state
        .graph
        .stations()
        .map(StationResult::from_station)
        .collect();
    Json(StationsResponse { stations })
}

/// Every connection once, for drawing the network.
async fn list_edges(State(state): State<AppState>) -> Json<EdgesResponse> {
    let edges = state
        .graph
        .connections()
        .iter()
        .map(EdgeResult::from_connection)
        .collect();
    Json(EdgesResponse { edges })
}

/// Shortest path between two stations.
async fn find_path(
    State(state): State<AppState>,
    Query(req): Query<PathRequest>,
) -> Result<Json<PathResponse>, AppError> {
    match shortest_path(&state.graph, &req.from, &req.to) {
        Ok(route) => Ok(Json(PathResponse::from_route(&state.graph, &route))),
        Err(RouteError::Unreachable { from, to }) => {
            Ok(Json(PathResponse::unreachable(from.as_str(), to.as_str())))
        }
        Err(e) => Err(e.into()),
    }
}

/// The current trip snapshot.
async fn list_trips(State(state): State<AppState>) -> Json<TripsResponse> {
    let snapshot = state.trips.snapshot().await;
    Json(TripsResponse {
        trips: snapshot.trips.as_ref().clone(),
    })
}

/// One trip by id.
async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    let id = TripId::new(id.trim());
    state
        .trips
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("trip {id} not found"),
        })
}

/// Trips that start, end or pass through a station.
async fn trips_visiting(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Result<Json<TripsResponse>, AppError> {
    if state.graph.get(&station).is_none() {
        return Err(AppError::NotFound {
            message: format!("unknown station: {station}"),
        });
    }
    let trips = state.trips.visiting(&station).await;
    Ok(Json(TripsResponse { trips }))
}

/// All trips ranked by similarity to the trip named by `id`.
async fn sorted_trips(
    State(state): State<AppState>,
    Query(req): Query<SortedTripsRequest>,
) -> Result<Json<SortedTripsResponse>, AppError> {
    let id = req
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "missing trip id".to_string(),
        })?;
    let query_id = TripId::new(id);

    let snapshot = state.trips.snapshot().await;
    if let Some(hit) = state.rankings.get(snapshot.generation, &query_id).await {
        debug!(trip = %query_id, generation = snapshot.generation, "ranking cache hit");
        return Ok(Json(SortedTripsResponse {
            query_id,
            trips: hit.as_ref().clone(),
        }));
    }

    let trips = snapshot.trips.as_ref().clone();
    let ranking_id = query_id.clone();
    let ranked = tokio::task::spawn_blocking(move || rank_trips(trips, &ranking_id))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("ranking task failed: {e}"),
        })??;

    let ranked = Arc::new(ranked);
    state
        .rankings
        .insert(snapshot.generation, query_id.clone(), ranked.clone())
        .await;

    Ok(Json(SortedTripsResponse {
        query_id,
        trips: ranked.as_ref().clone(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<SimilarityError> for AppError {
    fn from(e: SimilarityError) -> Self {
        match e {
            SimilarityError::QueryNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
