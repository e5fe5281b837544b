//! Shortest route between two stations.
//!
//! Classic Dijkstra over a binary heap with lazy deletion: a station may sit
//! in the heap several times with decreasing distances, and every entry after
//! the first one popped is skipped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::model::{StationGraph, StationId};
use crate::domain::StationName;

/// Why no route could be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The named station is not in the graph.
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// Both stations exist but no sequence of edges joins them.
    #[error("no route from {from} to {to}")]
    Unreachable { from: StationName, to: StationName },
}

/// A minimum-weight route, start and end inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub stations: Vec<StationName>,
    /// Sum of edge weights along the route.
    pub total: f64,
}

impl Route {
    /// Number of edges travelled.
    pub fn hops(&self) -> usize {
        self.stations.len().saturating_sub(1)
    }

    pub fn start(&self) -> &StationName {
        &self.stations[0]
    }

    pub fn end(&self) -> &StationName {
        &self.stations[self.stations.len() - 1]
    }
}

/// Heap entry. `BinaryHeap` is a max-heap, so the ordering is reversed to
/// pop the smallest distance first; among equal distances the entry pushed
/// earliest wins.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    seq: u64,
    station: StationId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Find the minimum-weight route from `from` to `to`.
///
/// Names are trimmed before lookup. A route from a station to itself is the
/// single-station route with total 0.
///
/// Runs in O((V + E) log V) and stops as soon as `to` is settled. Repeated
/// calls on the same graph return the same route.
pub fn shortest_path(graph: &StationGraph, from: &str, to: &str) -> Result<Route, RouteError> {
    let source = graph
        .id_of(from)
        .ok_or_else(|| RouteError::UnknownStation(from.trim().to_string()))?;
    let target = graph
        .id_of(to)
        .ok_or_else(|| RouteError::UnknownStation(to.trim().to_string()))?;

    let n = graph.len();
    let mut distance = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<StationId>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut settled_count = 0usize;

    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    distance[source.0] = 0.0;
    heap.push(Candidate {
        distance: 0.0,
        seq,
        station: source,
    });

    while let Some(Candidate {
        distance: current_distance,
        station: current,
        ..
    }) = heap.pop()
    {
        if settled[current.0] {
            continue;
        }
        settled[current.0] = true;
        settled_count += 1;

        if current == target {
            break;
        }

        for edge in graph.station(current).edges() {
            let next = edge.to;
            if settled[next.0] {
                continue;
            }
            let alt = current_distance + edge.weight.get();
            if alt < distance[next.0] {
                distance[next.0] = alt;
                previous[next.0] = Some(current);
                seq += 1;
                heap.push(Candidate {
                    distance: alt,
                    seq,
                    station: next,
                });
                trace!(
                    station = %graph.station(next).name(),
                    distance = alt,
                    "relaxed"
                );
            }
        }
    }

    if !settled[target.0] {
        debug!(
            from = %graph.station(source).name(),
            to = %graph.station(target).name(),
            settled = settled_count,
            "no route"
        );
        return Err(RouteError::Unreachable {
            from: graph.station(source).name().clone(),
            to: graph.station(target).name().clone(),
        });
    }

    let mut ids = vec![target];
    let mut cursor = target;
    while let Some(prev) = previous[cursor.0] {
        ids.push(prev);
        cursor = prev;
    }
    ids.reverse();

    let stations: Vec<StationName> = ids
        .into_iter()
        .map(|id| graph.station(id).name().clone())
        .collect();

    debug!(
        from = %graph.station(source).name(),
        to = %graph.station(target).name(),
        hops = stations.len() - 1,
        total = distance[target.0],
        settled = settled_count,
        "route found"
    );

    Ok(Route {
        stations,
        total: distance[target.0],
    })
}
