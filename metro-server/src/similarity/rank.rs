//! Ranking trips by shared station runs.

use std::cmp::Reverse;

use serde::Serialize;
use tracing::debug;

use super::automaton::SuffixAutomaton;
use super::vocab::Vocabulary;
use crate::domain::{Trip, TripId};

/// Error from trip ranking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimilarityError {
    /// The query trip is not part of the batch.
    #[error("trip {0} not found")]
    QueryNotFound(TripId),
}

/// Anything that carries an ordered list of station tokens.
pub trait StationSequence {
    fn station_tokens(&self) -> &[String];
}

impl StationSequence for Trip {
    fn station_tokens(&self) -> &[String] {
        &self.station_list
    }
}

impl StationSequence for Vec<String> {
    fn station_tokens(&self) -> &[String] {
        self
    }
}

/// A batch item annotated with its similarity score.
///
/// Serializes as the item's own fields plus `lcsLen`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "lcsLen")]
    pub score: usize,
}

/// A query sequence prepared for scoring: its vocabulary and automaton.
///
/// Build one per query; scoring a candidate then costs time proportional to
/// the candidate's length.
///
/// # Examples
///
/// ```
/// use metro_server::similarity::QueryMatcher;
///
/// let matcher = QueryMatcher::new(&["S1", "S2", "S3", "S4"]);
/// assert_eq!(matcher.score(&["S9", "S1", "S2"]), 2);
/// assert_eq!(matcher.score(&["S4", "S3", "S2", "S1"]), 1);
/// ```
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    vocabulary: Vocabulary,
    automaton: SuffixAutomaton,
}

impl QueryMatcher {
    pub fn new<S: AsRef<str>>(query: &[S]) -> Self {
        let vocabulary = Vocabulary::from_tokens(query);
        let symbols = query.iter().filter_map(|t| vocabulary.encode(t.as_ref()));
        let automaton = SuffixAutomaton::from_symbols(symbols);
        Self {
            vocabulary,
            automaton,
        }
    }

    /// Length of the longest contiguous run of `candidate` that also occurs
    /// contiguously in the query.
    pub fn score<S: AsRef<str>>(&self, candidate: &[S]) -> usize {
        self.automaton.longest_common_run(candidate, &self.vocabulary)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn automaton(&self) -> &SuffixAutomaton {
        &self.automaton
    }
}

/// Score every item of `batch` against `query` and sort best-first.
///
/// Items with equal scores keep their original relative order.
pub fn rank_by_similarity<T, S>(query: &[S], batch: Vec<T>) -> Vec<Scored<T>>
where
    T: StationSequence,
    S: AsRef<str>,
{
    let matcher = QueryMatcher::new(query);

    let mut scored: Vec<Scored<T>> = batch
        .into_iter()
        .map(|item| {
            let score = matcher.score(item.station_tokens());
            Scored { item, score }
        })
        .collect();

    // `sort_by_key` is stable, which the tie order relies on.
    scored.sort_by_key(|s| Reverse(s.score));

    debug!(
        query_len = query.len(),
        states = matcher.automaton().state_count(),
        candidates = scored.len(),
        best = scored.first().map(|s| s.score).unwrap_or(0),
        "ranked by similarity"
    );

    scored
}

/// Rank a batch of trips by similarity to the trip with id `query_id`.
///
/// The query trip must be in the batch; it is scored along with the rest
/// and normally comes first.
pub fn rank_trips(
    trips: Vec<Trip>,
    query_id: &TripId,
) -> Result<Vec<Scored<Trip>>, SimilarityError> {
    let query = trips
        .iter()
        .find(|t| &t.id == query_id)
        .map(|t| t.station_list.clone())
        .ok_or_else(|| SimilarityError::QueryNotFound(query_id.clone()))?;

    Ok(rank_by_similarity(&query, trips))
}
