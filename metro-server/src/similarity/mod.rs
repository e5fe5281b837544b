//! Trip similarity by longest shared station run.
//!
//! A query trip's station sequence is compiled into a suffix automaton once;
//! each candidate trip is then scored by walking the automaton, in time
//! proportional to the candidate's length. The score is the length of the
//! longest contiguous run of stations the candidate shares with the query.
//! Shared stations that are not adjacent in both trips, or appear in the
//! opposite order, do not extend a run.

mod automaton;
mod rank;
mod vocab;

pub use automaton::{StateId, SuffixAutomaton};
pub use rank::{
    QueryMatcher, Scored, SimilarityError, StationSequence, rank_by_similarity, rank_trips,
};
pub use vocab::{TokenId, Vocabulary};
