//! Metro route planner server.
//!
//! Answers two questions about a metro network: "what is the shortest way
//! from here to there?" and "which recorded trips look most like this one?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod graph;
pub mod similarity;
pub mod store;
pub mod web;
