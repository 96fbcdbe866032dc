// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Matching Algorithm Engine
//!
//! This module provides the native maximum-weight general matching
//! implementation for the blossom workspace.
//!
//! # Architecture
//!
//! - **MatchingGraph**: materialized dense CSR over the validated input
//!   graph, with costs pre-doubled so every slack computation stays
//!   integral.
//! - **heap**: the specialized priority structures of the primal-dual
//!   search: an indexed binary heap with erase/decrease-key and a forest
//!   of meldable pairing heaps.
//! - **matching**: the Edmonds-style augmenting search over blossoms,
//!   driven by a logical dual clock.
//!
//! # Example
//!
//! ```ignore
//! use blossom_algo::{Algorithm, MatchingGraph, MaxWeightMatching};
//! use blossom_common::WeightedGraph;
//!
//! let graph = WeightedGraph::from_edges(3, [(1, 2, 5), (2, 3, 6), (1, 3, 7)])?;
//! let result = MaxWeightMatching::run(&MatchingGraph::from_graph(&graph), Default::default());
//! assert_eq!(result.total_weight, 7);
//! ```

pub mod graph;
pub mod heap;
pub mod matching;

#[cfg(test)]
pub mod test_utils;

use crate::algo::graph::MatchingGraph;

/// Core trait for all graph algorithms.
pub trait Algorithm: Send + Sync {
    /// Algorithm parameters.
    type Config: Default + Clone + Send + 'static;
    /// Result type.
    type Result: Send + 'static;

    /// Algorithm identifier.
    fn name() -> &'static str;

    /// Execute algorithm on a materialized graph.
    fn run(graph: &MatchingGraph, config: Self::Config) -> Self::Result;
}
