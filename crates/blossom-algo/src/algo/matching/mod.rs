// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Maximum-Weight Matching in general graphs (Galil/Gabow blossom method).
//!
//! Finds a matching of maximum total edge cost using Edmonds augmenting
//! searches with primal-dual adjustment over contracted odd cycles
//! ("blossoms"). Any graph is a valid input and the result is always an
//! optimal matching (possibly empty).

mod engine;
mod store;

use crate::algo::Algorithm;
use crate::algo::graph::MatchingGraph;
use store::SearchState;

pub struct MaxWeightMatching;

#[derive(Debug, Clone, Default)]
pub struct MaxWeightMatchingConfig {}

/// Structural counters of one run, kept for instrumentation and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchingStats {
    pub contractions: u64,
    pub expansions: u64,
}

#[derive(Debug, Clone)]
pub struct MaxWeightMatchingResult {
    /// Sum of matched edge costs, each pair counted once.
    pub total_weight: i64,
    /// Matched partner per vertex, indexed 1..=N; 0 = unmatched. Entry 0 is
    /// the sentinel and always 0.
    pub mate: Vec<u32>,
    pub stats: MatchingStats,
}

impl Algorithm for MaxWeightMatching {
    type Config = MaxWeightMatchingConfig;
    type Result = MaxWeightMatchingResult;

    fn name() -> &'static str {
        "maxWeightMatching"
    }

    fn run(graph: &MatchingGraph, _config: Self::Config) -> Self::Result {
        let n = graph.vertex_count() as usize;
        log::debug!(
            "maxWeightMatching: {} vertices, {} edge halves",
            n,
            graph.edge_count()
        );

        let mut state = SearchState::new(graph);
        state.set_potential();
        for u in 1..=n {
            if state.mate[u] == 0 {
                state.do_edmonds_search(u);
            }
        }

        let total_weight = state.total_weight();
        let mate: Vec<u32> = state.mate[..=n].iter().map(|&m| m as u32).collect();
        let stats = state.stats;
        log::debug!(
            "maxWeightMatching: weight {} ({} contractions, {} expansions)",
            total_weight,
            stats.contractions,
            stats.expansions
        );

        MaxWeightMatchingResult {
            total_weight,
            mate,
            stats,
        }
    }
}
