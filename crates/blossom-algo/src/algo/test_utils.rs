// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use crate::algo::graph::MatchingGraph;
use blossom_common::WeightedGraph;

pub fn build_test_graph(n: u32, edges: &[(u32, u32, i64)]) -> MatchingGraph {
    let mut graph = WeightedGraph::new(n).expect("vertex count must be positive");
    for &(from, to, cost) in edges {
        graph.add_edge(from, to, cost).expect("edge must be valid");
    }
    MatchingGraph::from_graph(&graph)
}
