// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Matching Graph - dense CSR representation for the matching engine.
//!
//! A `MatchingGraph` is a materialized, algorithm-optimized view of a
//! `WeightedGraph`:
//! - Vertices keep their external 1..=N ids; row 0 is an empty sentinel row
//! - CSR format for cache-friendly incident-edge iteration; every undirected
//!   edge is stored once per endpoint
//! - Costs are doubled at build time so reduced-cost arithmetic stays
//!   integral (potentials are half-integral in the matching LP)

use blossom_common::WeightedGraph;

/// A directed half of an undirected input edge.
#[derive(Clone, Copy, Debug)]
pub struct MatchingEdge {
    /// Opposite endpoint.
    pub to: u32,
    /// Doubled input cost.
    pub cost: i64,
}

/// Dense CSR representation optimized for the matching engine.
#[derive(Debug)]
pub struct MatchingGraph {
    /// Number of vertices (external ids 1..=N)
    vertex_count: u32,

    /// Incident edges: CSR format
    offsets: Vec<u32>, // [N+2] vertex id -> edge start
    edges: Vec<MatchingEdge>, // [2E] edge halves
}

impl MatchingGraph {
    /// Materialize a CSR view of a validated input graph.
    pub fn from_graph(graph: &WeightedGraph) -> Self {
        let n = graph.vertex_count() as usize;

        // Count degrees
        let mut degrees = vec![0u32; n + 1];
        for e in graph.edges() {
            degrees[e.from as usize] += 1;
            degrees[e.to as usize] += 1;
        }

        // Build offsets (prefix sum); row 0 stays empty
        let mut offsets = vec![0u32; n + 2];
        for v in 1..=n {
            offsets[v + 1] = offsets[v] + degrees[v];
        }

        // Fill edge halves
        let mut edges = vec![
            MatchingEdge { to: 0, cost: 0 };
            graph.edge_count() * 2
        ];
        let mut cursor = offsets.clone();
        for e in graph.edges() {
            let cost = e.cost << 1;
            edges[cursor[e.from as usize] as usize] = MatchingEdge { to: e.to, cost };
            cursor[e.from as usize] += 1;
            edges[cursor[e.to as usize] as usize] = MatchingEdge { to: e.from, cost };
            cursor[e.to as usize] += 1;
        }

        Self {
            vertex_count: graph.vertex_count(),
            offsets,
            edges,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of stored edge halves (2E).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge-id range of the edges incident to `v`.
    #[inline]
    pub fn edge_range(&self, v: usize) -> std::ops::Range<usize> {
        self.offsets[v] as usize..self.offsets[v + 1] as usize
    }

    /// Edge half by id.
    #[inline]
    pub fn edge(&self, id: usize) -> MatchingEdge {
        self.edges[id]
    }

    /// Incident edge halves of `v`.
    #[inline]
    pub fn incident(&self, v: usize) -> &[MatchingEdge] {
        &self.edges[self.edge_range(v)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_layout() {
        // Triangle 1-2, 2-3, 1-3
        let g = WeightedGraph::from_edges(3, [(1, 2, 5), (2, 3, 6), (1, 3, 7)]).unwrap();
        let m = MatchingGraph::from_graph(&g);

        assert_eq!(m.vertex_count(), 3);
        assert_eq!(m.edge_count(), 6);
        // Row 0 is the sentinel row
        assert_eq!(m.edge_range(0), 0..0);

        let n1: Vec<u32> = m.incident(1).iter().map(|e| e.to).collect();
        assert_eq!(n1, vec![2, 3]);
        let n2: Vec<u32> = m.incident(2).iter().map(|e| e.to).collect();
        assert_eq!(n2, vec![1, 3]);

        // Costs are doubled
        assert_eq!(m.incident(1)[0].cost, 10);
        assert_eq!(m.incident(3)[1].cost, 14);
    }

    #[test]
    fn test_isolated_vertices() {
        let g = WeightedGraph::from_edges(4, [(2, 3, 1)]).unwrap();
        let m = MatchingGraph::from_graph(&g);
        assert_eq!(m.edge_range(1), 0..0);
        assert_eq!(m.edge_range(4), 2..2);
        assert_eq!(m.incident(2)[0].to, 3);
    }
}
