// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Validated undirected weighted graph input.
//!
//! Vertices are numbered 1..=N; id 0 is reserved as the "no vertex"
//! sentinel throughout the workspace. All input validation happens here:
//! downstream algorithm code assumes well-formed ids and non-negative
//! costs and performs no bounds checks of its own.

use crate::api::error::{BlossomError, Result};
use serde::{Deserialize, Serialize};

/// A single undirected edge with a non-negative integer cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub from: u32,
    pub to: u32,
    pub cost: i64,
}

/// Undirected graph with integer edge costs, vertices numbered 1..=N.
///
/// Parallel edges and self-loops are accepted; how ties between parallel
/// edges break downstream is unspecified. Callers must keep
/// `N * max_cost` well below `i64::MAX / 4`, since cost arithmetic is
/// doubled internally by consumers to stay integral.
#[derive(Clone, Debug)]
pub struct WeightedGraph {
    vertex_count: u32,
    edges: Vec<WeightedEdge>,
}

impl WeightedGraph {
    /// Creates an empty graph with vertices 1..=vertex_count.
    pub fn new(vertex_count: u32) -> Result<Self> {
        if vertex_count == 0 {
            return Err(BlossomError::EmptyGraph);
        }
        Ok(Self {
            vertex_count,
            edges: Vec::new(),
        })
    }

    /// Creates a graph from an edge list.
    pub fn from_edges<I>(vertex_count: u32, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, u32, i64)>,
    {
        let mut graph = Self::new(vertex_count)?;
        for (from, to, cost) in edges {
            graph.add_edge(from, to, cost)?;
        }
        Ok(graph)
    }

    /// Adds an undirected edge.
    pub fn add_edge(&mut self, from: u32, to: u32, cost: i64) -> Result<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if cost < 0 {
            return Err(BlossomError::NegativeCost { from, to, cost });
        }
        self.edges.push(WeightedEdge { from, to, cost });
        Ok(())
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    #[inline]
    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    fn check_vertex(&self, v: u32) -> Result<()> {
        if v == 0 || v > self.vertex_count {
            return Err(BlossomError::VertexOutOfRange {
                vertex: v,
                max: self.vertex_count,
            });
        }
        Ok(())
    }
}
