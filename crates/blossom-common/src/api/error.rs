// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BlossomError {
    /// A graph must have at least one vertex
    #[error("Graph must have at least one vertex")]
    EmptyGraph,

    /// Vertex id outside the valid 1..=N range
    #[error("Vertex {vertex} out of range 1..={max}")]
    VertexOutOfRange { vertex: u32, max: u32 },

    /// Edge costs must be non-negative
    #[error("Negative cost {cost} on edge ({from}, {to})")]
    NegativeCost { from: u32, to: u32, cost: i64 },

    #[error("Argument '{arg}' is invalid: {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BlossomError>;
