// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

pub mod algo;

pub use algo::Algorithm;
pub use algo::graph::MatchingGraph;
pub use algo::matching::{
    MatchingStats, MaxWeightMatching, MaxWeightMatchingConfig, MaxWeightMatchingResult,
};
