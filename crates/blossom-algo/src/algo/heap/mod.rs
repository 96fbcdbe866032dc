// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Priority structures for the event-driven dual adjustment.
//!
//! The matching engine tracks three classes of future events, each with its
//! own structure:
//! - [`IndexedHeap`] keyed by slot id, supporting erase and decrease-key by
//!   identity. Instantiated once with [`EdgeEvent`] keys (next tight edge per
//!   surface blossom) and once with plain `i64` keys (blossom expansion
//!   times).
//! - [`PairingForest`], a forest of meldable pairing heaps, one per group,
//!   aggregating the best inbound edge of a blossom subtree without
//!   rescanning members on every clock tick.
//!
//! The third structure, the tight-edge queue, is a plain
//! `std::collections::BinaryHeap` with lazy staleness discard and lives with
//! the engine.

mod indexed;
mod pairing;

pub use indexed::IndexedHeap;
pub use pairing::PairingForest;

/// A candidate edge annotated with the dual-clock time at which it becomes
/// tight. Ordered by time; endpoint fields break ties deterministically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeEvent {
    pub time: i64,
    pub from: usize,
    pub to: usize,
}
