// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Blossom store: per-slot state arrays and structural mutation primitives.
//!
//! Slots 1..=N are vertices, slots N+1..=N+B (B = (N-1)/2) are blossom ids
//! handed out from an explicit free-list stack, and slot 0 is a permanent
//! writable sentinel ("no vertex" / "no blossom") that several walks read
//! and write instead of branching. Members of a blossom form a circular
//! doubly-linked structure through `CycleNode::link`; every structural
//! mutation here must keep each cycle closed.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::algo::graph::MatchingGraph;
use crate::algo::heap::{EdgeEvent, IndexedHeap, PairingForest};
use crate::algo::matching::MatchingStats;

pub(crate) const INF: i64 = i64::MAX;

/// Visit marks for the LCA walk of `contract` are stored in `Link::from`,
/// far above any real slot id.
pub(crate) const LCA_MARK_BASE: usize = usize::MAX >> 1;

/// Node state in the alternating search tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Label {
    /// Detached during blossom expansion, pending re-labeling
    Separated,
    /// Odd depth; potential grows with the clock
    Inner,
    /// Untouched by the current search
    Free,
    /// Even depth; potential shrinks with the clock
    Outer,
}

/// The alternating-tree edge through which a node was discovered.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Link {
    pub from: usize,
    pub to: usize,
}

/// One hop of a blossom's circular member list: neighboring member id plus
/// the vertex of the cycle edge on that side.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeLink {
    pub b: usize,
    pub v: usize,
}

/// Per-slot entry of the nested-blossom structure.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CycleNode {
    /// Vertex count of the subtree rooted at this slot
    pub size: u32,
    /// [next, prev] hops of the member cycle
    pub link: [NodeLink; 2],
}

impl CycleNode {
    fn new(u: usize) -> Self {
        Self {
            size: 1,
            link: [NodeLink { b: u, v: u }; 2],
        }
    }

    #[inline]
    pub fn next_b(&self) -> usize {
        self.link[0].b
    }

    #[inline]
    pub fn next_v(&self) -> usize {
        self.link[0].v
    }

    #[inline]
    pub fn prev_b(&self) -> usize {
        self.link[1].b
    }

    #[inline]
    pub fn prev_v(&self) -> usize {
        self.link[1].v
    }
}

/// Pending vertex-potential event: the clock value at which some OUTER
/// vertex's potential reaches zero (an augmenting path completes there).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Event {
    pub time: i64,
    pub id: usize,
}

/// Queued future contraction: a currently-slack edge between two OUTER
/// surfaces. Entries go stale when the endpoints merge and are discarded
/// lazily at pop time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct TightEdge {
    pub time: i64,
    pub from: usize,
    pub edge: usize,
}

/// Complete mutable state of one `maximum_weighted_matching` run.
///
/// Owned by the engine for the duration of the call; `reset_all` restores
/// the "no active search, clock at zero" baseline between roots.
pub(crate) struct SearchState<'a> {
    pub graph: &'a MatchingGraph,
    /// Vertex count N
    pub n: usize,
    /// Total slot count N + (N-1)/2 + 1
    pub slots: usize,

    pub mate: Vec<usize>,
    pub link: Vec<Link>,
    pub label: Vec<Label>,
    pub base: Vec<usize>,
    pub surface: Vec<usize>,
    pub group: Vec<usize>,
    pub potential: Vec<i64>,
    pub lazy: Vec<i64>,
    pub time_created: Vec<i64>,
    pub slack: Vec<i64>,
    pub best_from: Vec<usize>,
    pub heavy: Vec<usize>,
    pub nodes: Vec<CycleNode>,
    /// Free blossom ids; top of the stack is handed out first
    pub free_ids: Vec<usize>,

    /// OUTER vertices discovered this round, drained breadth-first
    pub queue: VecDeque<usize>,
    pub current_time: i64,
    pub event: Event,
    next_mark: usize,

    /// Next tight or growable edge per surface blossom
    pub edge_events: IndexedHeap<EdgeEvent>,
    /// Blossom expansion times
    pub expand_events: IndexedHeap<i64>,
    /// Future contractions, lazily invalidated
    pub tight_edges: BinaryHeap<Reverse<TightEdge>>,
    /// Best inbound edge per group, aggregated over blossom subtrees
    pub group_edges: PairingForest<EdgeEvent>,

    pub stats: MatchingStats,
}

impl<'a> SearchState<'a> {
    pub(crate) fn new(graph: &'a MatchingGraph) -> Self {
        let n = graph.vertex_count() as usize;
        let b = (n - 1) / 2;
        let slots = n + b + 1;
        Self {
            graph,
            n,
            slots,
            mate: vec![0; slots],
            link: vec![Link::default(); slots],
            label: vec![Label::Free; slots],
            base: (0..slots).collect(),
            surface: (0..slots).collect(),
            group: (0..slots).collect(),
            potential: vec![0; slots],
            lazy: vec![0; slots],
            time_created: vec![0; slots],
            slack: vec![INF; slots],
            best_from: vec![0; slots],
            heavy: vec![0; slots],
            nodes: (0..slots).map(CycleNode::new).collect(),
            free_ids: (n + 1..slots).rev().collect(),
            queue: VecDeque::new(),
            current_time: 0,
            event: Event { time: INF, id: 0 },
            next_mark: 0,
            edge_events: IndexedHeap::new(slots),
            expand_events: IndexedHeap::new(slots),
            tight_edges: BinaryHeap::new(),
            group_edges: PairingForest::new(slots, slots),
            stats: MatchingStats::default(),
        }
    }

    /// Hands out a fresh per-contraction visit mark, disjoint from all slot
    /// ids and all previously issued marks.
    pub(crate) fn next_lca_mark(&mut self) -> usize {
        let mark = LCA_MARK_BASE + self.next_mark;
        self.next_mark += 1;
        mark
    }

    pub(crate) fn reset_time(&mut self) {
        self.current_time = 0;
        self.event = Event { time: INF, id: 0 };
    }

    pub(crate) fn reset_blossom(&mut self, b: usize) {
        self.label[b] = Label::Free;
        self.link[b] = Link { from: 0, to: 0 };
        self.slack[b] = INF;
        self.lazy[b] = 0;
    }

    /// Folds the elapsed clock into permanent potentials and restores the
    /// "no node labeled, clock at zero" baseline for the next root.
    pub(crate) fn reset_all(&mut self) {
        self.label[0] = Label::Free;
        self.link[0].from = 0;

        for v in 1..=self.n {
            if self.label[v] == Label::Outer {
                self.potential[v] -= self.current_time;
            } else {
                let sv = self.surface[v];
                self.potential[v] += self.lazy[sv];
                if self.label[sv] == Label::Inner {
                    self.potential[v] += self.current_time - self.time_created[sv];
                }
            }
            self.reset_blossom(v);
        }

        let blossom_slots = self.slots - self.n - 1;
        let mut remaining = blossom_slots - self.free_ids.len();
        let mut b = self.n + 1;
        while remaining > 0 && b < self.slots {
            if self.base[b] != b {
                if self.surface[b] == b {
                    self.fix_mate_and_base(b);
                    match self.label[b] {
                        Label::Outer => {
                            self.potential[b] +=
                                (self.current_time - self.time_created[b]) << 1;
                        }
                        Label::Inner => {
                            self.fix_blossom_potential(Label::Inner, b);
                        }
                        _ => {
                            self.fix_blossom_potential(Label::Free, b);
                        }
                    }
                }
                self.group_edges.clear(b);
                self.reset_blossom(b);
                remaining -= 1;
            }
            b += 1;
        }

        self.queue.clear();
        self.reset_time();
        self.edge_events.clear();
        self.tight_edges.clear();
        self.expand_events.clear();
    }

    /// Applies a blossom's deferred potential delta and, for INNER nodes,
    /// the clock time accumulated since it was labeled. Returns the total
    /// per-vertex delta the caller must push down.
    pub(crate) fn fix_blossom_potential(&mut self, label: Label, b: usize) -> i64 {
        let mut delta = self.lazy[b];
        self.lazy[b] = 0;
        if label == Label::Inner {
            let dt = self.current_time - self.time_created[b];
            if b > self.n {
                self.potential[b] -= dt << 1;
            }
            delta += dt;
        }
        delta
    }

    /// Restores `base` and `mate` of a surviving blossom after a search:
    /// walks the member cycle to the member whose cycle edges no longer
    /// alternate with the matching, which is the new base.
    pub(crate) fn fix_mate_and_base(&mut self, blossom: usize) {
        let mut pending = vec![blossom];
        let mut order = Vec::new();
        while let Some(b) = pending.pop() {
            if b <= self.n {
                continue;
            }
            order.push(b);
            let mut bv = self.base[b];
            let l0 = self.nodes[bv].link[0];
            let d = usize::from(self.nodes[l0.b].link[1].v != self.mate[l0.v]);
            loop {
                let l = self.nodes[bv].link[d];
                if self.nodes[l.b].link[1 ^ d].v != self.mate[l.v] {
                    break;
                }
                pending.push(bv);
                pending.push(l.b);
                bv = self.nodes[l.b].link[d].b;
            }
            self.base[b] = bv;
            pending.push(bv);
        }
        // Innermost blossoms first, so every mate[base] read below is final.
        for &b in order.iter().rev() {
            self.mate[b] = self.mate[self.base[b]];
        }
    }

    /// Records the discovery link on a node and, for blossoms, derives the
    /// member links along the alternating cycle.
    pub(crate) fn link_blossom(&mut self, v: usize, link: Link) {
        let mut work = vec![(v, link)];
        while let Some((v, link)) = work.pop() {
            self.link[v] = link;
            if v <= self.n {
                continue;
            }
            let b = self.base[v];
            work.push((b, link));

            let pb = self.nodes[b].prev_b();
            let l = Link {
                from: self.nodes[pb].next_v(),
                to: self.nodes[b].prev_v(),
            };
            let mut bv = b;
            loop {
                let bw = self.nodes[bv].next_b();
                if bw == b {
                    break;
                }
                work.push((bw, l));
                let nl = Link {
                    from: self.nodes[bw].prev_v(),
                    to: self.nodes[bv].next_v(),
                };
                bv = self.nodes[bw].next_b();
                work.push((bv, nl));
            }
        }
    }

    /// Labels a node and its members OUTER, applying the pending potential
    /// delta to each vertex and scheduling it for the BFS scan. The member
    /// walk stops at the first already-OUTER member: a subtree with a stale
    /// OUTER label already carries its potential and must not be re-pushed.
    pub(crate) fn push_outer_and_fix_potentials(&mut self, v: usize, delta: i64) {
        let mut work = vec![v];
        while let Some(x) = work.pop() {
            self.label[x] = Label::Outer;
            if x > self.n {
                let start = self.base[x];
                let mut m = start;
                while self.label[m] != Label::Outer {
                    work.push(m);
                    m = self.nodes[m].next_b();
                    if m == start {
                        break;
                    }
                }
            } else {
                self.potential[x] += self.current_time + delta;
                if self.potential[x] < self.event.time {
                    self.event = Event {
                        time: self.potential[x],
                        id: x,
                    };
                }
                self.queue.push_back(x);
            }
        }
    }

    /// Points a subtree at its surface blossom and aggregation group.
    pub(crate) fn set_surface_and_group(&mut self, b: usize, surface: usize, group: usize) {
        let mut work = vec![b];
        while let Some(x) = work.pop() {
            self.surface[x] = surface;
            self.group[x] = group;
            if x <= self.n {
                continue;
            }
            let start = self.base[x];
            let mut m = start;
            while self.surface[m] != surface {
                work.push(m);
                m = self.nodes[m].next_b();
                if m == start {
                    break;
                }
            }
        }
    }

    /// Exchanges the storage slots of two blossom ids so the structurally
    /// larger sub-blossom can inherit its parent's identity (heavy-path
    /// reuse). Label, surface, group, slack and best_from stay put: they
    /// are keyed by the identity that remains on the surface.
    pub(crate) fn swap_blossom(&mut self, b1: usize, b2: usize) {
        self.base.swap(b1, b2);
        if self.base[b1] == b1 {
            self.base[b1] = b2;
        }

        self.heavy.swap(b1, b2);
        if self.heavy[b1] == b1 {
            self.heavy[b1] = b2;
        }

        self.link.swap(b1, b2);
        self.mate.swap(b1, b2);
        self.potential.swap(b1, b2);
        self.lazy.swap(b1, b2);
        self.time_created.swap(b1, b2);

        for d in 0..2 {
            let nb = self.nodes[b1].link[d].b;
            self.nodes[nb].link[d ^ 1].b = b2;
        }
        self.nodes.swap(b1, b2);
    }

    /// After a contraction, folds every member under the structurally
    /// largest one and renames that member to the new blossom's id slot.
    pub(crate) fn merge_smaller_blossoms(&mut self, blossom: usize) {
        let mut largest = blossom;
        let mut largest_size = 1;

        let beta = self.base[blossom];
        let mut b = beta;
        loop {
            if self.nodes[b].size > largest_size {
                largest_size = self.nodes[b].size;
                largest = b;
            }
            b = self.nodes[b].next_b();
            if b == beta {
                break;
            }
        }

        let mut b = beta;
        loop {
            if b != largest {
                self.set_surface_and_group(b, largest, b);
            }
            b = self.nodes[b].next_b();
            if b == beta {
                break;
            }
        }
        self.group[largest] = largest;

        if largest_size > 1 {
            self.surface[blossom] = largest;
            self.heavy[blossom] = largest;
            self.swap_blossom(largest, blossom);
        } else {
            self.heavy[blossom] = 0;
        }
    }

    /// Returns a blossom id to the free pool.
    pub(crate) fn free_blossom(&mut self, blossom: usize) {
        self.free_ids.push(blossom);
        self.base[blossom] = blossom;
    }
}
