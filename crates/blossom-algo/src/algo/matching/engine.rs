// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Edmonds-style augmenting search with primal-dual adjustment.
//!
//! One `do_edmonds_search` call grows an alternating tree from an unmatched
//! root. Time is a logical clock: OUTER potentials shrink with it, INNER
//! potentials grow, and every future state change (a vertex potential
//! reaching zero, an edge becoming tight for growth or contraction, a
//! blossom potential reaching zero) is a closed-form event time held in one
//! of the priority structures. `augment` drains the BFS queue at the current
//! clock value; `adjust_dual_variables` advances the clock to the earliest
//! event and replays everything tied at that time.

use std::cmp::Reverse;

use crate::algo::heap::EdgeEvent;
use crate::algo::matching::store::{Label, Link, NodeLink, SearchState, TightEdge, INF};

impl SearchState<'_> {
    /// Dual-feasible start: half the maximum incident (doubled) cost.
    pub(crate) fn set_potential(&mut self) {
        for u in 1..=self.n {
            let mut max_cost = 0i64;
            for e in self.graph.incident(u) {
                max_cost = max_cost.max(e.cost);
            }
            self.potential[u] = max_cost >> 1;
        }
    }

    /// Sum of real (undoubled) matched-edge costs, each pair counted once.
    /// Parallel edges settle on the maximum cost between the endpoints.
    pub(crate) fn total_weight(&self) -> i64 {
        let mut total = 0i64;
        for u in 1..=self.n {
            if self.mate[u] > u {
                let mut best = 0i64;
                for e in self.graph.incident(u) {
                    if e.to as usize == self.mate[u] {
                        best = best.max(e.cost);
                    }
                }
                total += best;
            }
        }
        total >> 1
    }

    #[inline]
    fn reduced_cost(&self, u: usize, v: usize, w: i64) -> i64 {
        self.potential[u] + self.potential[v] - w
    }

    /// Runs one augmenting search from `root`, then resets all search state.
    pub(crate) fn do_edmonds_search(&mut self, root: usize) {
        if self.potential[root] == 0 {
            return;
        }
        let surface_root = self.surface[root];
        self.link_blossom(surface_root, Link { from: 0, to: 0 });
        self.push_outer_and_fix_potentials(surface_root, 0);
        loop {
            if self.augment(root) {
                break;
            }
            if self.adjust_dual_variables(root) {
                break;
            }
        }
        self.reset_all();
    }

    /// Flips matched/unmatched along the alternating path anchored at `v`.
    /// The only mutator of `mate`.
    pub(crate) fn rematch(&mut self, v: usize, w: usize) {
        let mut work = vec![(v, w)];
        while let Some((v, w)) = work.pop() {
            let t = self.mate[v];
            self.mate[v] = w;
            if self.mate[t] != v {
                continue;
            }
            let l = self.link[v];
            if l.to == self.surface[l.to] {
                self.mate[t] = l.from;
                work.push((l.from, t));
            } else {
                work.push((l.to, l.from));
                work.push((l.from, l.to));
            }
        }
    }

    /// Breadth-first drain of the OUTER queue at the current clock value.
    /// Returns true when an augmenting path was found and applied.
    pub(crate) fn augment(&mut self, root: usize) -> bool {
        while let Some(x) = self.queue.pop_front() {
            let mut bx = self.surface[x];

            // An OUTER vertex whose potential hit the clock is an augmenting
            // path endpoint.
            if self.potential[x] == self.current_time {
                if x != root {
                    self.rematch(x, 0);
                }
                return true;
            }

            for eid in self.graph.edge_range(x) {
                let e = self.graph.edge(eid);
                let y = e.to as usize;
                let by = self.surface[y];
                if bx == by {
                    continue;
                }

                let label = self.label[by];
                if label == Label::Outer {
                    let time = self.reduced_cost(x, y, e.cost) >> 1;
                    if time == self.current_time {
                        self.contract(x, y, eid);
                        bx = self.surface[x];
                    } else if time < self.event.time {
                        self.tight_edges.push(Reverse(TightEdge {
                            time,
                            from: x,
                            edge: eid,
                        }));
                    }
                } else {
                    let time = self.reduced_cost(x, y, e.cost);
                    if time >= INF {
                        continue;
                    }
                    if label != Label::Inner {
                        if time + self.lazy[by] == self.current_time {
                            if self.grow(root, x, y) {
                                return true;
                            }
                        } else {
                            self.update_edge_event(Label::Free, x, y, by, time);
                        }
                    } else if self.mate[x] != y {
                        self.update_edge_event(Label::Inner, x, y, by, time);
                    }
                }
            }
        }
        false
    }

    /// Advances the clock to the earliest pending event and performs every
    /// action tied at that time. Returns true when an augmenting path was
    /// completed.
    pub(crate) fn adjust_dual_variables(&mut self, root: usize) -> bool {
        // (a) a vertex potential reaches zero
        let time1 = self.event.time;

        // (b) an edge becomes tight for tree growth
        let time2 = if self.edge_events.is_empty() {
            INF
        } else {
            self.edge_events.min().time
        };

        // (c) an edge becomes tight for contraction; stale entries whose
        // endpoints merged are dropped here
        let mut time3 = INF;
        while let Some(&Reverse(e)) = self.tight_edges.peek() {
            let x = e.from;
            let y = self.graph.edge(e.edge).to as usize;
            if self.surface[x] != self.surface[y] {
                time3 = e.time;
                break;
            }
            self.tight_edges.pop();
        }

        // (d) a blossom potential reaches zero
        let time4 = if self.expand_events.is_empty() {
            INF
        } else {
            self.expand_events.min()
        };

        self.current_time = time1.min(time2).min(time3).min(time4);

        if self.current_time == self.event.time {
            let x = self.event.id;
            if x != root {
                self.rematch(x, 0);
            }
            return true;
        }

        while !self.edge_events.is_empty() && self.edge_events.min().time == self.current_time {
            let ev = self.edge_events.min();
            if self.grow(root, ev.from, ev.to) {
                return true;
            }
        }

        while let Some(&Reverse(e)) = self.tight_edges.peek() {
            if e.time != self.current_time {
                break;
            }
            self.tight_edges.pop();
            let x = e.from;
            let y = self.graph.edge(e.edge).to as usize;
            if self.surface[x] == self.surface[y] {
                continue;
            }
            self.contract(x, y, e.edge);
        }

        while !self.expand_events.is_empty() && self.expand_events.min() == self.current_time {
            let b = self.expand_events.argmin();
            self.expand_events.pop();
            self.expand(b);
        }

        false
    }

    /// Extends the alternating tree across the tight edge (x, y): labels
    /// y's surface INNER and its mate's surface OUTER, or completes an
    /// augmenting path if y's surface is unmatched.
    pub(crate) fn grow(&mut self, root: usize, x: usize, y: usize) -> bool {
        let by = self.surface[y];
        let visited = self.label[by] != Label::Free;
        if !visited {
            self.link_blossom(by, Link { from: 0, to: 0 });
        }
        self.label[by] = Label::Inner;
        self.time_created[by] = self.current_time;
        self.edge_events.erase(by);
        if y != by {
            self.expand_events
                .update(by, self.current_time + (self.potential[by] >> 1));
        }

        let z = self.mate[by];
        if z == 0 && by != self.surface[root] {
            self.rematch(x, y);
            self.rematch(y, x);
            return true;
        }

        let bz = self.surface[z];
        if !visited {
            self.link_blossom(bz, Link { from: x, to: y });
        } else {
            self.link[bz] = Link { from: x, to: y };
            self.link[z] = Link { from: x, to: y };
        }
        let delta = self.fix_blossom_potential(Label::Free, bz);
        self.push_outer_and_fix_potentials(bz, delta);
        self.time_created[bz] = self.current_time;
        self.edge_events.erase(bz);
        false
    }

    /// Records a newly observed slack toward a non-OUTER surface, keeping
    /// the per-vertex, per-group and per-surface minima and their heap
    /// entries consistent.
    fn update_edge_event(&mut self, label: Label, x: usize, y: usize, by: usize, t: i64) {
        if t >= self.slack[y] {
            return;
        }
        self.slack[y] = t;
        self.best_from[y] = x;

        if y == by {
            if label != Label::Inner {
                self.edge_events.decrease_key(
                    y,
                    EdgeEvent {
                        time: t + self.lazy[y],
                        from: x,
                        to: y,
                    },
                );
            }
        } else {
            let gy = self.group[y];
            if gy != y {
                if t >= self.slack[gy] {
                    return;
                }
                self.slack[gy] = t;
            }
            self.group_edges
                .decrease_key(by, gy, EdgeEvent { time: t, from: x, to: y });
            if label == Label::Inner {
                return;
            }
            let m = self.group_edges.min(by);
            self.edge_events.decrease_key(
                by,
                EdgeEvent {
                    time: m.time + self.lazy[by],
                    from: m.from,
                    to: m.to,
                },
            );
        }
    }

    /// Re-arms the growth heap for a node released from an expanded blossom.
    fn activate_edge_events(&mut self, b: usize) {
        if b <= self.n {
            if self.slack[b] < INF {
                self.edge_events.push(
                    b,
                    EdgeEvent {
                        time: self.slack[b] + self.lazy[b],
                        from: self.best_from[b],
                        to: b,
                    },
                );
            }
        } else if !self.group_edges.is_empty(b) {
            let m = self.group_edges.min(b);
            self.edge_events.push(
                b,
                EdgeEvent {
                    time: m.time + self.lazy[b],
                    from: m.from,
                    to: m.to,
                },
            );
        }
    }

    /// Contracts the odd cycle closed by the tight edge (x, y): finds the
    /// least common ancestor of their surfaces by walking the mate/link
    /// chains with a fresh visit mark, splices both tree paths into one
    /// member cycle, and hands the cycle a blossom id from the free pool.
    pub(crate) fn contract(&mut self, x: usize, y: usize, eid: usize) {
        let mut bx = self.surface[x];
        let mut by = self.surface[y];
        let h = self.next_lca_mark();

        self.link[self.surface[self.mate[bx]]].from = h;
        self.link[self.surface[self.mate[by]]].from = h;

        let lca;
        loop {
            if self.mate[by] != 0 {
                std::mem::swap(&mut bx, &mut by);
            }
            bx = self.surface[self.link[bx].from];
            let meet = self.surface[self.mate[bx]];
            if self.link[meet].from == h {
                lca = bx;
                break;
            }
            self.link[meet].from = h;
        }

        let blossom = self
            .free_ids
            .pop()
            .expect("blossom id pool exhausted");
        log::trace!("contract: blossom {} around edge ({}, {})", blossom, x, y);

        let mut tree_size = 0u32;
        let (mut x, mut y) = (x, y);
        for d in 0..2 {
            let mut bv = self.surface[x];
            while bv != lca {
                let mv = self.mate[bv];
                let bmv = self.surface[mv];
                let v = self.mate[mv];
                let Link { from, to } = self.link[v];

                tree_size += self.nodes[bv].size + self.nodes[bmv].size;
                self.link[mv] = Link { from: x, to: y };

                if bv > self.n {
                    self.potential[bv] += (self.current_time - self.time_created[bv]) << 1;
                }
                if bmv > self.n {
                    self.expand_events.erase(bmv);
                }
                let delta = self.fix_blossom_potential(Label::Inner, bmv);
                self.push_outer_and_fix_potentials(bmv, delta);

                self.nodes[bv].link[d] = NodeLink { b: bmv, v: mv };
                self.nodes[bmv].link[d ^ 1] = NodeLink { b: bv, v };

                let next_bv = self.surface[from];
                self.nodes[bmv].link[d] = NodeLink { b: next_bv, v: from };
                self.nodes[next_bv].link[d ^ 1] = NodeLink { b: bmv, v: to };

                bv = next_bv;
            }
            self.nodes[self.surface[x]].link[d ^ 1] = NodeLink {
                b: self.surface[y],
                v: y,
            };
            std::mem::swap(&mut x, &mut y);
        }

        if lca > self.n {
            self.potential[lca] += (self.current_time - self.time_created[lca]) << 1;
        }

        self.nodes[blossom].size = tree_size + self.nodes[lca].size;
        self.base[blossom] = lca;
        self.link[blossom] = self.link[lca];
        self.mate[blossom] = self.mate[lca];
        self.label[blossom] = Label::Outer;
        self.surface[blossom] = blossom;
        self.time_created[blossom] = self.current_time;
        self.potential[blossom] = 0;
        self.lazy[blossom] = 0;

        self.merge_smaller_blossoms(blossom);
        self.stats.contractions += 1;
    }

    /// Recomputes the minimum slack of a freed sub-blossom by scanning its
    /// vertices in cycle order; returns the vertex holding the minimum, or
    /// 0 when nothing beats the group's current slack.
    fn recalculate_minimum_slack(&mut self, b: usize, group: usize) -> usize {
        let mut best = 0;
        let mut work = vec![b];
        while let Some(x) = work.pop() {
            if x <= self.n {
                if self.slack[x] < self.slack[group] {
                    self.slack[group] = self.slack[x];
                    self.best_from[group] = self.best_from[x];
                    best = x;
                }
                continue;
            }
            let start = self.base[x];
            let mut members = Vec::new();
            let mut m = start;
            loop {
                members.push(m);
                m = self.nodes[m].next_b();
                if m == start {
                    break;
                }
            }
            // Reversed push keeps cycle order on the LIFO worklist.
            for &m in members.iter().rev() {
                work.push(m);
            }
        }
        best
    }

    /// Detaches the light members of an expanding blossom: each becomes its
    /// own surface and aggregation group, with a freshly computed best
    /// inbound edge pushed into the parent surface's pairing heap.
    fn construct_smaller_components(&mut self, b: usize, surface: usize, group: usize) {
        let mut work = vec![b];
        while let Some(x) = work.pop() {
            self.surface[x] = surface;
            self.group[x] = group;
            if x <= self.n {
                continue;
            }
            let heavy = self.heavy[x];
            let start = self.base[x];
            let mut m = start;
            while self.surface[m] != surface {
                if m == heavy {
                    work.push(m);
                } else {
                    self.set_surface_and_group(m, surface, m);
                    let mut to = 0;
                    if m > self.n {
                        self.slack[m] = INF;
                        to = self.recalculate_minimum_slack(m, m);
                    } else if self.slack[m] < INF {
                        to = m;
                    }
                    if to > 0 {
                        let ev = EdgeEvent {
                            time: self.slack[m],
                            from: self.best_from[m],
                            to,
                        };
                        self.group_edges.push(surface, m, ev);
                    }
                }
                m = self.nodes[m].next_b();
                if m == start {
                    break;
                }
            }
        }
    }

    /// Swaps the heavy child back into the parent's id slot (O(1) for that
    /// piece), rebuilds the priority entries of every lighter piece, and
    /// frees the vacated id.
    fn move_to_largest_blossom(&mut self, blossom: usize) {
        let heavy = self.heavy[blossom];
        let delta = (self.current_time - self.time_created[blossom]) + self.lazy[blossom];
        self.lazy[blossom] = 0;

        let beta = self.base[blossom];
        let mut b = beta;
        loop {
            self.time_created[b] = self.current_time;
            self.lazy[b] = delta;
            if b != heavy {
                self.construct_smaller_components(b, b, b);
                self.group_edges.erase(blossom, b);
            }
            b = self.nodes[b].next_b();
            if b == beta {
                break;
            }
        }

        let mut vacated = blossom;
        if heavy > 0 {
            self.swap_blossom(heavy, blossom);
            vacated = heavy;
        }
        self.free_blossom(vacated);
    }

    /// Expands a blossom whose potential reached zero: releases its member
    /// cycle back to the surface, re-labels the alternating path through it
    /// (INNER/OUTER) and detaches the remainder as SEPARATED. Nested
    /// members already at zero potential expand in the same clock tick.
    pub(crate) fn expand(&mut self, blossom: usize) {
        let mut work = vec![blossom];
        while let Some(b) = work.pop() {
            log::trace!("expand: blossom {}", b);
            self.stats.expansions += 1;

            let matched_vertex = self.mate[self.base[b]];
            self.move_to_largest_blossom(b);

            let old_link = self.link[matched_vertex];
            let old_base = self.surface[self.mate[matched_vertex]];
            let cycle_root = self.surface[old_link.to];
            let d = usize::from(self.mate[cycle_root] == self.nodes[cycle_root].link[0].v);

            // Members off the alternating path detach as SEPARATED.
            let mut cb = self.nodes[old_base].link[d ^ 1].b;
            while cb != cycle_root {
                self.label[cb] = Label::Separated;
                self.activate_edge_events(cb);
                cb = self.nodes[cb].link[d ^ 1].b;

                self.label[cb] = Label::Separated;
                self.activate_edge_events(cb);
                cb = self.nodes[cb].link[d ^ 1].b;
            }

            // Members on the path alternate INNER / OUTER toward the root.
            let mut cb = old_base;
            loop {
                self.label[cb] = Label::Inner;
                let next_base = self.nodes[cb].link[d].b;

                let mv = self.mate[cb];
                let l = if cb == cycle_root {
                    old_link
                } else {
                    Link {
                        from: self.nodes[cb].link[d].v,
                        to: self.nodes[next_base].link[d ^ 1].v,
                    }
                };
                self.link[mv] = l;
                self.link[self.surface[mv]] = l;

                if cb > self.n {
                    if self.potential[cb] == 0 {
                        work.push(cb);
                    } else {
                        self.expand_events
                            .push(cb, self.current_time + (self.potential[cb] >> 1));
                    }
                }

                if cb == cycle_root {
                    break;
                }
                cb = next_base;
                let delta = self.fix_blossom_potential(Label::Inner, next_base);
                self.push_outer_and_fix_potentials(next_base, delta);
                cb = self.nodes[next_base].link[d].b;
            }
        }
    }
}
