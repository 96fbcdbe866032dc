// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Matching Engine Benchmarks
//!
//! Run with:
//! cargo bench --bench matching_benchmarks

use blossom_algo::{Algorithm, MatchingGraph, MaxWeightMatching};
use blossom_common::WeightedGraph;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_graph(n: u32, edges_per_vertex: usize, seed: u64) -> MatchingGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = WeightedGraph::new(n).unwrap();
    for u in 1..=n {
        for _ in 0..edges_per_vertex {
            let v = rng.gen_range(1..=n);
            if v != u {
                graph.add_edge(u, v, rng.gen_range(0..=1000)).unwrap();
            }
        }
    }
    MatchingGraph::from_graph(&graph)
}

fn cycle_graph(n: u32) -> MatchingGraph {
    let edges = (1..=n).map(|u| (u, if u == n { 1 } else { u + 1 }, 1i64));
    let graph = WeightedGraph::from_edges(n, edges).unwrap();
    MatchingGraph::from_graph(&graph)
}

fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_weight_matching/random");
    for &n in &[100u32, 400, 1000] {
        let graph = random_graph(n, 4, 0xbe5e);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| MaxWeightMatching::run(graph, Default::default()));
        });
    }
    group.finish();
}

fn bench_odd_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_weight_matching/odd_cycle");
    for &n in &[101u32, 1001] {
        let graph = cycle_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| MaxWeightMatching::run(graph, Default::default()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_random, bench_odd_cycle);
criterion_main!(benches);
