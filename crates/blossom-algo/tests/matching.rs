// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use blossom_algo::{Algorithm, MatchingGraph, MaxWeightMatching, MaxWeightMatchingResult};
use blossom_common::WeightedGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn run_matching(n: u32, edges: &[(u32, u32, i64)]) -> MaxWeightMatchingResult {
    let graph = WeightedGraph::from_edges(n, edges.iter().copied()).unwrap();
    MaxWeightMatching::run(&MatchingGraph::from_graph(&graph), Default::default())
}

/// Exhaustive maximum over all matchings via bitmask DP: the lowest free
/// vertex is either left unmatched or paired with any other free neighbor.
fn brute_force_weight(n: u32, edges: &[(u32, u32, i64)]) -> i64 {
    let n = n as usize;
    assert!(n <= 16);

    let mut cost = vec![vec![-1i64; n + 1]; n + 1];
    for &(u, v, c) in edges {
        if u != v {
            let (u, v) = (u as usize, v as usize);
            if c > cost[u][v] {
                cost[u][v] = c;
                cost[v][u] = c;
            }
        }
    }

    let full = 1usize << n;
    // f[mask] = best weight over vertices outside `mask`
    let mut f = vec![0i64; full];
    for mask in (0..full - 1).rev() {
        let v = (!mask).trailing_zeros() as usize;
        let mut best = f[mask | (1 << v)];
        for u in (v + 1)..n {
            if mask & (1 << u) == 0 && cost[v + 1][u + 1] >= 0 {
                best = best.max(cost[v + 1][u + 1] + f[mask | (1 << v) | (1 << u)]);
            }
        }
        f[mask] = best;
    }
    f[0]
}

fn assert_valid(n: u32, edges: &[(u32, u32, i64)], result: &MaxWeightMatchingResult) {
    assert_eq!(result.mate.len() as u32, n + 1);
    assert_eq!(result.mate[0], 0);
    for v in 1..=n as usize {
        let m = result.mate[v] as usize;
        if m != 0 {
            assert_eq!(result.mate[m] as usize, v, "mate must be an involution");
        }
    }
    // The reported weight must equal the sum over matched pairs of the best
    // connecting edge cost.
    let mut recomputed = 0i64;
    for v in 1..=n {
        let m = result.mate[v as usize] as u32;
        if m > v {
            let best = edges
                .iter()
                .filter(|&&(a, b, _)| (a, b) == (v, m) || (a, b) == (m, v))
                .map(|&(_, _, c)| c)
                .max()
                .expect("matched pair without a connecting edge");
            recomputed += best;
        }
    }
    assert_eq!(result.total_weight, recomputed);
}

#[test]
fn test_differential_small_random_graphs() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..300 {
        let n = rng.gen_range(1..=9u32);
        let mut edges = Vec::new();
        for u in 1..n {
            for v in (u + 1)..=n {
                if rng.gen_bool(0.5) {
                    edges.push((u, v, rng.gen_range(0..=12i64)));
                }
            }
        }

        let result = run_matching(n, &edges);
        assert_valid(n, &edges, &result);

        let expected = brute_force_weight(n, &edges);
        assert_eq!(
            result.total_weight, expected,
            "round {}: n={} edges={:?}",
            round, n, edges
        );
    }
}

#[test]
fn test_differential_dense_random_graphs() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..150 {
        let n = rng.gen_range(4..=8u32);
        let mut edges = Vec::new();
        for u in 1..n {
            for v in (u + 1)..=n {
                if rng.gen_bool(0.9) {
                    edges.push((u, v, rng.gen_range(0..=30i64)));
                }
            }
        }

        let result = run_matching(n, &edges);
        assert_valid(n, &edges, &result);
        assert_eq!(result.total_weight, brute_force_weight(n, &edges));
    }
}

#[test]
fn test_differential_odd_cycles() {
    // Odd cycles of equal-cost edges force blossom handling: a C(2k+1)
    // matches k edges.
    for k in 1..=6u32 {
        let n = 2 * k + 1;
        let edges: Vec<(u32, u32, i64)> = (1..=n)
            .map(|u| (u, if u == n { 1 } else { u + 1 }, 3))
            .collect();

        let result = run_matching(n, &edges);
        assert_valid(n, &edges, &result);
        assert_eq!(result.total_weight, 3 * k as i64);
        assert!(result.stats.contractions > 0);
    }
}

#[test]
fn test_parallel_edges_prefer_heavier() {
    let edges = [(1, 2, 3), (1, 2, 9), (1, 2, 6)];
    let result = run_matching(2, &edges);
    assert_eq!(result.total_weight, 9);
    assert_eq!(result.mate[1], 2);
}

#[test]
fn test_self_loop_never_matches() {
    let edges = [(2, 2, 50), (1, 2, 1)];
    let result = run_matching(3, &edges);
    assert_valid(3, &edges, &result);
    assert_eq!(result.total_weight, 1);
}

#[test]
fn test_large_random_graph_is_consistent() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 60u32;
    let mut edges = Vec::new();
    for u in 1..n {
        for v in (u + 1)..=n {
            if rng.gen_bool(0.15) {
                edges.push((u, v, rng.gen_range(0..=1000i64)));
            }
        }
    }

    let first = run_matching(n, &edges);
    assert_valid(n, &edges, &first);

    // Idempotence: a fresh, equal instance must reach the same weight.
    let second = run_matching(n, &edges);
    assert_eq!(first.total_weight, second.total_weight);
}

/// Maximum-weight matching on a path, by the standard linear DP.
fn path_reference_weight(weights: &[i64]) -> i64 {
    let mut skip = 0i64;
    let mut take = 0i64;
    for &w in weights {
        let best = skip.max(take);
        take = skip + w;
        skip = best;
    }
    skip.max(take)
}

#[test]
fn test_path_graph_long_augmenting_chain() {
    // A long path exercises deep rematch chains without recursion limits.
    let n = 2001u32;
    let edges: Vec<(u32, u32, i64)> = (1..n).map(|u| (u, u + 1, 1)).collect();

    let result = run_matching(n, &edges);
    assert_valid(n, &edges, &result);
    // A path of 2001 vertices matches 1000 edges.
    assert_eq!(result.total_weight, 1000);
}

#[test]
fn test_path_graph_increasing_weights() {
    // Monotone weights make every later search steal partners from earlier
    // ones, flipping long alternating chains.
    let n = 1501u32;
    let weights: Vec<i64> = (1..n as i64).collect();
    let edges: Vec<(u32, u32, i64)> = (1..n)
        .map(|u| (u, u + 1, weights[(u - 1) as usize]))
        .collect();

    let result = run_matching(n, &edges);
    assert_valid(n, &edges, &result);
    assert_eq!(result.total_weight, path_reference_weight(&weights));
}

#[test]
fn test_empty_and_single_vertex() {
    let result = run_matching(1, &[]);
    assert_eq!(result.total_weight, 0);
    assert_eq!(result.mate, vec![0, 0]);

    let result = run_matching(5, &[]);
    assert_eq!(result.total_weight, 0);
    assert!(result.mate.iter().all(|&m| m == 0));
}
