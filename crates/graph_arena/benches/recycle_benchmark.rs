//! # Layout Pass Recycling Benchmark
//!
//! Measures one simulated layout pass (temporary nodes, edges and cells)
//! followed by `recycle_temporaries`, after the pools are warm.
//!
//! Run with: `cargo bench --package graph_arena --bench recycle_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_arena::{
    ArenaConfig, EdgeAttributes, GraphArena, NodeAttributes, NodeId, TemporaryNodeConfig,
};

fn build_specification(graph: &mut GraphArena, count: usize) -> Vec<NodeId> {
    (0..count)
        .map(|_| {
            graph
                .allocate_specification_node(&NodeAttributes::default())
                .unwrap()
        })
        .collect()
}

/// One pass: a dummy node and two edges per specification edge, plus the
/// adjacency and sweep cells layout would create.
fn layout_pass(graph: &mut GraphArena, nodes: &[NodeId]) {
    let config = TemporaryNodeConfig::default();
    let template = EdgeAttributes::default();
    let mut level = None;

    for pair in nodes.windows(2) {
        let dummy = graph.allocate_dummy_node(&config).unwrap();
        let upper = graph.allocate_temporary_edge(pair[0], dummy, &template).unwrap();
        let lower = graph.allocate_temporary_edge(dummy, pair[1], &template).unwrap();
        graph.push_successor(pair[0], upper).unwrap();
        graph.push_predecessor(dummy, upper).unwrap();
        graph.push_successor(dummy, lower).unwrap();
        graph.push_predecessor(pair[1], lower).unwrap();
        level = Some(graph.acquire_double_link(dummy, level).unwrap());
    }
}

fn bench_recycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_pass_and_recycle");

    for count in [100, 1_000, 10_000] {
        let mut graph = GraphArena::new(ArenaConfig::large());
        let nodes = build_specification(&mut graph, count);
        layout_pass(&mut graph, &nodes);
        graph.recycle_temporaries();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                layout_pass(&mut graph, &nodes);
                black_box(graph.recycle_temporaries())
            });
        });

        // Warm passes must not touch the arena.
        let allocations = graph.arena().allocation_count();
        layout_pass(&mut graph, &nodes);
        graph.recycle_temporaries();
        assert_eq!(graph.arena().allocation_count(), allocations);
    }

    group.finish();
}

fn bench_reset_all(c: &mut Criterion) {
    c.bench_function("populate_and_reset_all_10k", |b| {
        let mut graph = GraphArena::new(ArenaConfig::large());
        b.iter(|| {
            let nodes = build_specification(&mut graph, 10_000);
            layout_pass(&mut graph, &nodes);
            graph.reset_all();
        });
    });
}

criterion_group!(benches, bench_recycle, bench_reset_all);
criterion_main!(benches);
