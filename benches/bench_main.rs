use criterion::{Criterion, criterion_group, criterion_main};
use geo::Point;
use std::hint::black_box;

use roadshed::prelude::*;

struct FlatSampler;

impl ElevationSampler for FlatSampler {
    fn sample_elevation(&self, _point: Point<f64>) -> Result<f64, Error> {
        Ok(0.0)
    }
}

/// A single converging chain of `n` drains ending in one termination
fn build_chain(n: usize) -> DrainageGraph {
    let mut graph = DrainageGraph::new();
    let nodes = (0..n)
        .map(|i| {
            let mut node = GraphNode::new(Point::new(i as f64, 0.0), NodeKind::Drain, 100.0);
            node.child = Some(Point::new((i + 1) as f64, 0.0));
            node.distance_to_child = Some(1.0);
            node.directly_connected
                .indices
                .insert("unpaved".to_string(), vec![i as u64]);
            node.directly_connected.length.insert("unpaved".to_string(), 25.0);
            node.directly_connected.area.insert("unpaved".to_string(), 100.0);
            node
        })
        .collect();
    graph.add_nodes(nodes, &FlatSampler).unwrap();
    graph
}

fn road_types() -> Vec<(String, RoadTypeParams)> {
    vec![(
        "unpaved".to_string(),
        RoadTypeParams {
            runoff_coefficient: 0.5,
            erosion_rate: 1.2,
        },
    )]
}

fn bench_accumulation(c: &mut Criterion) {
    let graph = build_chain(10_000);

    c.bench_function("accumulate_10k_chain", |b| {
        b.iter(|| {
            let mut run_graph = graph.clone();
            let mut engine =
                FlowEngine::prepare(50.0, road_types().into_iter().collect()).unwrap();
            engine.run(black_box(&mut run_graph)).unwrap();
        });
    });

    c.bench_function("toposort_10k_chain", |b| {
        b.iter(|| black_box(&graph).topological_order().unwrap());
    });
}

criterion_group!(benches, bench_accumulation);
criterion_main!(benches);
