use criterion::{criterion_group, criterion_main, Criterion};

use mhb_graph::{ArgumentMaker, Bond, Model, Normal, ParameterNode, RunContext};

fn hierarchical_model() -> (Model, Vec<mhb_core::NodeId>) {
    let groups = 8;
    let per_group = 25;
    let data: Vec<f64> = (0..groups * per_group)
        .map(|i| (i % groups) as f64 * 0.5 + ((i * 7919) % 13) as f64 / 13.0 - 0.5)
        .collect();
    let mapping: Vec<usize> = (0..groups * per_group).map(|i| i % groups).collect();

    let mut model = Model::new();
    let y = model
        .add_node(ParameterNode::constant("y", data).unwrap())
        .unwrap();
    let mu = model
        .add_node(ParameterNode::new("mu", vec![0.0; groups], vec![0.2; groups]).unwrap())
        .unwrap();
    let log_sigma = model
        .add_node(ParameterNode::new("log_sigma", vec![0.0], vec![0.1]).unwrap())
        .unwrap();
    model
        .add_bond(Bond::new(
            vec![y, mu, log_sigma],
            vec![
                ArgumentMaker::identity(0),
                ArgumentMaker::group(1, mapping.clone()),
                ArgumentMaker::group(2, vec![0; mapping.len()]),
            ],
            Normal::with_log_sigma(),
        ))
        .unwrap();
    (model, vec![y, mu, log_sigma])
}

fn bench_sweep(c: &mut Criterion) {
    let (mut model, nodes) = hierarchical_model();
    let mut ctx = RunContext::from_seed(42);

    c.bench_function("hierarchical_normal_sweep", |b| {
        b.iter(|| {
            for &node in &nodes {
                let _ = model.run_update_sweep(node, &mut ctx).unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);
