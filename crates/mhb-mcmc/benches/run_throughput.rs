use criterion::{criterion_group, criterion_main, Criterion};

use mhb_graph::{ArgumentMaker, Bond, Model, Normal, ParameterNode};
use mhb_mcmc::{run, RunConfig};

fn sample_model() -> Model {
    let y: Vec<f64> = (0..64).map(|i| ((i * 37) % 17) as f64 / 8.0).collect();
    let mut model = Model::new();
    let data = model
        .add_node(ParameterNode::constant("y", y.clone()).unwrap())
        .unwrap();
    let mu = model
        .add_node(ParameterNode::new("mu", vec![0.0], vec![0.3]).unwrap())
        .unwrap();
    let log_sigma = model
        .add_node(ParameterNode::new("log_sigma", vec![0.0], vec![0.2]).unwrap())
        .unwrap();
    model
        .add_bond(Bond::new(
            vec![data, mu, log_sigma],
            vec![
                ArgumentMaker::identity(0),
                ArgumentMaker::group(1, vec![0; y.len()]),
                ArgumentMaker::group(2, vec![0; y.len()]),
            ],
            Normal::with_log_sigma(),
        ))
        .unwrap();
    model
}

fn bench_run(c: &mut Criterion) {
    let mut config = RunConfig::default();
    config.sweeps = 100;
    config.output.run_directory = None;

    c.bench_function("mcmc_run", |b| {
        b.iter(|| {
            let _ = run(&mut sample_model(), &config).unwrap();
        })
    });
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
