use mhb_graph::{ArgumentMaker, Bond, Model, Normal, ParameterNode, StandardNormal};
use mhb_mcmc::{run, RunConfig};

fn regression_model() -> Model {
    let y = vec![0.9, 1.4, 1.1, 0.7, 1.3, 1.0];
    let mut model = Model::new();
    let data = model
        .add_node(ParameterNode::constant("y", y.clone()).unwrap())
        .unwrap();
    let mu = model
        .add_node(ParameterNode::new("mu", vec![0.0], vec![0.5]).unwrap())
        .unwrap();
    let log_sigma = model
        .add_node(ParameterNode::new("log_sigma", vec![0.0], vec![0.3]).unwrap())
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
        .add_bond(Bond::new(
            vec![log_sigma],
            vec![ArgumentMaker::identity(0)],
            StandardNormal,
        ))
        .unwrap();
    model
}

fn deterministic_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.sweeps = 50;
    config.burn_in = 10;
    config.thinning = 5;
    config.seed_policy.master_seed = 2024;
    config.output.run_directory = None;
    config
}

#[test]
fn repeated_runs_with_same_seed_match() {
    let config = deterministic_config();
    let summary_a = run(&mut regression_model(), &config).unwrap();
    let summary_b = run(&mut regression_model(), &config).unwrap();
    assert_eq!(summary_a, summary_b);
}

#[test]
fn different_seeds_diverge() {
    let config = deterministic_config();
    let mut other = deterministic_config();
    other.seed_policy.master_seed = 2025;
    let summary_a = run(&mut regression_model(), &config).unwrap();
    let summary_b = run(&mut regression_model(), &other).unwrap();
    assert_ne!(summary_a.final_values, summary_b.final_values);
}

#[test]
fn summary_reports_post_burn_in_acceptance_and_thinned_samples() {
    let config = deterministic_config();
    let mut model = regression_model();
    let summary = run(&mut model, &config).unwrap();

    assert_eq!(summary.sweeps, 50);
    let names: Vec<_> = summary.acceptance.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["mu", "log_sigma"]);
    for report in &summary.acceptance {
        assert_eq!(report.proposals, 50);
        assert!(report.counts[0] <= 50);
        assert!((report.rates[0] - report.counts[0] as f64 / 50.0).abs() < 1e-12);
    }
    // Passes 0, 5, ..., 45 for two sampled nodes.
    assert_eq!(summary.samples.len(), 20);
    assert!(summary.samples.iter().all(|s| s.sweep % 5 == 0));
    assert!(!summary.final_values.contains_key("y"));
    assert!((summary.log_posterior - model.log_posterior().unwrap()).abs() < 1e-9);
}

#[test]
fn zero_thinning_is_rejected_before_sampling() {
    let mut config = deterministic_config();
    config.thinning = 0;
    let mut model = regression_model();
    let err = run(&mut model, &config).unwrap_err();
    assert_eq!(err.code(), "zero-thinning");
    let mu = model.node_id("mu").unwrap();
    assert_eq!(model.node(mu).unwrap().value(), &[0.0]);
}

#[test]
fn model_without_sampled_nodes_runs_and_stays_put() {
    let mut model = Model::new();
    let c = model
        .add_node(ParameterNode::constant("c", vec![1.0, 2.0]).unwrap())
        .unwrap();
    model
        .add_bond(Bond::new(vec![c], vec![ArgumentMaker::identity(0)], StandardNormal))
        .unwrap();
    let summary = run(&mut model, &deterministic_config()).unwrap();
    assert!(summary.acceptance.is_empty());
    assert!(summary.samples.is_empty());
    assert_eq!(model.node(c).unwrap().value(), &[1.0, 2.0]);
}
