use mhb_core::NodeId;
use mhb_graph::{ArgumentMaker, Bond, Flat, Model, ModelConfig, ParameterNode, StandardNormal};

#[test]
fn step_sizes_must_match_values() {
    let err = ParameterNode::new("x", vec![0.0, 1.0], vec![1.0]).unwrap_err();
    assert_eq!(err.code(), "step-size-length");
    assert!(err.to_string().starts_with("config error"));
}

#[test]
fn invalid_node_inputs_are_rejected() {
    assert_eq!(
        ParameterNode::new("x", vec![], vec![]).unwrap_err().code(),
        "empty-node"
    );
    assert_eq!(
        ParameterNode::new("x", vec![f64::NAN], vec![1.0])
            .unwrap_err()
            .code(),
        "non-finite-value"
    );
    assert_eq!(
        ParameterNode::new("x", vec![0.0], vec![-1.0])
            .unwrap_err()
            .code(),
        "invalid-step-size"
    );
}

#[test]
fn bonds_register_back_references_in_order() {
    let mut model = Model::new();
    let a = model
        .add_node(ParameterNode::new("a", vec![0.0], vec![1.0]).unwrap())
        .unwrap();
    let b = model
        .add_node(ParameterNode::new("b", vec![0.0, 0.0], vec![1.0, 1.0]).unwrap())
        .unwrap();
    let first = model
        .add_bond(Bond::new(vec![a, b], vec![ArgumentMaker::identity(1)], Flat))
        .unwrap();
    let second = model
        .add_bond(Bond::new(vec![b], vec![ArgumentMaker::identity(0)], Flat))
        .unwrap();

    let links_b = model.node(b).unwrap().bonds();
    assert_eq!(links_b.len(), 2);
    assert_eq!((links_b[0].bond, links_b[0].whatami), (first, 1));
    assert_eq!((links_b[1].bond, links_b[1].whatami), (second, 0));
    assert_eq!(model.node(a).unwrap().bonds()[0].whatami, 0);
    assert_eq!(model.node_id("b"), Some(b));
    assert_eq!(model.node_ids().collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn bond_cap_is_enforced_without_partial_registration() {
    let mut model = Model::with_config(ModelConfig {
        max_bonds_per_node: 1,
    });
    let a = model
        .add_node(ParameterNode::new("a", vec![0.0], vec![1.0]).unwrap())
        .unwrap();
    let b = model
        .add_node(ParameterNode::new("b", vec![0.0], vec![1.0]).unwrap())
        .unwrap();
    model
        .add_bond(Bond::new(vec![b], vec![ArgumentMaker::identity(0)], Flat))
        .unwrap();

    let err = model
        .add_bond(Bond::new(vec![a, b], vec![ArgumentMaker::identity(0)], Flat))
        .unwrap_err();
    assert_eq!(err.code(), "bond-cap");
    assert!(model.node(a).unwrap().bonds().is_empty());
    assert_eq!(model.bonds().len(), 1);
}

#[test]
fn malformed_bonds_are_config_errors() {
    let mut model = Model::new();
    let a = model
        .add_node(ParameterNode::new("a", vec![0.0], vec![1.0]).unwrap())
        .unwrap();

    let err = model
        .add_bond(Bond::new(vec![], vec![], Flat))
        .unwrap_err();
    assert_eq!(err.code(), "empty-bond");

    let err = model
        .add_bond(Bond::new(vec![a, a], vec![ArgumentMaker::identity(0)], Flat))
        .unwrap_err();
    assert_eq!(err.code(), "duplicate-attachment");

    let err = model
        .add_bond(Bond::new(vec![a], vec![ArgumentMaker::identity(2)], Flat))
        .unwrap_err();
    assert_eq!(err.code(), "maker-source");

    let err = model
        .add_bond(Bond::new(
            vec![NodeId::from_raw(9)],
            vec![ArgumentMaker::identity(0)],
            Flat,
        ))
        .unwrap_err();
    assert_eq!(err.code(), "node-id");
    assert!(model.bonds().is_empty());
}

#[test]
fn duplicate_node_names_are_rejected() {
    let mut model = Model::new();
    model
        .add_node(ParameterNode::new("a", vec![0.0], vec![1.0]).unwrap())
        .unwrap();
    let err = model
        .add_node(ParameterNode::constant("a", vec![1.0]).unwrap())
        .unwrap_err();
    assert_eq!(err.code(), "duplicate-node");
}

#[test]
fn log_posterior_sums_bond_values() {
    let mut model = Model::new();
    let a = model
        .add_node(ParameterNode::new("a", vec![0.0, 1.0], vec![1.0, 1.0]).unwrap())
        .unwrap();
    model
        .add_bond(Bond::new(vec![a], vec![ArgumentMaker::identity(0)], StandardNormal))
        .unwrap();
    model
        .add_bond(Bond::new(vec![a], vec![ArgumentMaker::identity(0)], Flat))
        .unwrap();
    let expected = mhb_graph::normal_logpdf(0.0, 0.0, 1.0) + mhb_graph::normal_logpdf(1.0, 0.0, 1.0);
    assert!((model.log_posterior().unwrap() - expected).abs() < 1e-12);
}

#[test]
fn default_config_allows_one_hundred_bonds() {
    assert_eq!(ModelConfig::default().max_bonds_per_node, 100);
    let parsed: ModelConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, ModelConfig::default());
}
