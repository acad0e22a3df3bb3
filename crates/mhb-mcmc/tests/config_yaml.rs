use std::fs;
use std::path::PathBuf;

use mhb_mcmc::RunConfig;
use tempfile::tempdir;

#[test]
fn empty_document_uses_defaults() {
    let config = RunConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, RunConfig::default());
    assert_eq!(config.sweeps, 1000);
    assert_eq!(config.thinning, 1);
    assert_eq!(config.output.trace_file, PathBuf::from("trace.csv"));
}

#[test]
fn fields_override_defaults() {
    let yaml = r#"
sweeps: 200
burn_in: 50
thinning: 4
seed_policy:
  master_seed: 99
  label: pilot
output:
  run_directory: out/pilot
"#;
    let config = RunConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.sweeps, 200);
    assert_eq!(config.burn_in, 50);
    assert_eq!(config.thinning, 4);
    assert_eq!(config.seed_policy.master_seed, 99);
    assert_eq!(config.seed_policy.label.as_deref(), Some("pilot"));
    assert_eq!(config.output.run_directory, Some(PathBuf::from("out/pilot")));
    assert_eq!(config.output.manifest_file, PathBuf::from("manifest.json"));
}

#[test]
fn invalid_documents_are_reported() {
    let err = RunConfig::from_yaml_str("sweeps: many").unwrap_err();
    assert_eq!(err.code(), "config-parse");

    let err = RunConfig::from_yaml_str("thinning: 0").unwrap_err();
    assert_eq!(err.code(), "zero-thinning");
    assert!(err.to_string().starts_with("config error"));
}

#[test]
fn files_are_loaded_with_path_context() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, "sweeps: 12\n").unwrap();
    assert_eq!(RunConfig::from_yaml_path(&path).unwrap().sweeps, 12);

    fs::write(&path, "sweeps: [1, 2]\n").unwrap();
    let err = RunConfig::from_yaml_path(&path).unwrap_err();
    assert_eq!(err.code(), "config-parse");
    assert!(err.info().context.contains_key("path"));

    let err = RunConfig::from_yaml_path(&dir.path().join("missing.yaml")).unwrap_err();
    assert_eq!(err.code(), "config-read");
}
