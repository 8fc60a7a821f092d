// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end: configuration file → assembled circuit → blueprint → reload

use std::path::{Path, PathBuf};

use defense_circuit::config::CONFIG_FILE_NAME;
use defense_circuit::network::{Source, Subcircuit, Target};
use defense_circuit::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join(CONFIG_FILE_NAME);
    std::fs::write(&path, body).expect("Failed to write config");
    path
}

#[test]
fn test_config_file_to_blueprint_and_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = write_config(dir.path(), "[stimulus]\nexp_rate = 0.5\n");
    let config = load_config(Some(&config_path), None).expect("Failed to load config");

    let model = assemble_defensive_circuit(&config).expect("Failed to assemble circuit");
    let blueprint_path = dir.path().join("circuit.json");
    save_model_to_file(&model, &blueprint_path).expect("Failed to save blueprint");

    let reloaded = load_model_from_file(&blueprint_path).expect("Failed to load blueprint");
    assert_eq!(reloaded, model);

    let stats = reloaded.stats();
    assert_eq!(stats.populations, 18);
    assert_eq!(stats.stimuli, 6);
    assert_eq!(stats.connections, 34);
}

#[test]
fn test_blueprint_is_plain_json() {
    let model = assemble_defensive_circuit(&CircuitConfig::default()).expect("Failed to assemble circuit");
    let json = save_model_to_json(&model).expect("Failed to serialize");

    let value: serde_json::Value = serde_json::from_str(&json).expect("Blueprint must be valid JSON");
    assert_eq!(value["populations"].as_array().map(Vec::len), Some(18));
    assert_eq!(value["connections"].as_array().map(Vec::len), Some(34));
    assert!(value["signatures"]["model"].is_string());
}

#[test]
fn test_optogenetic_variant_from_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = write_config(
        dir.path(),
        r#"
[manipulations.optogenetic]
enabled = true
target = "vmh"
amplitude = 0.8
pulse = { onset = 20.0, duration = 2.0 }
"#,
    );
    let config = load_config(Some(&config_path), None).expect("Failed to load config");
    assert_eq!(config.manipulations.optogenetic.target, OptoTarget::Vmh);

    let model = assemble_defensive_circuit(&config).expect("Failed to assemble circuit");
    assert_eq!(model.connections().len(), 35);

    let opto = model
        .connections()
        .iter()
        .find(|c| c.source == Source::stimulus("opto_stim"))
        .expect("opto connection present");
    assert_eq!(opto.target, Target::population("vmh"));
    assert_eq!(opto.synapse, Some(config.synapses.tau_vmh));
    assert_eq!(opto.subcircuit, Some(Subcircuit::Experiment));

    let stim = model.stimulus("opto_stim").expect("opto stimulus declared");
    assert_eq!(
        stim.kind,
        StimulusKind::Pulse {
            amplitude: 0.8,
            onset: 20.0,
            duration: 2.0
        }
    );
    assert_eq!(stim.evaluate(21.0), 0.8);
    assert_eq!(stim.evaluate(25.0), 0.0);

    let json = save_model_to_json(&model).expect("Failed to serialize");
    assert_eq!(load_model_from_json(&json).expect("Failed to reload"), model);
}

#[test]
fn test_invalid_file_never_reaches_assembly() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = write_config(dir.path(), "[stimulus]\nexp_rate = 1.5\n");
    assert!(load_config(Some(&config_path), None).is_err());

    let mut config = CircuitConfig::default();
    config.stimulus.exp_rate = 1.5;
    assert!(matches!(
        assemble_defensive_circuit(&config),
        Err(TopologyError::Config(_))
    ));
}
