// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests against the shipped `defense_circuit.toml`

use defense_config::{load_config, validate_config, CircuitConfig, ConfigError, OptoTarget, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::tempdir;

fn shipped_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(CONFIG_FILE_NAME)
}

// ============================================================================
// Shipped file
// ============================================================================

#[test]
fn test_shipped_config_matches_defaults() {
    let content = std::fs::read_to_string(shipped_config_path()).expect("Failed to read shipped config");
    let config: CircuitConfig = toml::from_str(&content).expect("Failed to parse shipped config");

    assert_eq!(config, CircuitConfig::default());
    validate_config(&config).expect("Shipped config must validate");
}

#[test]
fn test_shipped_config_with_cli_overrides() {
    let mut cli_args = HashMap::new();
    cli_args.insert("enable_opto_stim".to_string(), "true".to_string());
    cli_args.insert("opto_target".to_string(), "vmh".to_string());
    cli_args.insert("noci_target".to_string(), "cea".to_string());

    let config = load_config(Some(&shipped_config_path()), Some(&cli_args)).expect("Failed to load config");

    assert!(config.manipulations.optogenetic.enabled);
    assert_eq!(config.manipulations.optogenetic.target, OptoTarget::Vmh);
    assert!(!config.manipulations.nociceptive.enabled);
    assert_eq!(config.manipulations.nociceptive.target, "cea");
}

#[test]
fn test_nociceptive_target_from_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[manipulations.nociceptive]\nenabled = true\ntarget = \"lh\"\n")
        .expect("Failed to write config");

    let config = load_config(Some(&path), None).expect("Failed to load config");
    assert!(config.manipulations.nociceptive.enabled);
    assert_eq!(config.manipulations.nociceptive.target, "lh");
    assert_eq!(config.manipulations.nociceptive.amplitude, 1.0);

    let text = toml::to_string(&config.manipulations.nociceptive).expect("Failed to serialize");
    assert!(text.contains("target = \"lh\""));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_written_config_reloads_identically() {
    let mut config = CircuitConfig::default();
    config.gains.ahn_recurrent = 0.75;
    config.inhibition.medulla_to_motor = -2500.0;
    config.manipulations.nociceptive.enabled = true;

    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    let text = toml::to_string_pretty(&config).expect("Failed to serialize config");
    std::fs::write(&path, text).expect("Failed to write config");

    let reloaded = load_config(Some(&path), None).expect("Failed to reload config");
    assert_eq!(reloaded, config);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = load_config(Some(&dir.path().join("absent.toml")), None);
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
fn test_every_problem_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "[stimulus]\nexp_rate = 0.05\n[synapses]\ntau_vmh = -0.1\n[logging]\nlevel = \"loud\"\n",
    )
    .expect("Failed to write config");

    match load_config(Some(&path), None) {
        Err(ConfigError::ValidationError(message)) => {
            assert!(message.contains("stimulus.exp_rate"));
            assert!(message.contains("synapses.tau_vmh"));
            assert!(message.contains("logging.level"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_unknown_opto_target_in_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[manipulations.optogenetic]\ntarget = \"lh\"\n").expect("Failed to write config");

    let result = load_config(Some(&path), None);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
