// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{CircuitConfig, ConfigError, ConfigResult, OptoTarget, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "DEFENSE_CONFIG_PATH";

/// Find the circuit configuration file
///
/// Search order:
/// 1. `DEFENSE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./defense_circuit.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        debug!(target: "defense-config", "Found {} by search", path.display());
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, carries an
/// unparseable override, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CircuitConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CircuitConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    crate::validate_config(&config)?;

    info!(
        target: "defense-config",
        "Loaded configuration from {} (exp_rate {})",
        config_file.display(),
        config.stimulus.exp_rate
    );
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `DEFENSE_EXP_RATE` -> `stimulus.exp_rate`
/// - `DEFENSE_LOG_LEVEL` -> `logging.level`
/// - `DEFENSE_ENABLE_OPTO_STIM` -> `manipulations.optogenetic.enabled`
/// - `DEFENSE_OPTO_TARGET` -> `manipulations.optogenetic.target`
/// - `DEFENSE_ENABLE_NOCI_STIM` -> `manipulations.nociceptive.enabled`
/// - `DEFENSE_NOCI_TARGET` -> `manipulations.nociceptive.target`
pub fn apply_environment_overrides(config: &mut CircuitConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("DEFENSE_EXP_RATE") {
        config.stimulus.exp_rate = parse_f64("DEFENSE_EXP_RATE", &value)?;
        debug!(target: "defense-config", "DEFENSE_EXP_RATE override: {}", config.stimulus.exp_rate);
    }
    if let Ok(value) = env::var("DEFENSE_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("DEFENSE_ENABLE_OPTO_STIM") {
        config.manipulations.optogenetic.enabled = parse_flag(&value);
    }
    if let Ok(value) = env::var("DEFENSE_OPTO_TARGET") {
        config.manipulations.optogenetic.target = value.parse::<OptoTarget>()?;
    }
    if let Ok(value) = env::var("DEFENSE_ENABLE_NOCI_STIM") {
        config.manipulations.nociceptive.enabled = parse_flag(&value);
    }
    if let Ok(value) = env::var("DEFENSE_NOCI_TARGET") {
        config.manipulations.nociceptive.target = value.trim().to_lowercase();
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"exp_rate": "0.7", "opto_target": "vmh"}`)
pub fn apply_cli_overrides(
    config: &mut CircuitConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if !cli_args.is_empty() {
        debug!(target: "defense-config", "Applying {} CLI override(s)", cli_args.len());
    }
    if let Some(value) = cli_args.get("exp_rate") {
        config.stimulus.exp_rate = parse_f64("exp_rate", value)?;
    }
    if let Some(value) = cli_args.get("alpha") {
        config.functions.alpha = parse_f64("alpha", value)?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("enable_opto_stim") {
        config.manipulations.optogenetic.enabled = parse_flag(value);
    }
    if let Some(value) = cli_args.get("opto_target") {
        config.manipulations.optogenetic.target = value.parse::<OptoTarget>()?;
    }
    if let Some(value) = cli_args.get("enable_noci_stim") {
        config.manipulations.nociceptive.enabled = parse_flag(value);
    }
    if let Some(value) = cli_args.get("noci_target") {
        config.manipulations.nociceptive.target = value.trim().to_lowercase();
    }
    Ok(())
}

fn parse_f64(key: &str, value: &str) -> ConfigResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidValue(format!("{} = '{}' is not a number", key, value)))
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value == "true" || value == "1" || value == "yes"
}
