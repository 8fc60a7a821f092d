// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Circuit Export Tool

Assembles the defensive circuit from configuration and writes its blueprint
JSON for a simulation engine.

Usage:
  cargo run --bin export_circuit -- [config.toml] <output.json> [--set key=value]... [--debug-<crate>]

Without a config argument the usual search applies (`DEFENSE_CONFIG_PATH`,
then `defense_circuit.toml` in the working directory and its parents); when
nothing is found the built-in defaults are used. A `DEFENSE_CONFIG_PATH`
naming a missing file is an error. `--set` accepts the CLI override keys of
`defense-config` (exp_rate, alpha, log_level, enable_opto_stim, opto_target,
enable_noci_stim, noci_target). With the `file-logging`
feature, `DEFENSE_LOG_DIR` selects where JSON log run folders are written.

Example:
  cargo run --bin export_circuit -- defense_circuit.toml circuit.json --set enable_opto_stim=true
*/

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use defense_circuit::config::loader::CONFIG_PATH_ENV;
use defense_circuit::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, validate_config,
    CircuitConfig, ConfigError,
};
use defense_circuit::network::save_model_to_file;
use defense_circuit::observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingOptions};
use defense_circuit::topology::assemble_defensive_circuit;
use tracing::info;

/// Base directory for JSON log run folders (`file-logging` builds only)
const LOG_DIR_ENV: &str = "DEFENSE_LOG_DIR";

struct Arguments {
    config_path: Option<PathBuf>,
    output_path: PathBuf,
    overrides: HashMap<String, String>,
}

fn parse_arguments(args: &[String]) -> Result<Arguments> {
    let mut positional = Vec::new();
    let mut overrides = HashMap::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--set" {
            let pair = iter.next().context("--set requires a key=value argument")?;
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("Invalid override '{}', expected key=value", pair))?;
            overrides.insert(key.trim().to_string(), value.trim().to_string());
        } else if arg.starts_with("--debug-") {
            // consumed by parse_debug_flags
        } else if arg.starts_with("--") {
            bail!("Unknown option '{}'", arg);
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    match positional.len() {
        1 => Ok(Arguments {
            config_path: None,
            output_path: positional.remove(0),
            overrides,
        }),
        2 => {
            let output_path = positional.remove(1);
            Ok(Arguments {
                config_path: Some(positional.remove(0)),
                output_path,
                overrides,
            })
        }
        _ => bail!("Expected [config.toml] <output.json>"),
    }
}

fn resolve_config(arguments: &Arguments) -> Result<CircuitConfig> {
    let overrides = Some(&arguments.overrides);
    if let Some(path) = &arguments.config_path {
        return load_config(Some(path), overrides)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), overrides)
            .with_context(|| format!("Failed to load config {}", path.display())),
        // Only an unsuccessful search falls back; an explicit path must exist
        Err(ConfigError::FileNotFound(_)) if env::var_os(CONFIG_PATH_ENV).is_none() => {
            let mut config = CircuitConfig::default();
            apply_environment_overrides(&mut config)?;
            apply_cli_overrides(&mut config, &arguments.overrides)?;
            validate_config(&config)?;
            Ok(config)
        }
        Err(e) => Err(e).context("Failed to locate circuit configuration"),
    }
}

fn usage(program: &str) {
    eprintln!(
        "Usage: {} [config.toml] <output.json> [--set key=value]... [--debug-<crate>]",
        program
    );
    eprintln!();
    eprintln!("{}", debug_flags_help());
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("export_circuit");

    let arguments = match parse_arguments(args.get(1..).unwrap_or_default()) {
        Ok(arguments) => arguments,
        Err(e) => {
            eprintln!("Error: {}", e);
            usage(program);
            process::exit(1);
        }
    };

    let config = resolve_config(&arguments)?;

    let mut options = LoggingOptions::from_settings(&config.logging.level, &config.logging.format)?;
    options.log_dir = env::var_os(LOG_DIR_ENV).map(PathBuf::from);
    let logging = init_logging(&parse_debug_flags(), &options)?;
    if let Some(dir) = logging.log_dir() {
        info!(target: "defense-circuit", "Writing logs to {}", dir.display());
    }

    info!(
        target: "defense-circuit",
        "Exporting circuit (exp_rate {}, nociceptive {} -> {}, optogenetic {} -> {})",
        config.stimulus.exp_rate,
        config.manipulations.nociceptive.enabled,
        config.manipulations.nociceptive.target,
        config.manipulations.optogenetic.enabled,
        config.manipulations.optogenetic.target
    );

    let model = assemble_defensive_circuit(&config).context("Circuit assembly failed")?;
    write_blueprint(&model, &arguments.output_path)?;

    let stats = model.stats();
    println!(
        "Wrote {}: {} populations, {} stimuli, {} connections ({} neurons)",
        arguments.output_path.display(),
        stats.populations,
        stats.stimuli,
        stats.connections,
        stats.total_neurons
    );
    Ok(())
}

fn write_blueprint(model: &defense_circuit::network::Model, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    save_model_to_file(model, path).with_context(|| format!("Failed to write {}", path.display()))
}
