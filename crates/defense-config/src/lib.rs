// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Defensive Circuit Configuration
//!
//! Type-safe parameter loader for the SC → PAG defensive-behaviour circuit:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//! - Range validation of every tunable gain, time constant and stimulus
//!
//! ## Usage
//!
//! ```rust,no_run
//! use defense_config::{load_config, CircuitConfig};
//!
//! let config = load_config(None, None).expect("Failed to load config");
//!
//! println!("Expansion rate: {}", config.stimulus.exp_rate);
//! println!("AHN self-excitation: {}", config.gains.ahn_recurrent);
//! ```
//!
//! Every connection annotated as a modelling assumption (AHN self-excitation,
//! DMH scaling gains, BMA → AHN) is a named field here, so experiment
//! variants are configuration rather than code edits.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name searched by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "defense_circuit.toml";

pub mod loader;

pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};

pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
