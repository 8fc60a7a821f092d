// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for circuit assembly

use defense_config::ConfigError;
use defense_network::CircuitError;

/// Result type for circuit assembly
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Assembly fails either on the parameters or on a declaration
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid circuit parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("Circuit declaration failed: {0}")]
    Circuit(#[from] CircuitError),
}
