// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types and error handling for network construction.

Every error is raised while declaring populations, stimuli or connections;
nothing here can fail once a [`Model`](crate::Model) has been built.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for network construction
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Errors that can occur while building or (de)serializing a network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CircuitError {
    #[error("Unknown population: {0}")]
    UnknownPopulation(String),

    #[error("Unknown stimulus: {0}")]
    UnknownStimulus(String),

    #[error("Name already declared: {0}")]
    DuplicateName(String),

    #[error("Dimension mismatch on {connection}: expected {expected}, got {actual}")]
    DimensionMismatch {
        connection: String,
        expected: usize,
        actual: usize,
    },

    #[error("Raw weight length mismatch for {population}.neurons: expected {expected} rows, got {actual}")]
    RawWeightLength {
        population: String,
        expected: usize,
        actual: usize,
    },

    #[error("Component {index} out of range for {population} ({dimensions} dimensions)")]
    ComponentOutOfRange {
        population: String,
        index: usize,
        dimensions: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for CircuitError {
    fn from(err: serde_json::Error) -> Self {
        CircuitError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CircuitError {
    fn from(err: std::io::Error) -> Self {
        CircuitError::Io(err.to_string())
    }
}

/// Position of a connection in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub usize);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection#{}", self.0)
    }
}

/// Reject NaN and infinities with a uniform message
pub(crate) fn ensure_finite(what: &str, value: f64) -> CircuitResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CircuitError::InvalidParameter(format!(
            "{} must be finite, got {}",
            what, value
        )))
    }
}
