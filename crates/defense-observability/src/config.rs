// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Observability configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Errors raised while interpreting logging settings
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Unknown log format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingOptions {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Console log format
    pub format: LogFormat,

    /// Base directory for run folders (file-logging feature only)
    pub log_dir: Option<PathBuf>,
}

impl LoggingOptions {
    /// Build options from the plain strings carried by the circuit configuration
    pub fn from_settings(level: &str, format: &str) -> Result<Self, ObservabilityError> {
        Ok(Self {
            level: level.to_string(),
            format: format.parse()?,
            log_dir: None,
        })
    }
}

impl Default for LoggingOptions {
    fn default() -> Self {
        LoggingOptions {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ObservabilityError::UnknownFormat(s.to_string())),
        }
    }
}
