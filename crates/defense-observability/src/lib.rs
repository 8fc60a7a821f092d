// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # defense-observability
//!
//! Logging setup shared by every crate of the defensive-behaviour circuit,
//! with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: additionally write JSON logs into a timestamped run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Tracing targets used across the workspace, one per crate
pub const KNOWN_CRATES: &[&str] = &[
    "defense-config",
    "defense-network",
    "defense-topology",
    "defense-circuit",
];
