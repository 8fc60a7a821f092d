// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Defense Circuit
//!
//! A declarative model of the mammalian defensive-behaviour circuit: superior
//! colliculus → thalamus/amygdala → hypothalamus → PAG → motor output. The
//! crate builds the population/connection graph; spiking simulation, decoding
//! and plotting belong to the simulation engine that consumes it.
//!
//! ## Quick Start
//!
//! ```rust
//! use defense_circuit::prelude::*;
//!
//! let model = assemble_defensive_circuit(&CircuitConfig::default())?;
//! assert_eq!(model.node_count(), 24);
//! assert_eq!(model.connections().len(), 34);
//!
//! let json = save_model_to_json(&model)?;
//! assert_eq!(load_model_from_json(&json)?, model);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`observability`** (default): logging initialisation and `--debug-<crate>` flags
//! - **`file-logging`**: timestamped JSON log files in addition to console output
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: defense-config, defense-network            │
//! │  (Parameters, populations, stimuli, connections)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Circuit: defense-topology                              │
//! │  (Regions, stimuli, sub-circuit wiring)                 │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Output: blueprint JSON for the simulation engine       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use defense_config as config;
pub use defense_network as network;

// Re-export circuit
pub use defense_topology as topology;

// Re-export infrastructure
#[cfg(feature = "observability")]
pub use defense_observability as observability;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::config::{load_config, CircuitConfig, OptoTarget};
    pub use crate::network::{
        load_model_from_file, load_model_from_json, save_model_to_file, save_model_to_json, CircuitError,
        Connection, Model, ModelBuilder, Population, Stimulus, StimulusKind, Subcircuit,
    };
    pub use crate::topology::{assemble_defensive_circuit, TopologyError};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let model = assemble_defensive_circuit(&CircuitConfig::default()).unwrap();
        assert_eq!(model.stats().stimuli, 6);
    }
}
