// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `defense_circuit.toml`. Defaults reproduce the published circuit exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitConfig {
    pub stimulus: StimulusConfig,
    pub functions: FunctionConfig,
    pub synapses: SynapseConfig,
    pub gains: GainConfig,
    pub inhibition: InhibitionConfig,
    pub tonic: TonicConfig,
    pub manipulations: ManipulationConfig,
    pub logging: LoggingConfig,
}

/// Looming-stimulus (expansion rate) square wave
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Peak expansion rate, documented range 0.1 - 0.9
    pub exp_rate: f64,
    pub frequency_hz: f64,
    pub duty: f64,
    /// Time of the first rising edge
    pub onset: f64,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            exp_rate: 0.5,
            frequency_hz: 0.1,
            duty: 0.5,
            onset: 1.0,
        }
    }
}

/// Constants of the connection functions
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FunctionConfig {
    /// Peak of the threat-imminence parabola
    pub alpha: f64,
    pub b_desired: f64,
    pub a_desired: f64,
    pub actual_synapse: f64,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            alpha: 0.51,
            b_desired: 1.0,
            a_desired: 0.0001,
            actual_synapse: 0.15,
        }
    }
}

/// Synaptic time constants (seconds) of the competitive integrators
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseConfig {
    pub tau_dpag: f64,
    pub tau_vmh: f64,
    pub tau_ahn: f64,
    /// Filter on the expansion-rate input into SC
    pub stimulus_input: f64,
}

impl Default for SynapseConfig {
    fn default() -> Self {
        Self {
            tau_dpag: 0.1,
            tau_vmh: 0.1,
            tau_ahn: 0.01,
            stimulus_input: 0.15,
        }
    }
}

/// Scalar transforms on decoded-signal connections
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GainConfig {
    /// Assumption: direct BMA → AHN link
    pub bma_ahn: f64,
    /// Assumption: AHN projects back onto itself
    pub ahn_recurrent: f64,
    pub vmh_dpag: f64,
    pub dpag_vmh: f64,
    pub dpag_vpag_gaba: f64,
    /// Assumption: VMH information scaled on projection to DMH
    pub vmh_dmh: f64,
    /// Assumption: AHN information scaled on projection to DMH
    pub ahn_dmh: f64,
    pub pbn_cea: f64,
    /// Assumption: expansion rate drives PVN directly
    pub expansion_pvn: f64,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            bma_ahn: 1.0,
            ahn_recurrent: 0.9,
            vmh_dpag: 0.9,
            dpag_vmh: 0.9,
            dpag_vpag_gaba: 0.25,
            vmh_dmh: 0.2,
            ahn_dmh: -0.1,
            pbn_cea: 0.1,
            expansion_pvn: 1.0,
        }
    }
}

/// Per-unit weights on raw-neuron (population-wide) connections
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InhibitionConfig {
    pub vpag_gaba_to_vpag_glu: f64,
    pub cea_to_peri_pvn: f64,
    pub cea_to_vpag_gaba: f64,
    pub peri_pvn_to_pvn: f64,
    pub bnst_to_pvn: f64,
    pub medulla_to_motor: f64,
}

impl Default for InhibitionConfig {
    fn default() -> Self {
        Self {
            vpag_gaba_to_vpag_glu: -10.0,
            cea_to_peri_pvn: -10.0,
            cea_to_vpag_gaba: -10.0 * 0.1,
            peri_pvn_to_pvn: -1.0,
            bnst_to_pvn: -1.0 * 1.3,
            medulla_to_motor: -5000.0,
        }
    }
}

/// Constant drives
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TonicConfig {
    pub vpag_gaba: f64,
    pub peri_pvn: f64,
    /// Exploratory drive on the "other" motor dimension
    pub motor_other: f64,
}

impl Default for TonicConfig {
    fn default() -> Self {
        Self {
            vpag_gaba: 0.1,
            peri_pvn: 0.1,
            motor_other: 1.0,
        }
    }
}

/// Experimental manipulations, all disabled by default
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ManipulationConfig {
    pub nociceptive: NociceptiveConfig,
    pub optogenetic: OptogeneticConfig,
}

/// Nociceptive drive, into the parabrachial nucleus unless retargeted
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NociceptiveConfig {
    pub enabled: bool,
    /// Receiving population; must be a declared 1-D region
    pub target: String,
    pub amplitude: f64,
}

impl Default for NociceptiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            target: "pbn".to_string(),
            amplitude: 1.0,
        }
    }
}

/// Photostimulation of dPAG (Deng 2018) or VMH (Kunwar 2015)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OptogeneticConfig {
    pub enabled: bool,
    pub target: OptoTarget,
    pub amplitude: f64,
    /// Restrict stimulation to a window; constant when absent
    pub pulse: Option<PulseWindow>,
}

impl Default for OptogeneticConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            target: OptoTarget::Dpag,
            amplitude: 1.0,
            pulse: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PulseWindow {
    pub onset: f64,
    pub duration: f64,
}

/// Population receiving optogenetic stimulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptoTarget {
    #[default]
    Dpag,
    Vmh,
}

impl OptoTarget {
    pub fn population_name(&self) -> &'static str {
        match self {
            OptoTarget::Dpag => "dpag",
            OptoTarget::Vmh => "vmh",
        }
    }
}

impl fmt::Display for OptoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.population_name())
    }
}

impl FromStr for OptoTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dpag" => Ok(OptoTarget::Dpag),
            "vmh" => Ok(OptoTarget::Vmh),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown optogenetic target '{}' (expected 'dpag' or 'vmh')",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
