// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! finite, within their documented ranges, and mutually consistent.

use crate::{CircuitConfig, ConfigError, ConfigResult};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NotFinite { field: String, value: f64 },
    OutOfRange { field: String, value: f64, min: f64, max: f64 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFinite { field, value } => {
                write!(f, "{} = {} is not a finite number", field, value)
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "{} = {} is outside valid range ({}-{})",
                    field, value, min, max
                )
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Non-finite numbers anywhere in the parameter set
/// - Stimulus parameters inside their documented ranges
/// - Non-negative synaptic time constants
/// - Well-formed manipulation and logging settings
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &CircuitConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_finite(config, &mut errors);
    validate_stimulus(config, &mut errors);
    validate_functions(config, &mut errors);
    validate_synapses(config, &mut errors);
    validate_manipulations(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn all_numeric_fields(config: &CircuitConfig) -> Vec<(&'static str, f64)> {
    let s = &config.stimulus;
    let fun = &config.functions;
    let syn = &config.synapses;
    let g = &config.gains;
    let inh = &config.inhibition;
    let t = &config.tonic;
    let m = &config.manipulations;

    let mut fields = vec![
        ("stimulus.exp_rate", s.exp_rate),
        ("stimulus.frequency_hz", s.frequency_hz),
        ("stimulus.duty", s.duty),
        ("stimulus.onset", s.onset),
        ("functions.alpha", fun.alpha),
        ("functions.b_desired", fun.b_desired),
        ("functions.a_desired", fun.a_desired),
        ("functions.actual_synapse", fun.actual_synapse),
        ("synapses.tau_dpag", syn.tau_dpag),
        ("synapses.tau_vmh", syn.tau_vmh),
        ("synapses.tau_ahn", syn.tau_ahn),
        ("synapses.stimulus_input", syn.stimulus_input),
        ("gains.bma_ahn", g.bma_ahn),
        ("gains.ahn_recurrent", g.ahn_recurrent),
        ("gains.vmh_dpag", g.vmh_dpag),
        ("gains.dpag_vmh", g.dpag_vmh),
        ("gains.dpag_vpag_gaba", g.dpag_vpag_gaba),
        ("gains.vmh_dmh", g.vmh_dmh),
        ("gains.ahn_dmh", g.ahn_dmh),
        ("gains.pbn_cea", g.pbn_cea),
        ("gains.expansion_pvn", g.expansion_pvn),
        ("inhibition.vpag_gaba_to_vpag_glu", inh.vpag_gaba_to_vpag_glu),
        ("inhibition.cea_to_peri_pvn", inh.cea_to_peri_pvn),
        ("inhibition.cea_to_vpag_gaba", inh.cea_to_vpag_gaba),
        ("inhibition.peri_pvn_to_pvn", inh.peri_pvn_to_pvn),
        ("inhibition.bnst_to_pvn", inh.bnst_to_pvn),
        ("inhibition.medulla_to_motor", inh.medulla_to_motor),
        ("tonic.vpag_gaba", t.vpag_gaba),
        ("tonic.peri_pvn", t.peri_pvn),
        ("tonic.motor_other", t.motor_other),
        ("manipulations.nociceptive.amplitude", m.nociceptive.amplitude),
        ("manipulations.optogenetic.amplitude", m.optogenetic.amplitude),
    ];
    if let Some(pulse) = &m.optogenetic.pulse {
        fields.push(("manipulations.optogenetic.pulse.onset", pulse.onset));
        fields.push(("manipulations.optogenetic.pulse.duration", pulse.duration));
    }
    fields
}

/// Reject NaN and infinities anywhere in the numeric parameter set
fn validate_finite(config: &CircuitConfig, errors: &mut Vec<ConfigValidationError>) {
    for (field, value) in all_numeric_fields(config) {
        if !value.is_finite() {
            errors.push(ConfigValidationError::NotFinite {
                field: field.to_string(),
                value,
            });
        }
    }
}

fn check_range(
    errors: &mut Vec<ConfigValidationError>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if value.is_finite() && (value < min || value > max) {
        errors.push(ConfigValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
}

fn validate_stimulus(config: &CircuitConfig, errors: &mut Vec<ConfigValidationError>) {
    let s = &config.stimulus;
    check_range(errors, "stimulus.exp_rate", s.exp_rate, 0.1, 0.9);
    check_range(errors, "stimulus.duty", s.duty, 0.0, 1.0);
    if s.frequency_hz.is_finite() && s.frequency_hz <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stimulus.frequency_hz".to_string(),
            reason: format!("must be > 0, got {}", s.frequency_hz),
        });
    }
}

fn validate_functions(config: &CircuitConfig, errors: &mut Vec<ConfigValidationError>) {
    let alpha = config.functions.alpha;
    if alpha.is_finite() && alpha <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "functions.alpha".to_string(),
            reason: format!("must be > 0, got {}", alpha),
        });
    }
}

fn validate_synapses(config: &CircuitConfig, errors: &mut Vec<ConfigValidationError>) {
    let syn = &config.synapses;
    for (field, tau) in [
        ("synapses.tau_dpag", syn.tau_dpag),
        ("synapses.tau_vmh", syn.tau_vmh),
        ("synapses.tau_ahn", syn.tau_ahn),
        ("synapses.stimulus_input", syn.stimulus_input),
    ] {
        if tau.is_finite() && tau < 0.0 {
            errors.push(ConfigValidationError::InvalidValue {
                field: field.to_string(),
                reason: format!("time constant must be >= 0, got {}", tau),
            });
        }
    }
}

fn validate_manipulations(config: &CircuitConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.manipulations.nociceptive.target.trim().is_empty() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "manipulations.nociceptive.target".to_string(),
            reason: "must name a population".to_string(),
        });
    }
    if let Some(pulse) = &config.manipulations.optogenetic.pulse {
        if pulse.duration.is_finite() && pulse.duration <= 0.0 {
            errors.push(ConfigValidationError::InvalidValue {
                field: "manipulations.optogenetic.pulse.duration".to_string(),
                reason: format!("must be > 0, got {}", pulse.duration),
            });
        }
    }
}

fn validate_logging(config: &CircuitConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of trace, debug, info, warn, error",
                config.logging.level
            ),
        });
    }
    if config.logging.format != "text" && config.logging.format != "json" {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("'{}' must be 'text' or 'json'", config.logging.format),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PulseWindow;

    #[test]
    fn test_default_config_is_valid() {
        let config = CircuitConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_exp_rate_outside_documented_range() {
        let mut config = CircuitConfig::default();
        config.stimulus.exp_rate = 0.95;

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("stimulus.exp_rate"));
                assert!(msg.contains("0.1-0.9"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_gain() {
        let mut config = CircuitConfig::default();
        config.gains.ahn_recurrent = f64::NAN;

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("gains.ahn_recurrent"));
                assert!(msg.contains("not a finite number"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_time_constant() {
        let mut config = CircuitConfig::default();
        config.synapses.tau_vmh = -0.1;

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("synapses.tau_vmh")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_errors_are_reported_together() {
        let mut config = CircuitConfig::default();
        config.stimulus.frequency_hz = 0.0;
        config.logging.format = "xml".to_string();
        config.manipulations.optogenetic.pulse = Some(PulseWindow {
            onset: 5.0,
            duration: 0.0,
        });

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("stimulus.frequency_hz"));
                assert!(msg.contains("logging.format"));
                assert!(msg.contains("pulse.duration"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_nociceptive_target() {
        let mut config = CircuitConfig::default();
        config.manipulations.nociceptive.target = "  ".to_string();

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("manipulations.nociceptive.target"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
