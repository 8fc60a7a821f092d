// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Stimulus generators.

Every generator is a deterministic function of simulation time with all of
its parameters fixed at declaration. Generators are stored as data rather
than closures so that a model can be written to a blueprint and rebuilt.
*/

use serde::{Deserialize, Serialize};

use crate::types::{ensure_finite, CircuitError, CircuitResult};

/// Default looming-stimulus frequency (one cycle every 10 time units)
pub const EXPANSION_FREQUENCY_HZ: f64 = 0.1;
/// Default fraction of each cycle the looming stimulus is on
pub const EXPANSION_DUTY: f64 = 0.5;
/// Time of the first rising edge
pub const EXPANSION_ONSET: f64 = 1.0;

/// Time-to-value function of a stimulus node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StimulusKind {
    /// Square wave between 0 and `peak`, rising at `onset + k / frequency_hz`
    SquareWave {
        peak: f64,
        frequency_hz: f64,
        duty: f64,
        onset: f64,
    },
    /// Constant output regardless of time
    Constant { value: f64 },
    /// `amplitude` on `[onset, onset + duration)`, 0 elsewhere
    Pulse {
        amplitude: f64,
        onset: f64,
        duration: f64,
    },
}

impl StimulusKind {
    /// Looming expansion-rate input with the default 0.1 Hz, 50 % duty, onset 1 timing
    pub fn expansion_rate(exp_rate: f64) -> Self {
        StimulusKind::SquareWave {
            peak: exp_rate,
            frequency_hz: EXPANSION_FREQUENCY_HZ,
            duty: EXPANSION_DUTY,
            onset: EXPANSION_ONSET,
        }
    }

    /// Constant bias drive
    pub fn tonic(value: f64) -> Self {
        StimulusKind::Constant { value }
    }

    /// Manipulation placeholder that always outputs 0
    pub fn disabled() -> Self {
        StimulusKind::Constant { value: 0.0 }
    }

    /// Evaluate the generator at time `t`
    pub fn evaluate(&self, t: f64) -> f64 {
        match *self {
            StimulusKind::SquareWave {
                peak,
                frequency_hz,
                duty,
                onset,
            } => {
                // Phase in cycles; rem_euclid keeps t < onset on the same grid
                let period = 1.0 / frequency_hz;
                let phase = ((t - onset) / period).rem_euclid(1.0);
                if phase < duty {
                    peak
                } else {
                    0.0
                }
            }
            StimulusKind::Constant { value } => value,
            StimulusKind::Pulse {
                amplitude,
                onset,
                duration,
            } => {
                if t >= onset && t < onset + duration {
                    amplitude
                } else {
                    0.0
                }
            }
        }
    }

    /// True when the generator can never emit a non-zero value
    pub fn is_silent(&self) -> bool {
        match *self {
            StimulusKind::SquareWave { peak, duty, .. } => peak == 0.0 || duty == 0.0,
            StimulusKind::Constant { value } => value == 0.0,
            StimulusKind::Pulse { amplitude, .. } => amplitude == 0.0,
        }
    }

    /// Check parameters against their documented ranges
    pub fn validate(&self) -> CircuitResult<()> {
        match *self {
            StimulusKind::SquareWave {
                peak,
                frequency_hz,
                duty,
                onset,
            } => {
                ensure_finite("square wave peak", peak)?;
                ensure_finite("square wave frequency", frequency_hz)?;
                ensure_finite("square wave duty", duty)?;
                ensure_finite("square wave onset", onset)?;
                if frequency_hz <= 0.0 {
                    return Err(CircuitError::InvalidParameter(format!(
                        "square wave frequency must be > 0, got {}",
                        frequency_hz
                    )));
                }
                if !(0.0..=1.0).contains(&duty) {
                    return Err(CircuitError::InvalidParameter(format!(
                        "square wave duty must be within [0, 1], got {}",
                        duty
                    )));
                }
                if peak < 0.0 {
                    return Err(CircuitError::InvalidParameter(format!(
                        "square wave peak must be >= 0, got {}",
                        peak
                    )));
                }
                Ok(())
            }
            StimulusKind::Constant { value } => ensure_finite("constant stimulus value", value),
            StimulusKind::Pulse {
                amplitude,
                onset,
                duration,
            } => {
                ensure_finite("pulse amplitude", amplitude)?;
                ensure_finite("pulse onset", onset)?;
                ensure_finite("pulse duration", duration)?;
                if duration <= 0.0 {
                    return Err(CircuitError::InvalidParameter(format!(
                        "pulse duration must be > 0, got {}",
                        duration
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A named exogenous input node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub name: String,
    pub kind: StimulusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Stimulus {
    pub fn new(name: impl Into<String>, kind: StimulusKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Output width; every generator here is scalar
    pub fn dimensions(&self) -> usize {
        1
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        self.kind.evaluate(t)
    }

    pub fn validate(&self) -> CircuitResult<()> {
        if self.name.trim().is_empty() {
            return Err(CircuitError::InvalidParameter(
                "stimulus name must not be empty".to_string(),
            ));
        }
        self.kind
            .validate()
            .map_err(|e| match e {
                CircuitError::InvalidParameter(msg) => {
                    CircuitError::InvalidParameter(format!("stimulus {}: {}", self.name, msg))
                }
                other => other,
            })
    }
}

/// Reference to a declared stimulus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StimulusHandle {
    name: String,
}

impl StimulusHandle {
    pub(crate) fn new(stimulus: &Stimulus) -> Self {
        Self {
            name: stimulus.name.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Looming expansion rate at time `t` with the default timing
pub fn expansion_rate_stimulus(exp_rate: f64, t: f64) -> f64 {
    StimulusKind::expansion_rate(exp_rate).evaluate(t)
}
