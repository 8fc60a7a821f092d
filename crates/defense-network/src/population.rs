// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Population declarations and the handles returned when they are registered.

A population is a named group of neurons jointly representing a
`dimensions`-long real vector of magnitude up to `radius`. Neuron-level
encoding is left to the simulation engine; this module only records and
validates the declaration.
*/

use serde::{Deserialize, Serialize};

use crate::connection::{Source, Target};
use crate::types::{ensure_finite, CircuitError, CircuitResult};

/// A named neural population ("ensemble")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub name: String,
    pub neuron_count: usize,
    pub dimensions: usize,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoders: Option<EncoderConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intercepts: Option<InterceptDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Population {
    pub fn new(name: impl Into<String>, neuron_count: usize, dimensions: usize, radius: f64) -> Self {
        Self {
            name: name.into(),
            neuron_count,
            dimensions,
            radius,
            encoders: None,
            intercepts: None,
            label: None,
        }
    }

    /// Restrict preferred directions (builder pattern)
    pub fn with_encoders(mut self, encoders: EncoderConstraint) -> Self {
        self.encoders = Some(encoders);
        self
    }

    /// Set the distribution activation thresholds are drawn from (builder pattern)
    pub fn with_intercepts(mut self, intercepts: InterceptDistribution) -> Self {
        self.intercepts = Some(intercepts);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check counts, radius and tuning constraints
    pub fn validate(&self) -> CircuitResult<()> {
        if self.name.trim().is_empty() {
            return Err(CircuitError::InvalidParameter(
                "population name must not be empty".to_string(),
            ));
        }
        if self.neuron_count == 0 {
            return Err(CircuitError::InvalidParameter(format!(
                "population {}: neuron_count must be > 0",
                self.name
            )));
        }
        if self.dimensions == 0 {
            return Err(CircuitError::InvalidParameter(format!(
                "population {}: dimensions must be > 0",
                self.name
            )));
        }
        ensure_finite(&format!("population {} radius", self.name), self.radius)?;
        if self.radius <= 0.0 {
            return Err(CircuitError::InvalidParameter(format!(
                "population {}: radius must be > 0, got {}",
                self.name, self.radius
            )));
        }
        if let Some(encoders) = &self.encoders {
            encoders.validate(&self.name, self.dimensions)?;
        }
        if let Some(intercepts) = &self.intercepts {
            intercepts.validate(&self.name)?;
        }
        Ok(())
    }
}

/// Restriction on the directions units are tuned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "directions", rename_all = "snake_case")]
pub enum EncoderConstraint {
    /// Every unit picks one of the listed directions
    Choice(Vec<Vec<f64>>),
}

impl EncoderConstraint {
    /// All units respond to positive values only (1-D)
    pub fn positive() -> Self {
        EncoderConstraint::Choice(vec![vec![1.0]])
    }

    fn validate(&self, population: &str, dimensions: usize) -> CircuitResult<()> {
        match self {
            EncoderConstraint::Choice(directions) => {
                if directions.is_empty() {
                    return Err(CircuitError::InvalidParameter(format!(
                        "population {}: encoder choice is empty",
                        population
                    )));
                }
                for direction in directions {
                    if direction.len() != dimensions {
                        return Err(CircuitError::DimensionMismatch {
                            connection: format!("{} encoders", population),
                            expected: dimensions,
                            actual: direction.len(),
                        });
                    }
                    for &component in direction {
                        ensure_finite(&format!("population {} encoder", population), component)?;
                    }
                    if direction.iter().all(|c| *c == 0.0) {
                        return Err(CircuitError::InvalidParameter(format!(
                            "population {}: encoder direction must be non-zero",
                            population
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Distribution of per-unit activation thresholds (normalised to the radius)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterceptDistribution {
    Uniform { low: f64, high: f64 },
}

impl InterceptDistribution {
    fn validate(&self, population: &str) -> CircuitResult<()> {
        match *self {
            InterceptDistribution::Uniform { low, high } => {
                ensure_finite(&format!("population {} intercept low", population), low)?;
                ensure_finite(&format!("population {} intercept high", population), high)?;
                if low > high || low < -1.0 || high > 1.0 {
                    return Err(CircuitError::InvalidParameter(format!(
                        "population {}: intercepts Uniform({}, {}) must satisfy -1 <= low <= high <= 1",
                        population, low, high
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Reference to a declared population
///
/// Handles are only produced by [`ModelBuilder`](crate::ModelBuilder), so the
/// dimensions they carry are the declared ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationHandle {
    name: String,
    neuron_count: usize,
    dimensions: usize,
}

impl PopulationHandle {
    pub(crate) fn new(population: &Population) -> Self {
        Self {
            name: population.name.clone(),
            neuron_count: population.neuron_count,
            dimensions: population.dimensions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn neuron_count(&self) -> usize {
        self.neuron_count
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The whole decoded signal
    pub fn signal(&self) -> Signal {
        Signal {
            population: self.name.clone(),
            component: None,
        }
    }

    /// One dimension of the decoded signal
    pub fn component(&self, index: usize) -> CircuitResult<Signal> {
        if index >= self.dimensions {
            return Err(CircuitError::ComponentOutOfRange {
                population: self.name.clone(),
                index,
                dimensions: self.dimensions,
            });
        }
        Ok(Signal {
            population: self.name.clone(),
            component: Some(index),
        })
    }

    /// The raw unit array, for per-neuron inhibition or excitation
    pub fn neurons(&self) -> Target {
        Target::Neurons {
            population: self.name.clone(),
        }
    }
}

/// A decoded population signal, optionally restricted to one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub population: String,
    pub component: Option<usize>,
}

impl From<Signal> for Source {
    fn from(signal: Signal) -> Self {
        Source::Population {
            population: signal.population,
            component: signal.component,
        }
    }
}

impl From<Signal> for Target {
    fn from(signal: Signal) -> Self {
        Target::Population {
            population: signal.population,
            component: signal.component,
        }
    }
}

impl From<&PopulationHandle> for Source {
    fn from(handle: &PopulationHandle) -> Self {
        handle.signal().into()
    }
}

impl From<&PopulationHandle> for Target {
    fn from(handle: &PopulationHandle) -> Self {
        handle.signal().into()
    }
}
