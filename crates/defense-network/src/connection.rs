// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connection declarations.

A connection carries a source signal through an optional function and then a
transform into a target. Targets are either a population's decoded signal (or
one of its components) or the population's raw unit array.
*/

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::functions::SignalFunction;
use crate::stimulus::StimulusHandle;

/// Where a connection reads from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    Population {
        population: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        component: Option<usize>,
    },
    Stimulus { stimulus: String },
}

impl Source {
    pub fn population(name: impl Into<String>) -> Self {
        Source::Population {
            population: name.into(),
            component: None,
        }
    }

    pub fn component(name: impl Into<String>, index: usize) -> Self {
        Source::Population {
            population: name.into(),
            component: Some(index),
        }
    }

    pub fn stimulus(name: impl Into<String>) -> Self {
        Source::Stimulus {
            stimulus: name.into(),
        }
    }

    /// Name of the population or stimulus read from
    pub fn node(&self) -> &str {
        match self {
            Source::Population { population, .. } => population,
            Source::Stimulus { stimulus } => stimulus,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Population {
                population,
                component: Some(index),
            } => write!(f, "{}[{}]", population, index),
            Source::Population { population, .. } => write!(f, "{}", population),
            Source::Stimulus { stimulus } => write!(f, "{}", stimulus),
        }
    }
}

impl From<&StimulusHandle> for Source {
    fn from(handle: &StimulusHandle) -> Self {
        Source::stimulus(handle.name())
    }
}

/// Where a connection delivers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Population {
        population: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        component: Option<usize>,
    },
    /// Direct input to every unit of the population
    Neurons { population: String },
}

impl Target {
    pub fn population(name: impl Into<String>) -> Self {
        Target::Population {
            population: name.into(),
            component: None,
        }
    }

    pub fn component(name: impl Into<String>, index: usize) -> Self {
        Target::Population {
            population: name.into(),
            component: Some(index),
        }
    }

    pub fn neurons(name: impl Into<String>) -> Self {
        Target::Neurons {
            population: name.into(),
        }
    }

    pub fn node(&self) -> &str {
        match self {
            Target::Population { population, .. } => population,
            Target::Neurons { population } => population,
        }
    }

    pub fn is_neurons(&self) -> bool {
        matches!(self, Target::Neurons { .. })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Population {
                population,
                component: Some(index),
            } => write!(f, "{}[{}]", population, index),
            Target::Population { population, .. } => write!(f, "{}", population),
            Target::Neurons { population } => write!(f, "{}.neurons", population),
        }
    }
}

/// Per-unit weights for a raw-unit target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "weights", rename_all = "snake_case")]
pub enum UnitWeights {
    /// Same scalar for every unit and source dimension
    Uniform(f64),
    /// Explicit `(target neuron count, source dims)` matrix
    PerUnit(Array2<f64>),
}

impl UnitWeights {
    /// Collapse a matrix whose entries all agree into a scalar broadcast
    pub fn normalized(self) -> Self {
        match self {
            UnitWeights::PerUnit(matrix) => {
                let first = matrix.iter().next().copied();
                match first {
                    Some(value) if matrix.iter().all(|w| *w == value) => UnitWeights::Uniform(value),
                    _ => UnitWeights::PerUnit(matrix),
                }
            }
            uniform => uniform,
        }
    }

    /// Weight seen by unit `row` from source dimension `col`
    pub fn weight(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            UnitWeights::Uniform(value) => Some(*value),
            UnitWeights::PerUnit(matrix) => matrix.get((row, col)).copied(),
        }
    }
}

/// Linear map applied after the function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Transform {
    Identity,
    Scalar(f64),
    /// `(target dims, source dims)` matrix
    Matrix(Array2<f64>),
    /// Raw-unit weights; only valid on a `Target::Neurons`
    Neurons(UnitWeights),
}

impl Transform {
    /// Gain for scalar-like transforms
    pub fn gain(&self) -> Option<f64> {
        match self {
            Transform::Identity => Some(1.0),
            Transform::Scalar(gain) => Some(*gain),
            Transform::Neurons(UnitWeights::Uniform(weight)) => Some(*weight),
            _ => None,
        }
    }
}

/// Functional grouping of a connection within the circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcircuit {
    VisualThreatDetection,
    MotorCommand,
    SensorimotorIntegration,
    /// Modelling hypotheses not yet verified experimentally
    Assumption,
    Experiment,
}

impl Subcircuit {
    pub fn all() -> [Subcircuit; 5] {
        [
            Subcircuit::VisualThreatDetection,
            Subcircuit::MotorCommand,
            Subcircuit::SensorimotorIntegration,
            Subcircuit::Assumption,
            Subcircuit::Experiment,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subcircuit::VisualThreatDetection => "visual_threat_detection",
            Subcircuit::MotorCommand => "motor_command",
            Subcircuit::SensorimotorIntegration => "sensorimotor_integration",
            Subcircuit::Assumption => "assumption",
            Subcircuit::Experiment => "experiment",
        }
    }
}

impl fmt::Display for Subcircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge of the circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: Source,
    pub target: Target,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<SignalFunction>,
    /// Synaptic time constant; `None` leaves the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synapse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcircuit: Option<Subcircuit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Connection {
    /// Identity connection with the engine's default synapse
    pub fn new(source: impl Into<Source>, target: impl Into<Target>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transform: Transform::Identity,
            function: None,
            synapse: None,
            subcircuit: None,
            label: None,
        }
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.transform = Transform::Scalar(gain);
        self
    }

    pub fn with_matrix(mut self, matrix: Array2<f64>) -> Self {
        self.transform = Transform::Matrix(matrix);
        self
    }

    pub fn with_unit_weights(mut self, weights: UnitWeights) -> Self {
        self.transform = Transform::Neurons(weights);
        self
    }

    pub fn with_function(mut self, function: SignalFunction) -> Self {
        self.function = Some(function);
        self
    }

    pub fn with_synapse(mut self, tau: f64) -> Self {
        self.synapse = Some(tau);
        self
    }

    pub fn in_subcircuit(mut self, subcircuit: Subcircuit) -> Self {
        self.subcircuit = Some(subcircuit);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Short description such as `sc[0] -> thal[0]`
    pub fn describe(&self) -> String {
        format!("{} -> {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_matrix_normalizes() {
        let weights = UnitWeights::PerUnit(Array2::from_elem((200, 1), -10.0)).normalized();
        assert_eq!(weights, UnitWeights::Uniform(-10.0));
    }

    #[test]
    fn test_heterogeneous_matrix_is_kept() {
        let mut matrix = Array2::from_elem((4, 1), -1.0);
        matrix[[2, 0]] = -2.0;
        let weights = UnitWeights::PerUnit(matrix).normalized();
        assert_eq!(weights.weight(2, 0), Some(-2.0));
        assert_eq!(weights.weight(0, 0), Some(-1.0));
        assert_eq!(weights.weight(9, 0), None);
    }

    #[test]
    fn test_describe() {
        let connection = Connection::new(Source::component("sc", 0), Target::component("thal", 0));
        assert_eq!(connection.describe(), "sc[0] -> thal[0]");
        let inhibition = Connection::new(Source::population("cea"), Target::neurons("peri_pvn"));
        assert_eq!(inhibition.describe(), "cea -> peri_pvn.neurons");
    }

    #[test]
    fn test_transform_gain() {
        assert_eq!(Transform::Identity.gain(), Some(1.0));
        assert_eq!(Transform::Scalar(0.9).gain(), Some(0.9));
        assert_eq!(Transform::Neurons(UnitWeights::Uniform(-5000.0)).gain(), Some(-5000.0));
        assert_eq!(Transform::Matrix(Array2::zeros((1, 1))).gain(), None);
    }
}
