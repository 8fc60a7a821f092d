// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Explicit model builder.

Every declaration is validated completely before anything is recorded, so a
rejected call leaves the builder exactly as it was. Populations and stimuli
share one namespace.
*/

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::connection::{Connection, Source, Target, Transform, UnitWeights};
use crate::model::{Model, ModelMetadata};
use crate::population::{Population, PopulationHandle};
use crate::stimulus::{Stimulus, StimulusHandle};
use crate::types::{ensure_finite, CircuitError, CircuitResult, ConnectionId};

#[derive(Debug, Clone, Copy)]
enum NodeRef {
    Population(usize),
    Stimulus(usize),
}

/// Accumulates declarations and produces an immutable [`Model`]
#[derive(Debug)]
pub struct ModelBuilder {
    metadata: ModelMetadata,
    populations: Vec<Population>,
    stimuli: Vec<Stimulus>,
    connections: Vec<Connection>,
    names: HashMap<String, NodeRef>,
}

impl ModelBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            metadata: ModelMetadata::new(title),
            populations: Vec::new(),
            stimuli: Vec::new(),
            connections: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub(crate) fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Register a population
    pub fn declare_population(&mut self, population: Population) -> CircuitResult<PopulationHandle> {
        population.validate()?;
        if self.names.contains_key(&population.name) {
            return Err(CircuitError::DuplicateName(population.name));
        }

        trace!(
            target: "defense-network",
            "Declared population {} ({} neurons, {}D, radius {})",
            population.name,
            population.neuron_count,
            population.dimensions,
            population.radius
        );

        let handle = PopulationHandle::new(&population);
        self.names
            .insert(population.name.clone(), NodeRef::Population(self.populations.len()));
        self.populations.push(population);
        Ok(handle)
    }

    /// Register a stimulus generator
    pub fn declare_stimulus(&mut self, stimulus: Stimulus) -> CircuitResult<StimulusHandle> {
        stimulus.validate()?;
        if self.names.contains_key(&stimulus.name) {
            return Err(CircuitError::DuplicateName(stimulus.name));
        }

        trace!(target: "defense-network", "Declared stimulus {} ({:?})", stimulus.name, stimulus.kind);

        let handle = StimulusHandle::new(&stimulus);
        self.names
            .insert(stimulus.name.clone(), NodeRef::Stimulus(self.stimuli.len()));
        self.stimuli.push(stimulus);
        Ok(handle)
    }

    /// Register a connection after checking both endpoints and every shape
    ///
    /// Raw-unit weight matrices whose entries all agree are stored as
    /// [`UnitWeights::Uniform`].
    pub fn connect(&mut self, mut connection: Connection) -> CircuitResult<ConnectionId> {
        let description = connection.describe();

        let source_dims = self.source_dimensions(&connection.source)?;
        let target_shape = self.target_shape(&connection.target)?;

        if let Some(tau) = connection.synapse {
            ensure_finite(&format!("{} synapse", description), tau)?;
            if tau < 0.0 {
                return Err(CircuitError::InvalidParameter(format!(
                    "{}: synapse time constant must be >= 0, got {}",
                    description, tau
                )));
            }
        }

        let signal_dims = match &connection.function {
            Some(function) => {
                if matches!(connection.source, Source::Stimulus { .. }) {
                    return Err(CircuitError::InvalidParameter(format!(
                        "{}: functions can only be computed from population signals",
                        description
                    )));
                }
                function.validate()?;
                function
                    .output_dimensions(source_dims)
                    .map_err(|err| match err {
                        CircuitError::DimensionMismatch { expected, actual, .. } => {
                            CircuitError::DimensionMismatch {
                                connection: description.clone(),
                                expected,
                                actual,
                            }
                        }
                        other => other,
                    })?
            }
            None => source_dims,
        };

        connection.transform = check_transform(&description, connection.transform, signal_dims, target_shape)?;

        let id = ConnectionId(self.connections.len());
        debug!(target: "defense-network", "{} {} ({:?})", id, description, connection.transform.gain());
        self.connections.push(connection);
        Ok(id)
    }

    /// Look up the handle of an already declared population
    pub fn population_handle(&self, name: &str) -> CircuitResult<PopulationHandle> {
        match self.names.get(name) {
            Some(NodeRef::Population(index)) => Ok(PopulationHandle::new(&self.populations[*index])),
            _ => Err(CircuitError::UnknownPopulation(name.to_string())),
        }
    }

    pub fn population_count(&self) -> usize {
        self.populations.len()
    }

    pub fn stimulus_count(&self) -> usize {
        self.stimuli.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Freeze the declarations into a model
    pub fn build(self) -> Model {
        debug!(
            target: "defense-network",
            "Built model '{}': {} populations, {} stimuli, {} connections",
            self.metadata.title,
            self.populations.len(),
            self.stimuli.len(),
            self.connections.len()
        );
        Model::from_parts(self.metadata, self.populations, self.stimuli, self.connections)
    }

    fn source_dimensions(&self, source: &Source) -> CircuitResult<usize> {
        match source {
            Source::Population { population, component } => {
                let declared = self.lookup_population(population)?;
                match component {
                    Some(index) => {
                        check_component(declared, *index)?;
                        Ok(1)
                    }
                    None => Ok(declared.dimensions),
                }
            }
            Source::Stimulus { stimulus } => match self.names.get(stimulus) {
                Some(NodeRef::Stimulus(index)) => Ok(self.stimuli[*index].dimensions()),
                _ => Err(CircuitError::UnknownStimulus(stimulus.clone())),
            },
        }
    }

    fn target_shape(&self, target: &Target) -> CircuitResult<TargetShape> {
        match target {
            Target::Population { population, component } => {
                let declared = self.lookup_population(population)?;
                match component {
                    Some(index) => {
                        check_component(declared, *index)?;
                        Ok(TargetShape::Signal(1))
                    }
                    None => Ok(TargetShape::Signal(declared.dimensions)),
                }
            }
            Target::Neurons { population } => {
                let declared = self.lookup_population(population)?;
                Ok(TargetShape::Neurons {
                    population: declared.name.clone(),
                    neuron_count: declared.neuron_count,
                })
            }
        }
    }

    fn lookup_population(&self, name: &str) -> CircuitResult<&Population> {
        match self.names.get(name) {
            Some(NodeRef::Population(index)) => Ok(&self.populations[*index]),
            _ => Err(CircuitError::UnknownPopulation(name.to_string())),
        }
    }
}

enum TargetShape {
    Signal(usize),
    Neurons { population: String, neuron_count: usize },
}

fn check_component(population: &Population, index: usize) -> CircuitResult<()> {
    if index >= population.dimensions {
        return Err(CircuitError::ComponentOutOfRange {
            population: population.name.clone(),
            index,
            dimensions: population.dimensions,
        });
    }
    Ok(())
}

fn check_transform(
    description: &str,
    transform: Transform,
    signal_dims: usize,
    target: TargetShape,
) -> CircuitResult<Transform> {
    match target {
        TargetShape::Neurons {
            population,
            neuron_count,
        } => match transform {
            Transform::Neurons(UnitWeights::Uniform(weight)) => {
                ensure_finite(&format!("{} weight", description), weight)?;
                Ok(Transform::Neurons(UnitWeights::Uniform(weight)))
            }
            Transform::Neurons(UnitWeights::PerUnit(matrix)) => {
                if matrix.nrows() != neuron_count {
                    return Err(CircuitError::RawWeightLength {
                        population,
                        expected: neuron_count,
                        actual: matrix.nrows(),
                    });
                }
                if matrix.ncols() != signal_dims {
                    return Err(CircuitError::DimensionMismatch {
                        connection: description.to_string(),
                        expected: signal_dims,
                        actual: matrix.ncols(),
                    });
                }
                if matrix.iter().any(|w| !w.is_finite()) {
                    return Err(CircuitError::InvalidParameter(format!(
                        "{}: weights must be finite",
                        description
                    )));
                }
                Ok(Transform::Neurons(UnitWeights::PerUnit(matrix).normalized()))
            }
            _ => Err(CircuitError::InvalidParameter(format!(
                "{}: raw-unit targets require per-unit weights",
                description
            ))),
        },
        TargetShape::Signal(target_dims) => match transform {
            Transform::Identity => {
                check_dims(description, target_dims, signal_dims)?;
                Ok(Transform::Identity)
            }
            Transform::Scalar(gain) => {
                ensure_finite(&format!("{} gain", description), gain)?;
                check_dims(description, target_dims, signal_dims)?;
                Ok(Transform::Scalar(gain))
            }
            Transform::Matrix(matrix) => {
                if matrix.ncols() != signal_dims {
                    return Err(CircuitError::DimensionMismatch {
                        connection: description.to_string(),
                        expected: signal_dims,
                        actual: matrix.ncols(),
                    });
                }
                check_dims(description, target_dims, matrix.nrows())?;
                if matrix.iter().any(|w| !w.is_finite()) {
                    return Err(CircuitError::InvalidParameter(format!(
                        "{}: transform entries must be finite",
                        description
                    )));
                }
                Ok(Transform::Matrix(matrix))
            }
            Transform::Neurons(_) => Err(CircuitError::InvalidParameter(format!(
                "{}: per-unit weights need a raw-unit target",
                description
            ))),
        },
    }
}

fn check_dims(description: &str, expected: usize, actual: usize) -> CircuitResult<()> {
    if expected != actual {
        return Err(CircuitError::DimensionMismatch {
            connection: description.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
