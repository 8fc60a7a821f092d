// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
The assembled, immutable circuit and its read API.
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::connection::{Connection, Subcircuit, Transform};
use crate::population::Population;
use crate::stimulus::Stimulus;
use crate::types::ConnectionId;

/// Blueprint format produced by this crate
pub const FORMAT_VERSION: &str = "1.0";

/// Descriptive model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub format_version: String,
}

impl ModelMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            format_version: FORMAT_VERSION.to_string(),
        }
    }
}

/// Summary counts of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    pub populations: usize,
    pub stimuli: usize,
    pub connections: usize,
    pub total_neurons: usize,
    pub raw_unit_connections: usize,
    pub active_stimuli: usize,
}

/// A fully declared circuit ready for a simulation engine
///
/// Only [`ModelBuilder::build`](crate::ModelBuilder::build) creates one, so
/// every connection refers to a declared node with matching shapes.
#[derive(Debug, Clone)]
pub struct Model {
    metadata: ModelMetadata,
    populations: Vec<Population>,
    stimuli: Vec<Stimulus>,
    connections: Vec<Connection>,
    population_index: HashMap<String, usize>,
    stimulus_index: HashMap<String, usize>,
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata
            && self.populations == other.populations
            && self.stimuli == other.stimuli
            && self.connections == other.connections
    }
}

impl Model {
    pub(crate) fn from_parts(
        metadata: ModelMetadata,
        populations: Vec<Population>,
        stimuli: Vec<Stimulus>,
        connections: Vec<Connection>,
    ) -> Self {
        let population_index = populations
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        let stimulus_index = stimuli
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        Self {
            metadata,
            populations,
            stimuli,
            connections,
            population_index,
            stimulus_index,
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Populations in declaration order
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    /// Stimuli in declaration order
    pub fn stimuli(&self) -> &[Stimulus] {
        &self.stimuli
    }

    /// Connections in declaration order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn population(&self, name: &str) -> Option<&Population> {
        self.population_index.get(name).map(|&i| &self.populations[i])
    }

    pub fn stimulus(&self, name: &str) -> Option<&Stimulus> {
        self.stimulus_index.get(name).map(|&i| &self.stimuli[i])
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    /// Connections delivering to `name` (signal, component or raw units)
    pub fn incoming(&self, name: &str) -> Vec<(ConnectionId, &Connection)> {
        self.select(|c| c.target.node() == name)
    }

    /// Connections reading from `name`
    pub fn outgoing(&self, name: &str) -> Vec<(ConnectionId, &Connection)> {
        self.select(|c| c.source.node() == name)
    }

    pub fn connections_in(&self, subcircuit: Subcircuit) -> Vec<(ConnectionId, &Connection)> {
        self.select(|c| c.subcircuit == Some(subcircuit))
    }

    /// Total node count (populations plus stimuli)
    pub fn node_count(&self) -> usize {
        self.populations.len() + self.stimuli.len()
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            populations: self.populations.len(),
            stimuli: self.stimuli.len(),
            connections: self.connections.len(),
            total_neurons: self.populations.iter().map(|p| p.neuron_count).sum(),
            raw_unit_connections: self
                .connections
                .iter()
                .filter(|c| matches!(c.transform, Transform::Neurons(_)))
                .count(),
            active_stimuli: self.stimuli.iter().filter(|s| !s.kind.is_silent()).count(),
        }
    }

    fn select<F>(&self, predicate: F) -> Vec<(ConnectionId, &Connection)>
    where
        F: Fn(&Connection) -> bool,
    {
        self.connections
            .iter()
            .enumerate()
            .filter(|(_, c)| predicate(c))
            .map(|(i, c)| (ConnectionId(i), c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::connection::{Connection, Source, Subcircuit, Target, UnitWeights};
    use crate::population::Population;
    use crate::stimulus::{Stimulus, StimulusKind};
    use crate::ModelBuilder;

    #[test]
    fn test_read_api() {
        let mut builder = ModelBuilder::new("relay");
        builder.declare_population(Population::new("sc", 400, 1, 1.0)).unwrap();
        builder.declare_population(Population::new("thal", 600, 1, 1.0)).unwrap();
        builder
            .declare_stimulus(Stimulus::new("noci_stim", StimulusKind::disabled()))
            .unwrap();
        builder
            .connect(Connection::new(Source::component("sc", 0), Target::component("thal", 0)).in_subcircuit(Subcircuit::VisualThreatDetection))
            .unwrap();
        builder
            .connect(
                Connection::new(Source::population("thal"), Target::neurons("sc"))
                    .with_unit_weights(UnitWeights::Uniform(-1.0)),
            )
            .unwrap();
        let model = builder.build();

        assert_eq!(model.node_count(), 3);
        assert_eq!(model.population("thal").map(|p| p.neuron_count), Some(600));
        assert!(model.population("noci_stim").is_none());
        assert!(model.stimulus("noci_stim").is_some());
        assert_eq!(model.incoming("sc").len(), 1);
        assert_eq!(model.outgoing("sc").len(), 1);
        assert_eq!(model.connections_in(Subcircuit::VisualThreatDetection).len(), 1);
        assert!(model.connections_in(Subcircuit::Experiment).is_empty());

        let stats = model.stats();
        assert_eq!(stats.total_neurons, 1000);
        assert_eq!(stats.raw_unit_connections, 1);
        assert_eq!(stats.active_stimuli, 0);
    }
}
