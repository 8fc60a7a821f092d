// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Defense Network

Declarative graph building for population-level neural circuits.

A circuit is declared against an explicit [`ModelBuilder`]: populations and
stimulus generators first, then connections between them. Every declaration
is validated on the spot (unknown endpoints, shape mismatches, raw-unit weight
sizes, parameter ranges), and [`ModelBuilder::build`] yields one immutable
[`Model`] for an external simulation engine.

## Modules

- `population` - Population declarations and handles
- `stimulus` - Time-to-value stimulus generators
- `functions` - Signal transformation functions
- `connection` - Sources, targets, transforms and connections
- `builder` - The validating builder
- `model` - The assembled model and its read API
- `blueprint` - JSON blueprint save/load with signatures

## Example

```rust
use defense_network::{Connection, ModelBuilder, Population, Stimulus, StimulusKind};

let mut builder = ModelBuilder::new("relay");
let sc = builder.declare_population(Population::new("sc", 400, 1, 1.0))?;
let thal = builder.declare_population(Population::new("thal", 600, 1, 1.0))?;
let stim = builder.declare_stimulus(Stimulus::new("stim", StimulusKind::expansion_rate(0.5)))?;

builder.connect(Connection::new(&stim, sc.component(0)?).with_synapse(0.15))?;
builder.connect(Connection::new(sc.component(0)?, thal.component(0)?))?;

let model = builder.build();
assert_eq!(model.connections().len(), 2);
# Ok::<(), defense_network::CircuitError>(())
```
*/

pub mod blueprint;
pub mod builder;
pub mod connection;
pub mod functions;
pub mod model;
pub mod population;
pub mod stimulus;
pub mod types;

pub use blueprint::{
    generate_signatures, load_model_from_file, load_model_from_json, save_model_to_file,
    save_model_to_json, Blueprint, ModelSignatures,
};
pub use builder::ModelBuilder;
pub use connection::{Connection, Source, Subcircuit, Target, Transform, UnitWeights};
pub use functions::{
    elementwise_product, leaky_recurrent, scale_by_gain, threat_imminence_curve, SignalFunction,
};
pub use model::{Model, ModelMetadata, ModelStats, FORMAT_VERSION};
pub use population::{EncoderConstraint, InterceptDistribution, Population, PopulationHandle, Signal};
pub use stimulus::{expansion_rate_stimulus, Stimulus, StimulusHandle, StimulusKind};
pub use types::{CircuitError, CircuitResult, ConnectionId};
