// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
High-level blueprint loading API.

Loaded declarations go back through [`ModelBuilder`], so a blueprint that was
edited by hand into an inconsistent state is rejected with the same error a
direct declaration would produce.
*/

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::signatures::generate_signatures;
use super::Blueprint;
use crate::builder::ModelBuilder;
use crate::model::{Model, FORMAT_VERSION};
use crate::types::{CircuitError, CircuitResult};

/// Load a model from a blueprint JSON file
pub fn load_model_from_file<P: AsRef<Path>>(path: P) -> CircuitResult<Model> {
    let json_str = fs::read_to_string(path)?;
    load_model_from_json(&json_str)
}

/// Load a model from a blueprint JSON string
pub fn load_model_from_json(json_str: &str) -> CircuitResult<Model> {
    let blueprint: Blueprint = serde_json::from_str(json_str)?;
    from_blueprint(blueprint)
}

/// Rebuild a model by replaying every declaration of the blueprint
pub fn from_blueprint(blueprint: Blueprint) -> CircuitResult<Model> {
    if blueprint.metadata.format_version != FORMAT_VERSION {
        return Err(CircuitError::Serialization(format!(
            "Unsupported blueprint format version {} (expected {})",
            blueprint.metadata.format_version, FORMAT_VERSION
        )));
    }

    let Blueprint {
        metadata,
        populations,
        stimuli,
        connections,
        signatures,
    } = blueprint;

    let mut builder = ModelBuilder::new(metadata.title.clone()).with_metadata(metadata);
    for population in populations {
        builder.declare_population(population)?;
    }
    for stimulus in stimuli {
        builder.declare_stimulus(stimulus)?;
    }
    for connection in connections {
        builder.connect(connection)?;
    }
    let model = builder.build();

    match signatures {
        Some(stored) => {
            let actual = generate_signatures(&model)?;
            if actual != stored {
                warn!(
                    target: "defense-network",
                    "Blueprint signatures do not match its content (stored model {}, computed {})",
                    stored.model,
                    actual.model
                );
            } else {
                debug!(target: "defense-network", "Blueprint signature {} verified", actual.model);
            }
        }
        None => debug!(target: "defense-network", "Blueprint carries no signatures"),
    }

    Ok(model)
}
