// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Blueprint JSON saver.

use std::fs;
use std::path::Path;

use tracing::info;

use super::signatures::generate_signatures;
use super::Blueprint;
use crate::model::Model;
use crate::types::CircuitResult;

/// Convert a model into its blueprint, signatures included
pub fn to_blueprint(model: &Model) -> CircuitResult<Blueprint> {
    Ok(Blueprint {
        metadata: model.metadata().clone(),
        populations: model.populations().to_vec(),
        stimuli: model.stimuli().to_vec(),
        connections: model.connections().to_vec(),
        signatures: Some(generate_signatures(model)?),
    })
}

/// Serialize a model to pretty-printed blueprint JSON
pub fn save_model_to_json(model: &Model) -> CircuitResult<String> {
    let blueprint = to_blueprint(model)?;
    Ok(serde_json::to_string_pretty(&blueprint)?)
}

/// Write a model's blueprint JSON to `path`
pub fn save_model_to_file<P: AsRef<Path>>(model: &Model, path: P) -> CircuitResult<()> {
    let path = path.as_ref();
    let json = save_model_to_json(model)?;
    fs::write(path, json)?;
    info!(
        target: "defense-network",
        "Saved blueprint '{}' to {} ({} connections)",
        model.metadata().title,
        path.display(),
        model.connections().len()
    );
    Ok(())
}
