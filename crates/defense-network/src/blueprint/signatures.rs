// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Model signature generation for comparison and versioning.

Each signature is the first 16 hex characters of the SHA-256 of a section's
compact JSON. Sections are ordered vectors, so serialization is deterministic.
*/

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::connection::Connection;
use crate::model::Model;
use crate::population::Population;
use crate::stimulus::Stimulus;
use crate::types::CircuitResult;

/// Per-section signatures of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSignatures {
    /// Whole model (all three sections together)
    pub model: String,
    pub populations: String,
    pub stimuli: String,
    pub connections: String,
}

#[derive(Serialize)]
struct Sections<'a> {
    populations: &'a [Population],
    stimuli: &'a [Stimulus],
    connections: &'a [Connection],
}

/// Generate all model signatures
pub fn generate_signatures(model: &Model) -> CircuitResult<ModelSignatures> {
    let populations = serde_json::to_string(model.populations())?;
    let stimuli = serde_json::to_string(model.stimuli())?;
    let connections = serde_json::to_string(model.connections())?;

    let combined = serde_json::to_string(&Sections {
        populations: model.populations(),
        stimuli: model.stimuli(),
        connections: model.connections(),
    })?;

    Ok(ModelSignatures {
        model: hash_string(&combined),
        populations: hash_string(&populations),
        stimuli: hash_string(&stimuli),
        connections: hash_string(&connections),
    })
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let digest = hasher.finalize();
    format!("{:x}", digest)[..16].to_string()
}
