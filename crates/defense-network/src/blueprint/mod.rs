// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Blueprint I/O for assembled circuits.

A blueprint is the JSON form of a [`Model`](crate::Model): metadata, the
ordered declarations, and section signatures. Loading replays every
declaration through [`ModelBuilder`](crate::ModelBuilder), so a loaded model
has passed exactly the same checks as a hand-built one.
*/

pub mod loader;
pub mod saver;
pub mod signatures;

use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::model::ModelMetadata;
use crate::population::Population;
use crate::stimulus::Stimulus;

pub use loader::{load_model_from_file, load_model_from_json};
pub use saver::{save_model_to_file, save_model_to_json};
pub use signatures::{generate_signatures, ModelSignatures};

/// Serialized form of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub metadata: ModelMetadata,
    pub populations: Vec<Population>,
    pub stimuli: Vec<Stimulus>,
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<ModelSignatures>,
}
