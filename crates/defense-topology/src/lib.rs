// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Defense Topology

The defensive-behaviour circuit: superior colliculus → thalamus/amygdala →
hypothalamus → PAG → motor output, as a hypothesis about how looming-threat
signals become freezing or flight.

```text
 expansion ─► sc ─► thal ─► la ─► bma ─┬─► vmh ◄──► dpag ─► motor[0,1]
                                       ├─► ahn ─► vpag_glu ─► medulla ─┤ (inhibits motor units)
                                       ├─► cea ─┤ (inhibits vpag_gaba, peri_pvn units)
                                       └─► bnst ─┤ (inhibits pvn_crh units)
```

All gains, time constants and manipulations come from a
[`CircuitConfig`](defense_config::CircuitConfig); the defaults reproduce the
published circuit.
*/

pub mod assembly;
pub mod regions;
pub mod stimuli;
pub mod types;

pub use assembly::{assemble_defensive_circuit, circuit_functions, CircuitFunctions, CIRCUIT_TITLE};
pub use regions::{declare_regions, region, RegionSpec, Regions, REGIONS};
pub use stimuli::{declare_stimuli, Stimuli};
pub use types::{TopologyError, TopologyResult};
