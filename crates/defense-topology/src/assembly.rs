// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Defensive circuit assembly.

Builds the whole circuit from a [`CircuitConfig`] in four stages:

1. **Validation**: the parameter set is range-checked
2. **Regions**: every population is declared
3. **Stimuli**: every exogenous input is declared
4. **Wiring**: connections are declared sub-circuit by sub-circuit

Assembly is all-or-nothing. The builder is owned by the call, so on any error
it is dropped and no partial model escapes.
*/

use defense_config::{validate_config, CircuitConfig, FunctionConfig, OptoTarget};
use defense_network::{
    Connection, Model, ModelBuilder, PopulationHandle, SignalFunction, Subcircuit, UnitWeights,
};
use ndarray::Array2;
use tracing::{debug, info};

use crate::regions::{declare_regions, Regions, MOTOR_ESCAPE, MOTOR_OTHER};
use crate::stimuli::{declare_stimuli, Stimuli};
use crate::types::TopologyResult;

/// Title recorded in the model metadata
pub const CIRCUIT_TITLE: &str = "defensive behaviour circuit";

/// Functions built from the configured constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitFunctions {
    /// Relay input scaling, `u * b_desired * actual_synapse`
    pub relay: SignalFunction,
    /// Near-identity recurrence, `x + x * a_desired * actual_synapse`
    pub recurrent: SignalFunction,
    /// Appraisal curve converting BMA output into VMH drive
    pub imminence: SignalFunction,
}

pub fn circuit_functions(config: &FunctionConfig) -> CircuitFunctions {
    CircuitFunctions {
        relay: SignalFunction::ScaleByGain {
            b_desired: config.b_desired,
            actual_synapse: config.actual_synapse,
        },
        recurrent: SignalFunction::LeakyRecurrent {
            a_desired: config.a_desired,
            actual_synapse: config.actual_synapse,
        },
        imminence: SignalFunction::ThreatImminence { alpha: config.alpha },
    }
}

/// Assemble the complete circuit described by `config`
///
/// # Errors
///
/// Returns [`TopologyError::Config`](crate::TopologyError::Config) when the
/// parameters fail validation and
/// [`TopologyError::Circuit`](crate::TopologyError::Circuit) when a
/// declaration is rejected.
pub fn assemble_defensive_circuit(config: &CircuitConfig) -> TopologyResult<Model> {
    info!(target: "defense-topology", "Assembling {} (exp_rate {})", CIRCUIT_TITLE, config.stimulus.exp_rate);

    // Stage 1: Validation
    validate_config(config)?;

    let mut builder = ModelBuilder::new(CIRCUIT_TITLE).with_description(
        "Superior colliculus to thalamus/amygdala to hypothalamus to PAG to motor output",
    );

    // Stage 2: Regions
    let regions = declare_regions(&mut builder)?;

    // Stage 3: Stimuli
    let stimuli = declare_stimuli(&mut builder, config)?;

    // Stage 4: Wiring
    let functions = circuit_functions(&config.functions);
    wire_visual_threat_detection(&mut builder, &regions)?;
    wire_motor_command(&mut builder, &regions, &stimuli, config)?;
    wire_sensorimotor_integration(&mut builder, &regions, config, &functions)?;
    wire_assumptions(&mut builder, &regions, &stimuli, config)?;
    wire_experiments(&mut builder, &regions, &stimuli, config)?;

    let model = builder.build();
    let stats = model.stats();
    info!(
        target: "defense-topology",
        "Assembled circuit: {} populations ({} neurons), {} stimuli, {} connections",
        stats.populations,
        stats.total_neurons,
        stats.stimuli,
        stats.connections
    );
    Ok(model)
}

/// Same weight for every unit of `target`, one column per source dimension
fn uniform_weights(target: &PopulationHandle, weight: f64) -> UnitWeights {
    UnitWeights::PerUnit(Array2::from_elem((target.neuron_count(), 1), weight))
}

fn wire_visual_threat_detection(builder: &mut ModelBuilder, r: &Regions) -> TopologyResult<()> {
    let tag = Subcircuit::VisualThreatDetection;
    builder.connect(Connection::new(r.sc.component(0)?, r.thal.component(0)?).in_subcircuit(tag))?;
    builder.connect(Connection::new(r.thal.component(0)?, r.la.component(0)?).in_subcircuit(tag))?;
    debug!(target: "defense-topology", "Wired visual threat detection");
    Ok(())
}

fn wire_motor_command(
    builder: &mut ModelBuilder,
    r: &Regions,
    s: &Stimuli,
    config: &CircuitConfig,
) -> TopologyResult<()> {
    let tag = Subcircuit::MotorCommand;
    let gains = &config.gains;
    let synapses = &config.synapses;
    let inhibition = &config.inhibition;

    builder.connect(
        Connection::new(&s.other_promote, r.motor.component(MOTOR_OTHER)?)
            .in_subcircuit(tag)
            .with_label("exploratory noise"),
    )?;

    // vPAG glutamatergic cells promote freezing via the medulla (Tovote 2016)
    builder.connect(Connection::new(&r.vpag_glu, &r.medulla).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(&r.medulla, r.motor.neurons())
            .with_unit_weights(uniform_weights(&r.motor, inhibition.medulla_to_motor))
            .in_subcircuit(tag)
            .with_label("freezing motor suppression"),
    )?;

    // Tonically active local GABA cells gate vPAG output
    builder.connect(Connection::new(&s.tonic_gaba, &r.vpag_gaba).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(&r.vpag_gaba, r.vpag_glu.neurons())
            .with_unit_weights(uniform_weights(&r.vpag_glu, inhibition.vpag_gaba_to_vpag_glu))
            .in_subcircuit(tag)
            .with_label("disinhibition gate"),
    )?;

    // Competitive leaky integrators in VMH, dPAG and AHN
    builder.connect(
        Connection::new(&r.vmh, &r.ahn)
            .with_synapse(synapses.tau_ahn)
            .in_subcircuit(tag),
    )?;
    builder.connect(
        Connection::new(&r.ahn, &r.ahn)
            .with_gain(gains.ahn_recurrent)
            .with_synapse(synapses.tau_ahn)
            .in_subcircuit(tag)
            .with_label("assumption: AHN self-excitation"),
    )?;
    builder.connect(Connection::new(&r.ahn, &r.vpag_glu).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(&r.vmh, &r.dpag)
            .with_gain(gains.vmh_dpag)
            .with_synapse(synapses.tau_dpag)
            .in_subcircuit(tag),
    )?;
    builder.connect(
        Connection::new(&r.dpag, &r.vmh)
            .with_gain(gains.dpag_vmh)
            .with_synapse(synapses.tau_vmh)
            .in_subcircuit(tag),
    )?;

    builder.connect(
        Connection::new(&r.dpag, r.motor.component(MOTOR_OTHER)?)
            .in_subcircuit(tag)
            .with_label("assumption: activity bursting"),
    )?;
    builder.connect(
        Connection::new(&r.dpag, r.motor.component(MOTOR_ESCAPE)?)
            .in_subcircuit(tag)
            .with_label("assumption: activity bursting"),
    )?;
    builder.connect(
        Connection::new(&r.dpag, &r.vpag_gaba)
            .with_gain(gains.dpag_vpag_gaba)
            .in_subcircuit(tag)
            .with_label("freeze suppression"),
    )?;

    builder.connect(
        Connection::new(&r.vmh, &r.dmh)
            .with_gain(gains.vmh_dmh)
            .in_subcircuit(tag)
            .with_label("assumption: scaled VMH relay"),
    )?;
    builder.connect(
        Connection::new(&r.ahn, &r.dmh)
            .with_gain(gains.ahn_dmh)
            .in_subcircuit(tag)
            .with_label("assumption: scaled AHN relay"),
    )?;
    builder.connect(
        Connection::new(&r.pbn, &r.vmh)
            .in_subcircuit(tag)
            .with_label("assumption: PBN to VMH"),
    )?;
    builder.connect(Connection::new(&r.dmh, &r.pvn_crh).in_subcircuit(tag))?;

    builder.connect(
        Connection::new(&r.cea, r.peri_pvn.neurons())
            .with_unit_weights(uniform_weights(&r.peri_pvn, inhibition.cea_to_peri_pvn))
            .in_subcircuit(tag),
    )?;
    builder.connect(Connection::new(&s.tonic_peripvn, &r.peri_pvn).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(&r.peri_pvn, r.pvn_crh.neurons())
            .with_unit_weights(uniform_weights(&r.pvn_crh, inhibition.peri_pvn_to_pvn))
            .in_subcircuit(tag),
    )?;

    debug!(target: "defense-topology", "Wired motor command production");
    Ok(())
}

fn wire_sensorimotor_integration(
    builder: &mut ModelBuilder,
    r: &Regions,
    config: &CircuitConfig,
    functions: &CircuitFunctions,
) -> TopologyResult<()> {
    let tag = Subcircuit::SensorimotorIntegration;
    let gains = &config.gains;
    let inhibition = &config.inhibition;

    builder.connect(Connection::new(r.la.component(0)?, r.bma.component(0)?).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(r.bma.component(0)?, &r.vmh)
            .with_function(functions.imminence)
            .in_subcircuit(tag)
            .with_label("threat appraisal"),
    )?;
    builder.connect(
        Connection::new(r.bma.component(0)?, &r.ahn)
            .with_gain(gains.bma_ahn)
            .in_subcircuit(tag)
            .with_label("assumption: BMA to AHN"),
    )?;

    // CeA promotes freezing by inhibiting vPAG GABA cells (Tovote 2016)
    builder.connect(Connection::new(&r.pbn, &r.cea).with_gain(gains.pbn_cea).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(&r.cea, r.vpag_gaba.neurons())
            .with_unit_weights(uniform_weights(&r.vpag_gaba, inhibition.cea_to_vpag_gaba))
            .in_subcircuit(tag)
            .with_label("freezing promotion"),
    )?;
    builder.connect(Connection::new(r.bma.component(0)?, &r.cea).in_subcircuit(tag))?;

    builder.connect(Connection::new(r.bma.component(0)?, &r.bnst).in_subcircuit(tag))?;
    builder.connect(
        Connection::new(&r.bnst, r.pvn_crh.neurons())
            .with_unit_weights(uniform_weights(&r.pvn_crh, inhibition.bnst_to_pvn))
            .in_subcircuit(tag),
    )?;

    builder.connect(Connection::new(&r.pvn_crh, &r.lh).in_subcircuit(tag))?;
    builder.connect(Connection::new(&r.lh, &r.dpag).in_subcircuit(tag))?;

    debug!(target: "defense-topology", "Wired sensorimotor integration");
    Ok(())
}

fn wire_assumptions(
    builder: &mut ModelBuilder,
    r: &Regions,
    s: &Stimuli,
    config: &CircuitConfig,
) -> TopologyResult<()> {
    builder.connect(
        Connection::new(&s.expansion_rate, &r.pvn_crh)
            .with_gain(config.gains.expansion_pvn)
            .in_subcircuit(Subcircuit::Assumption)
            .with_label("assumption: looming drives PVN"),
    )?;
    Ok(())
}

fn wire_experiments(
    builder: &mut ModelBuilder,
    r: &Regions,
    s: &Stimuli,
    config: &CircuitConfig,
) -> TopologyResult<()> {
    let tag = Subcircuit::Experiment;
    let manipulations = &config.manipulations;

    builder.connect(
        Connection::new(&s.expansion_rate, r.sc.component(0)?)
            .with_synapse(config.synapses.stimulus_input)
            .in_subcircuit(tag)
            .with_label("primary threat input"),
    )?;

    let noci = &manipulations.nociceptive;
    if noci.enabled {
        info!(
            target: "defense-topology",
            "Nociceptive stimulation of {} enabled (amplitude {})",
            noci.target,
            noci.amplitude
        );
        let target = builder.population_handle(&noci.target)?;
        builder.connect(
            Connection::new(&s.noci_stim, &target)
                .in_subcircuit(tag)
                .with_label("nociceptive stimulation"),
        )?;
    }

    let opto = &manipulations.optogenetic;
    if opto.enabled {
        info!(
            target: "defense-topology",
            "Optogenetic stimulation of {} enabled (amplitude {})",
            opto.target,
            opto.amplitude
        );
        let connection = match opto.target {
            // Deng 2018: dPAG photostimulation induces near-instantaneous flight
            OptoTarget::Dpag => Connection::new(&s.opto_stim, &r.dpag),
            // Kunwar 2015: VMH stimulation causes a freezing to burst transition
            OptoTarget::Vmh => {
                Connection::new(&s.opto_stim, &r.vmh).with_synapse(config.synapses.tau_vmh)
            }
        };
        builder.connect(
            connection
                .in_subcircuit(tag)
                .with_label("optogenetic stimulation"),
        )?;
    }

    debug!(target: "defense-topology", "Wired experiments");
    Ok(())
}
