// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Full-circuit assembly tests

use std::collections::BTreeMap;

use defense_config::{CircuitConfig, OptoTarget, PulseWindow};
use defense_network::{
    expansion_rate_stimulus, load_model_from_json, save_model_to_json, CircuitError, EncoderConstraint,
    InterceptDistribution, Model, SignalFunction, StimulusKind, Subcircuit, Transform, UnitWeights,
};
use defense_topology::{assemble_defensive_circuit, TopologyError, REGIONS};
use proptest::prelude::*;

use Subcircuit::{Assumption, Experiment, MotorCommand, SensorimotorIntegration, VisualThreatDetection};

/// (description, gain, synapse, sub-circuit) of every default connection
fn expected_connections() -> Vec<(&'static str, f64, Option<f64>, Subcircuit)> {
    vec![
        // Visual threat detection
        ("sc[0] -> thal[0]", 1.0, None, VisualThreatDetection),
        ("thal[0] -> la[0]", 1.0, None, VisualThreatDetection),
        // Motor command production
        ("other_promote -> motor[0]", 1.0, None, MotorCommand),
        ("vpag_glu -> medulla", 1.0, None, MotorCommand),
        ("medulla -> motor.neurons", -5000.0, None, MotorCommand),
        ("tonic_gaba -> vpag_gaba", 1.0, None, MotorCommand),
        ("vpag_gaba -> vpag_glu.neurons", -10.0, None, MotorCommand),
        ("vmh -> ahn", 1.0, Some(0.01), MotorCommand),
        ("ahn -> ahn", 0.9, Some(0.01), MotorCommand),
        ("ahn -> vpag_glu", 1.0, None, MotorCommand),
        ("vmh -> dpag", 0.9, Some(0.1), MotorCommand),
        ("dpag -> vmh", 0.9, Some(0.1), MotorCommand),
        ("dpag -> motor[0]", 1.0, None, MotorCommand),
        ("dpag -> motor[1]", 1.0, None, MotorCommand),
        ("dpag -> vpag_gaba", 0.25, None, MotorCommand),
        ("vmh -> dmh", 0.2, None, MotorCommand),
        ("ahn -> dmh", -0.1, None, MotorCommand),
        ("pbn -> vmh", 1.0, None, MotorCommand),
        ("dmh -> pvn_crh", 1.0, None, MotorCommand),
        ("cea -> peri_pvn.neurons", -10.0, None, MotorCommand),
        ("tonic_peripvn -> peri_pvn", 1.0, None, MotorCommand),
        ("peri_pvn -> pvn_crh.neurons", -1.0, None, MotorCommand),
        // Sensorimotor integration
        ("la[0] -> bma[0]", 1.0, None, SensorimotorIntegration),
        ("bma[0] -> vmh", 1.0, None, SensorimotorIntegration),
        ("bma[0] -> ahn", 1.0, None, SensorimotorIntegration),
        ("pbn -> cea", 0.1, None, SensorimotorIntegration),
        ("cea -> vpag_gaba.neurons", -10.0 * 0.1, None, SensorimotorIntegration),
        ("bma[0] -> cea", 1.0, None, SensorimotorIntegration),
        ("bma[0] -> bnst", 1.0, None, SensorimotorIntegration),
        ("bnst -> pvn_crh.neurons", -1.0 * 1.3, None, SensorimotorIntegration),
        ("pvn_crh -> lh", 1.0, None, SensorimotorIntegration),
        ("lh -> dpag", 1.0, None, SensorimotorIntegration),
        // Assumptions
        ("expansion_rate -> pvn_crh", 1.0, None, Assumption),
        // Experiments
        ("expansion_rate -> sc[0]", 1.0, Some(0.15), Experiment),
    ]
}

fn default_circuit() -> Model {
    assemble_defensive_circuit(&CircuitConfig::default()).expect("Default circuit should assemble")
}

// ============================================================================
// Default topology
// ============================================================================

#[test]
fn test_default_node_and_connection_counts() {
    let model = default_circuit();
    assert_eq!(model.populations().len(), 18);
    assert_eq!(model.stimuli().len(), 6);
    assert_eq!(model.node_count(), 24);
    assert_eq!(model.connections().len(), 34);

    let stats = model.stats();
    assert_eq!(stats.total_neurons, REGIONS.iter().map(|r| r.neurons).sum::<usize>());
    assert_eq!(stats.total_neurons, 6400);
    assert_eq!(stats.raw_unit_connections, 6);
    // expansion rate, other_promote and the two tonic drives
    assert_eq!(stats.active_stimuli, 4);
}

#[test]
fn test_default_edge_set_and_parameters() {
    let model = default_circuit();

    let actual: BTreeMap<String, (Option<f64>, Option<f64>, Option<Subcircuit>)> = model
        .connections()
        .iter()
        .map(|c| (c.describe(), (c.transform.gain(), c.synapse, c.subcircuit)))
        .collect();
    assert_eq!(actual.len(), 34, "connection descriptions should be unique");

    for (description, gain, synapse, subcircuit) in expected_connections() {
        let (actual_gain, actual_synapse, actual_subcircuit) = actual
            .get(description)
            .unwrap_or_else(|| panic!("missing connection {}", description));
        assert_eq!(*actual_gain, Some(gain), "gain of {}", description);
        assert_eq!(*actual_synapse, synapse, "synapse of {}", description);
        assert_eq!(*actual_subcircuit, Some(subcircuit), "sub-circuit of {}", description);
    }
}

#[test]
fn test_subcircuit_sizes() {
    let model = default_circuit();
    assert_eq!(model.connections_in(VisualThreatDetection).len(), 2);
    assert_eq!(model.connections_in(MotorCommand).len(), 20);
    assert_eq!(model.connections_in(SensorimotorIntegration).len(), 10);
    assert_eq!(model.connections_in(Assumption).len(), 1);
    assert_eq!(model.connections_in(Experiment).len(), 1);
}

#[test]
fn test_raw_unit_inhibition_is_uniform() {
    let model = default_circuit();
    for connection in model.connections().iter().filter(|c| c.target.is_neurons()) {
        assert!(
            matches!(connection.transform, Transform::Neurons(UnitWeights::Uniform(_))),
            "{} should be a uniform broadcast",
            connection.describe()
        );
    }
}

#[test]
fn test_appraisal_function_and_tuning() {
    let model = default_circuit();
    let (_, appraisal) = model
        .incoming("vmh")
        .into_iter()
        .find(|(_, c)| c.function.is_some())
        .expect("bma -> vmh should carry a function");
    assert_eq!(appraisal.function, Some(SignalFunction::ThreatImminence { alpha: 0.51 }));

    for name in ["ahn", "pvn_crh"] {
        let population = model.population(name).unwrap();
        assert_eq!(population.encoders, Some(EncoderConstraint::positive()));
        assert_eq!(population.intercepts, Some(InterceptDistribution::Uniform { low: 0.0, high: 1.0 }));
    }
    assert_eq!(model.population("motor").unwrap().dimensions, 2);
    assert_eq!(model.population("vmh").unwrap().radius, 10.0);
}

#[test]
fn test_default_stimuli() {
    let model = default_circuit();
    let stim = model.stimulus("expansion_rate").unwrap();
    assert_eq!(stim.label.as_deref(), Some("expansion rate"));
    for t in [0.0, 1.0, 3.5, 6.0, 11.0, 16.0, 123.4] {
        assert_eq!(stim.evaluate(t), expansion_rate_stimulus(0.5, t));
    }
    assert_eq!(model.stimulus("other_promote").unwrap().kind, StimulusKind::tonic(1.0));
    assert_eq!(model.stimulus("tonic_gaba").unwrap().kind, StimulusKind::tonic(0.1));
    assert_eq!(model.stimulus("tonic_peripvn").unwrap().kind, StimulusKind::tonic(0.1));
    assert!(model.stimulus("noci_stim").unwrap().kind.is_silent());
    assert!(model.stimulus("opto_stim").unwrap().kind.is_silent());
    assert!(model.outgoing("noci_stim").is_empty());
    assert!(model.outgoing("opto_stim").is_empty());
}

// ============================================================================
// Manipulations
// ============================================================================

#[test]
fn test_nociceptive_stimulation_adds_one_connection() {
    let mut config = CircuitConfig::default();
    config.manipulations.nociceptive.enabled = true;
    let model = assemble_defensive_circuit(&config).unwrap();

    assert_eq!(model.connections().len(), 35);
    let outgoing = model.outgoing("noci_stim");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].1.describe(), "noci_stim -> pbn");
    assert_eq!(model.stimulus("noci_stim").unwrap().evaluate(5.0), 1.0);
}

#[test]
fn test_nociceptive_stimulation_follows_configured_target() {
    let mut config = CircuitConfig::default();
    config.manipulations.nociceptive.enabled = true;
    config.manipulations.nociceptive.target = "lh".to_string();
    let model = assemble_defensive_circuit(&config).unwrap();

    assert_eq!(model.connections().len(), 35);
    let outgoing = model.outgoing("noci_stim");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].1.describe(), "noci_stim -> lh");
    assert_eq!(outgoing[0].1.subcircuit, Some(Experiment));
    assert!(model.incoming("pbn").iter().all(|(_, c)| c.source.node() != "noci_stim"));
}

#[test]
fn test_nociceptive_target_must_be_a_compatible_region() {
    let mut config = CircuitConfig::default();
    config.manipulations.nociceptive.enabled = true;

    config.manipulations.nociceptive.target = "amygdala".to_string();
    assert!(matches!(
        assemble_defensive_circuit(&config),
        Err(TopologyError::Circuit(CircuitError::UnknownPopulation(name))) if name == "amygdala"
    ));

    config.manipulations.nociceptive.target = "motor".to_string();
    assert!(matches!(
        assemble_defensive_circuit(&config),
        Err(TopologyError::Circuit(CircuitError::DimensionMismatch { expected: 2, actual: 1, .. }))
    ));

    // A disabled manipulation never looks its target up
    config.manipulations.nociceptive.enabled = false;
    config.manipulations.nociceptive.target = "amygdala".to_string();
    assert_eq!(assemble_defensive_circuit(&config).unwrap().connections().len(), 34);
}

#[test]
fn test_optogenetic_dpag_stimulation() {
    let mut config = CircuitConfig::default();
    config.manipulations.optogenetic.enabled = true;
    config.manipulations.optogenetic.pulse = Some(PulseWindow {
        onset: 20.0,
        duration: 2.0,
    });
    let model = assemble_defensive_circuit(&config).unwrap();

    assert_eq!(model.connections().len(), 35);
    let outgoing = model.outgoing("opto_stim");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].1.describe(), "opto_stim -> dpag");
    assert_eq!(outgoing[0].1.synapse, None);

    let opto = model.stimulus("opto_stim").unwrap();
    assert_eq!(opto.evaluate(19.9), 0.0);
    assert_eq!(opto.evaluate(21.0), 1.0);
    assert_eq!(opto.evaluate(22.0), 0.0);
}

#[test]
fn test_optogenetic_vmh_stimulation_uses_vmh_time_constant() {
    let mut config = CircuitConfig::default();
    config.manipulations.optogenetic.enabled = true;
    config.manipulations.optogenetic.target = OptoTarget::Vmh;
    config.synapses.tau_vmh = 0.2;
    let model = assemble_defensive_circuit(&config).unwrap();

    let outgoing = model.outgoing("opto_stim");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].1.describe(), "opto_stim -> vmh");
    assert_eq!(outgoing[0].1.synapse, Some(0.2));
    assert_eq!(model.connections().len(), 35);
}

#[test]
fn test_overridden_assumptions_flow_into_the_model() {
    let mut config = CircuitConfig::default();
    config.gains.ahn_recurrent = 0.5;
    config.gains.bma_ahn = 0.0;
    config.functions.alpha = 0.6;
    let model = assemble_defensive_circuit(&config).unwrap();

    let gain_of = |description: &str| {
        model
            .connections()
            .iter()
            .find(|c| c.describe() == description)
            .and_then(|c| c.transform.gain())
    };
    assert_eq!(gain_of("ahn -> ahn"), Some(0.5));
    assert_eq!(gain_of("bma[0] -> ahn"), Some(0.0));
    assert!(model
        .connections()
        .iter()
        .any(|c| c.function == Some(SignalFunction::ThreatImminence { alpha: 0.6 })));
}

// ============================================================================
// Failures and serialization
// ============================================================================

#[test]
fn test_invalid_config_is_rejected_before_declaration() {
    let mut config = CircuitConfig::default();
    config.stimulus.exp_rate = 1.5;
    assert!(matches!(
        assemble_defensive_circuit(&config),
        Err(TopologyError::Config(_))
    ));
}

#[test]
fn test_circuit_error_converts() {
    let err: TopologyError = CircuitError::UnknownPopulation("ghost".to_string()).into();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_blueprint_round_trip_of_full_circuit() {
    let model = default_circuit();
    let json = save_model_to_json(&model).unwrap();
    let restored = load_model_from_json(&json).unwrap();
    assert_eq!(restored, model);
}

proptest! {
    #[test]
    fn any_valid_exp_rate_assembles(exp_rate in 0.1f64..=0.9) {
        let mut config = CircuitConfig::default();
        config.stimulus.exp_rate = exp_rate;
        let model = assemble_defensive_circuit(&config).unwrap();
        prop_assert_eq!(model.connections().len(), 34);
        prop_assert_eq!(model.stimulus("expansion_rate").unwrap().evaluate(1.0), exp_rate);
    }
}
