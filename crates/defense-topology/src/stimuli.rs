// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Exogenous inputs of the defensive circuit.

The manipulation nodes (`noci_stim`, `opto_stim`) are always declared. When a
manipulation is disabled its node outputs 0 and nothing reads from it.
*/

use defense_config::{CircuitConfig, NociceptiveConfig, OptogeneticConfig};
use defense_network::{CircuitResult, ModelBuilder, Stimulus, StimulusHandle, StimulusKind};

pub const EXPANSION_RATE: &str = "expansion_rate";
pub const OTHER_PROMOTE: &str = "other_promote";
pub const TONIC_GABA: &str = "tonic_gaba";
pub const TONIC_PERIPVN: &str = "tonic_peripvn";
pub const NOCI_STIM: &str = "noci_stim";
pub const OPTO_STIM: &str = "opto_stim";

/// Handles of every declared stimulus
#[derive(Debug, Clone)]
pub struct Stimuli {
    pub expansion_rate: StimulusHandle,
    pub other_promote: StimulusHandle,
    pub tonic_gaba: StimulusHandle,
    pub tonic_peripvn: StimulusHandle,
    pub noci_stim: StimulusHandle,
    pub opto_stim: StimulusHandle,
}

/// Looming stimulus: square wave between 0 and `exp_rate`
pub fn expansion_rate_kind(config: &CircuitConfig) -> StimulusKind {
    StimulusKind::SquareWave {
        peak: config.stimulus.exp_rate,
        frequency_hz: config.stimulus.frequency_hz,
        duty: config.stimulus.duty,
        onset: config.stimulus.onset,
    }
}

/// Nociceptive drive; silent unless enabled
pub fn nociceptive_kind(config: &NociceptiveConfig) -> StimulusKind {
    if config.enabled {
        StimulusKind::tonic(config.amplitude)
    } else {
        StimulusKind::disabled()
    }
}

/// Photostimulation; a pulse when a window is configured, else continuous
pub fn optogenetic_kind(config: &OptogeneticConfig) -> StimulusKind {
    if !config.enabled {
        return StimulusKind::disabled();
    }
    match config.pulse {
        Some(window) => StimulusKind::Pulse {
            amplitude: config.amplitude,
            onset: window.onset,
            duration: window.duration,
        },
        None => StimulusKind::tonic(config.amplitude),
    }
}

/// Declare all stimuli on `builder`
pub fn declare_stimuli(builder: &mut ModelBuilder, config: &CircuitConfig) -> CircuitResult<Stimuli> {
    let manipulations = &config.manipulations;
    Ok(Stimuli {
        expansion_rate: builder.declare_stimulus(
            Stimulus::new(EXPANSION_RATE, expansion_rate_kind(config)).with_label("expansion rate"),
        )?,
        other_promote: builder.declare_stimulus(
            Stimulus::new(OTHER_PROMOTE, StimulusKind::tonic(config.tonic.motor_other))
                .with_label("exploratory drive"),
        )?,
        tonic_gaba: builder.declare_stimulus(
            Stimulus::new(TONIC_GABA, StimulusKind::tonic(config.tonic.vpag_gaba)).with_label("tonic vPAG GABA drive"),
        )?,
        tonic_peripvn: builder.declare_stimulus(
            Stimulus::new(TONIC_PERIPVN, StimulusKind::tonic(config.tonic.peri_pvn)).with_label("tonic peri-PVN drive"),
        )?,
        noci_stim: builder.declare_stimulus(
            Stimulus::new(NOCI_STIM, nociceptive_kind(&manipulations.nociceptive)).with_label("nociceptive stimulation"),
        )?,
        opto_stim: builder.declare_stimulus(
            Stimulus::new(OPTO_STIM, optogenetic_kind(&manipulations.optogenetic))
                .with_label("optogenetic stimulation"),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use defense_config::PulseWindow;

    #[test]
    fn test_default_expansion_matches_published_wave() {
        let kind = expansion_rate_kind(&CircuitConfig::default());
        assert_eq!(kind, StimulusKind::expansion_rate(0.5));
    }

    #[test]
    fn test_manipulations_silent_by_default() {
        let config = CircuitConfig::default();
        assert!(nociceptive_kind(&config.manipulations.nociceptive).is_silent());
        assert!(optogenetic_kind(&config.manipulations.optogenetic).is_silent());
    }

    #[test]
    fn test_optogenetic_pulse() {
        let mut config = OptogeneticConfig::default();
        config.enabled = true;
        config.pulse = Some(PulseWindow {
            onset: 30.0,
            duration: 2.0,
        });
        let kind = optogenetic_kind(&config);
        assert_eq!(kind.evaluate(29.0), 0.0);
        assert_eq!(kind.evaluate(31.0), 1.0);
        assert_eq!(kind.evaluate(32.0), 0.0);

        config.pulse = None;
        assert_eq!(optogenetic_kind(&config), StimulusKind::tonic(1.0));
    }
}
