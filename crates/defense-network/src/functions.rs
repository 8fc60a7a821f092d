// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Signal transformation functions applied on connections before the transform.

The free functions evaluate with the default constants; [`SignalFunction`]
carries the constants explicitly so a connection's function survives
serialization.
*/

use serde::{Deserialize, Serialize};

use crate::types::{ensure_finite, CircuitError, CircuitResult};

/// Target gain of the relay input
pub const B_DESIRED: f64 = 1.0;
/// Synaptic time constant the relay gain is scaled by
pub const ACTUAL_SYNAPSE: f64 = 0.15;
/// Self-reinforcement rate of the leaky recurrent function
pub const A_DESIRED: f64 = 0.0001;
/// Optimal threat imminence (peak of the appraisal curve)
pub const ALPHA: f64 = 0.51;

/// `u * b_desired * actual_synapse` with the default constants
pub fn scale_by_gain(u: f64) -> f64 {
    u * B_DESIRED * ACTUAL_SYNAPSE
}

/// `x + x * a_desired * actual_synapse` with the default constants
pub fn leaky_recurrent(x: f64) -> f64 {
    x + x * A_DESIRED * ACTUAL_SYNAPSE
}

/// Product of two co-packaged components
pub fn elementwise_product(pair: [f64; 2]) -> f64 {
    pair[0] * pair[1]
}

/// Downward parabola `1 - (2/alpha)(alpha - x)^2` peaking at `x = alpha`
pub fn threat_imminence_curve(x: f64) -> f64 {
    threat_imminence(ALPHA, x)
}

fn threat_imminence(alpha: f64, x: f64) -> f64 {
    let offset = alpha - x;
    1.0 - (2.0 / alpha) * offset * offset
}

/// Function evaluated on the source signal of a connection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalFunction {
    ScaleByGain { b_desired: f64, actual_synapse: f64 },
    LeakyRecurrent { a_desired: f64, actual_synapse: f64 },
    ElementwiseProduct,
    ThreatImminence { alpha: f64 },
}

impl SignalFunction {
    pub fn scale_by_gain() -> Self {
        SignalFunction::ScaleByGain {
            b_desired: B_DESIRED,
            actual_synapse: ACTUAL_SYNAPSE,
        }
    }

    pub fn leaky_recurrent() -> Self {
        SignalFunction::LeakyRecurrent {
            a_desired: A_DESIRED,
            actual_synapse: ACTUAL_SYNAPSE,
        }
    }

    pub fn threat_imminence() -> Self {
        SignalFunction::ThreatImminence { alpha: ALPHA }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignalFunction::ScaleByGain { .. } => "scale_by_gain",
            SignalFunction::LeakyRecurrent { .. } => "leaky_recurrent",
            SignalFunction::ElementwiseProduct => "elementwise_product",
            SignalFunction::ThreatImminence { .. } => "threat_imminence",
        }
    }

    /// Output width for an input of `input` dimensions
    pub fn output_dimensions(&self, input: usize) -> CircuitResult<usize> {
        match self {
            SignalFunction::ElementwiseProduct => {
                if input != 2 {
                    return Err(CircuitError::DimensionMismatch {
                        connection: "elementwise_product input".to_string(),
                        expected: 2,
                        actual: input,
                    });
                }
                Ok(1)
            }
            _ => Ok(input),
        }
    }

    /// Evaluate on one sample of the source signal
    pub fn apply(&self, input: &[f64]) -> CircuitResult<Vec<f64>> {
        match *self {
            SignalFunction::ScaleByGain {
                b_desired,
                actual_synapse,
            } => Ok(input.iter().map(|u| u * b_desired * actual_synapse).collect()),
            SignalFunction::LeakyRecurrent {
                a_desired,
                actual_synapse,
            } => Ok(input
                .iter()
                .map(|x| x + x * a_desired * actual_synapse)
                .collect()),
            SignalFunction::ElementwiseProduct => match input {
                [a, b] => Ok(vec![elementwise_product([*a, *b])]),
                _ => Err(CircuitError::DimensionMismatch {
                    connection: "elementwise_product input".to_string(),
                    expected: 2,
                    actual: input.len(),
                }),
            },
            SignalFunction::ThreatImminence { alpha } => {
                Ok(input.iter().map(|x| threat_imminence(alpha, *x)).collect())
            }
        }
    }

    pub fn validate(&self) -> CircuitResult<()> {
        match *self {
            SignalFunction::ScaleByGain {
                b_desired,
                actual_synapse,
            } => {
                ensure_finite("scale_by_gain b_desired", b_desired)?;
                ensure_finite("scale_by_gain actual_synapse", actual_synapse)
            }
            SignalFunction::LeakyRecurrent {
                a_desired,
                actual_synapse,
            } => {
                ensure_finite("leaky_recurrent a_desired", a_desired)?;
                ensure_finite("leaky_recurrent actual_synapse", actual_synapse)
            }
            SignalFunction::ElementwiseProduct => Ok(()),
            SignalFunction::ThreatImminence { alpha } => {
                ensure_finite("threat_imminence alpha", alpha)?;
                if alpha <= 0.0 {
                    return Err(CircuitError::InvalidParameter(format!(
                        "threat_imminence alpha must be > 0, got {}",
                        alpha
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_peak_and_endpoints() {
        assert_eq!(threat_imminence_curve(0.51), 1.0);
        assert_eq!(threat_imminence_curve(0.0), threat_imminence_curve(1.02));
        assert!((threat_imminence_curve(0.0) - (1.0 - 2.0 * 0.51)).abs() < 1e-12);
    }

    #[test]
    fn test_scale_and_leak() {
        assert_eq!(scale_by_gain(2.0), 0.15 * 2.0);
        assert!((leaky_recurrent(1.0) - 1.000015).abs() < 1e-12);
        assert_eq!(elementwise_product([3.0, -2.0]), -6.0);
    }

    #[test]
    fn test_enum_matches_free_functions() {
        let imminence = SignalFunction::threat_imminence();
        assert_eq!(imminence.apply(&[0.3]).unwrap(), vec![threat_imminence_curve(0.3)]);
        assert_eq!(
            SignalFunction::scale_by_gain().apply(&[4.0]).unwrap(),
            vec![scale_by_gain(4.0)]
        );
        assert_eq!(
            SignalFunction::ElementwiseProduct.apply(&[2.0, 0.5]).unwrap(),
            vec![1.0]
        );
    }

    #[test]
    fn test_product_requires_pair() {
        assert_eq!(SignalFunction::ElementwiseProduct.output_dimensions(2), Ok(1));
        assert!(SignalFunction::ElementwiseProduct.output_dimensions(1).is_err());
        assert!(SignalFunction::ElementwiseProduct.apply(&[1.0]).is_err());
        assert_eq!(SignalFunction::threat_imminence().output_dimensions(3), Ok(3));
    }

    #[test]
    fn test_alpha_must_be_positive() {
        assert!(SignalFunction::ThreatImminence { alpha: 0.0 }.validate().is_err());
        assert!(SignalFunction::threat_imminence().validate().is_ok());
    }
}
