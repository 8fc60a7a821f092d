// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Brain regions of the defensive circuit.

Sizes, dimensionality and radii are load-bearing: the radius sets the range a
region can represent before saturating (e.g. VMH integrates up to 10, dPAG
and AHN up to 5).
*/

use defense_network::{
    CircuitResult, EncoderConstraint, InterceptDistribution, ModelBuilder, Population, PopulationHandle,
};
use tracing::debug;

pub const SC: &str = "sc";
pub const THAL: &str = "thal";
pub const LA: &str = "la";
pub const BMA: &str = "bma";
pub const BNST: &str = "bnst";
pub const CEA: &str = "cea";
pub const PERI_PVN: &str = "peri_pvn";
pub const AHN: &str = "ahn";
pub const VMH: &str = "vmh";
pub const DMH: &str = "dmh";
pub const PVN_CRH: &str = "pvn_crh";
pub const DPAG: &str = "dpag";
pub const VPAG_GABA: &str = "vpag_gaba";
pub const VPAG_GLU: &str = "vpag_glu";
pub const MEDULLA: &str = "medulla";
pub const PBN: &str = "pbn";
pub const LH: &str = "lh";
pub const MOTOR: &str = "motor";

/// Motor dimension driving behaviours other than escape
pub const MOTOR_OTHER: usize = 0;
/// Motor dimension driving escape
pub const MOTOR_ESCAPE: usize = 1;

/// Static description of one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSpec {
    pub name: &'static str,
    pub neurons: usize,
    pub dimensions: usize,
    pub radius: f64,
    /// Units respond to positive input only, thresholds drawn from U(0, 1)
    pub positive_only: bool,
    pub description: &'static str,
}

impl RegionSpec {
    const fn new(name: &'static str, neurons: usize, dimensions: usize, radius: f64, description: &'static str) -> Self {
        Self {
            name,
            neurons,
            dimensions,
            radius,
            positive_only: false,
            description,
        }
    }

    const fn positive_only(mut self) -> Self {
        self.positive_only = true;
        self
    }

    pub fn to_population(&self) -> Population {
        let population =
            Population::new(self.name, self.neurons, self.dimensions, self.radius).with_label(self.description);
        if self.positive_only {
            population
                .with_encoders(EncoderConstraint::positive())
                .with_intercepts(InterceptDistribution::Uniform { low: 0.0, high: 1.0 })
        } else {
            population
        }
    }
}

/// Every region in declaration order
pub const REGIONS: [RegionSpec; 18] = [
    RegionSpec::new(SC, 400, 1, 1.0, "superior colliculus"),
    RegionSpec::new(THAL, 600, 1, 1.0, "thalamus"),
    RegionSpec::new(LA, 400, 1, 1.0, "lateral amygdala"),
    RegionSpec::new(BMA, 400, 1, 1.0, "basomedial amygdala"),
    RegionSpec::new(BNST, 200, 1, 2.0, "bed nucleus of the stria terminalis"),
    RegionSpec::new(CEA, 200, 1, 1.0, "central amygdala"),
    RegionSpec::new(PERI_PVN, 200, 1, 1.0, "peri-paraventricular nucleus"),
    RegionSpec::new(AHN, 600, 1, 5.0, "anterior hypothalamic nucleus").positive_only(),
    RegionSpec::new(VMH, 600, 1, 10.0, "ventromedial hypothalamus"),
    RegionSpec::new(DMH, 200, 1, 1.0, "dorsomedial hypothalamus"),
    RegionSpec::new(PVN_CRH, 200, 1, 1.0, "paraventricular nucleus, CRH cells").positive_only(),
    RegionSpec::new(DPAG, 800, 1, 5.0, "dorsal periaqueductal gray"),
    RegionSpec::new(VPAG_GABA, 200, 1, 1.0, "ventral PAG, GABAergic cells"),
    RegionSpec::new(VPAG_GLU, 200, 1, 1.0, "ventral PAG, glutamatergic cells"),
    RegionSpec::new(MEDULLA, 200, 1, 1.0, "medulla"),
    RegionSpec::new(PBN, 200, 1, 5.0, "parabrachial nucleus"),
    RegionSpec::new(LH, 200, 1, 1.0, "lateral hypothalamus"),
    RegionSpec::new(MOTOR, 600, 2, 5.0, "motor output (0: other, 1: escape)"),
];

/// Handles of every declared region
#[derive(Debug, Clone)]
pub struct Regions {
    pub sc: PopulationHandle,
    pub thal: PopulationHandle,
    pub la: PopulationHandle,
    pub bma: PopulationHandle,
    pub bnst: PopulationHandle,
    pub cea: PopulationHandle,
    pub peri_pvn: PopulationHandle,
    pub ahn: PopulationHandle,
    pub vmh: PopulationHandle,
    pub dmh: PopulationHandle,
    pub pvn_crh: PopulationHandle,
    pub dpag: PopulationHandle,
    pub vpag_gaba: PopulationHandle,
    pub vpag_glu: PopulationHandle,
    pub medulla: PopulationHandle,
    pub pbn: PopulationHandle,
    pub lh: PopulationHandle,
    pub motor: PopulationHandle,
}

/// Declare all regions on `builder`
pub fn declare_regions(builder: &mut ModelBuilder) -> CircuitResult<Regions> {
    for region in &REGIONS {
        builder.declare_population(region.to_population())?;
    }
    debug!(target: "defense-topology", "Declared {} regions", REGIONS.len());

    Ok(Regions {
        sc: builder.population_handle(SC)?,
        thal: builder.population_handle(THAL)?,
        la: builder.population_handle(LA)?,
        bma: builder.population_handle(BMA)?,
        bnst: builder.population_handle(BNST)?,
        cea: builder.population_handle(CEA)?,
        peri_pvn: builder.population_handle(PERI_PVN)?,
        ahn: builder.population_handle(AHN)?,
        vmh: builder.population_handle(VMH)?,
        dmh: builder.population_handle(DMH)?,
        pvn_crh: builder.population_handle(PVN_CRH)?,
        dpag: builder.population_handle(DPAG)?,
        vpag_gaba: builder.population_handle(VPAG_GABA)?,
        vpag_glu: builder.population_handle(VPAG_GLU)?,
        medulla: builder.population_handle(MEDULLA)?,
        pbn: builder.population_handle(PBN)?,
        lh: builder.population_handle(LH)?,
        motor: builder.population_handle(MOTOR)?,
    })
}

/// Look up a region by name
pub fn region(name: &str) -> Option<&'static RegionSpec> {
    REGIONS.iter().find(|r| r.name == name)
}
