//! Conductor Table and Ampacity Derating
//!
//! Copper DC resistance follows NEC Chapter 9 Table 8 (uncoated, Ω per
//! 1000 ft). Ampacity columns for 14 AWG and larger are the NEC 310.16
//! 60/75/90 °C copper values; 18 and 16 AWG, which that table does not list
//! for building wire, extend the columns downward. Aluminum values are scaled
//! from the copper row.

use serde::{Deserialize, Serialize};

use super::gauge::Gauge;
use crate::model::ConductorMaterial;

/// Aluminum resistance relative to copper of the same gauge.
pub const ALUMINUM_RESISTANCE_FACTOR: f64 = 1.64;

/// Aluminum ampacity relative to copper of the same gauge.
pub const ALUMINUM_AMPACITY_FACTOR: f64 = 0.78;

/// Insulation temperature rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsulationRating {
    #[serde(rename = "60C", alias = "60")]
    C60,
    #[default]
    #[serde(rename = "75C", alias = "75")]
    C75,
    #[serde(rename = "90C", alias = "90")]
    C90,
}

impl InsulationRating {
    pub fn celsius(&self) -> u32 {
        match self {
            InsulationRating::C60 => 60,
            InsulationRating::C75 => 75,
            InsulationRating::C90 => 90,
        }
    }

    pub fn from_celsius(c: u32) -> Option<Self> {
        match c {
            60 => Some(InsulationRating::C60),
            75 => Some(InsulationRating::C75),
            90 => Some(InsulationRating::C90),
            _ => None,
        }
    }
}

/// One copper row: resistance and ampacity by insulation rating.
#[derive(Debug, Clone, Copy)]
struct CopperRow {
    ohms_per_kft: f64,
    ampacity: [f64; 3],
}

const COPPER_TABLE: [CopperRow; 14] = [
    CopperRow { ohms_per_kft: 7.77, ampacity: [10.0, 14.0, 16.0] },    // 18
    CopperRow { ohms_per_kft: 4.89, ampacity: [13.0, 18.0, 22.0] },    // 16
    CopperRow { ohms_per_kft: 3.07, ampacity: [15.0, 20.0, 25.0] },    // 14
    CopperRow { ohms_per_kft: 1.93, ampacity: [20.0, 25.0, 30.0] },    // 12
    CopperRow { ohms_per_kft: 1.21, ampacity: [30.0, 35.0, 40.0] },    // 10
    CopperRow { ohms_per_kft: 0.764, ampacity: [40.0, 50.0, 55.0] },   // 8
    CopperRow { ohms_per_kft: 0.491, ampacity: [55.0, 65.0, 75.0] },   // 6
    CopperRow { ohms_per_kft: 0.308, ampacity: [70.0, 85.0, 95.0] },   // 4
    CopperRow { ohms_per_kft: 0.194, ampacity: [95.0, 115.0, 130.0] }, // 2
    CopperRow { ohms_per_kft: 0.154, ampacity: [110.0, 130.0, 145.0] }, // 1
    CopperRow { ohms_per_kft: 0.122, ampacity: [125.0, 150.0, 170.0] }, // 1/0
    CopperRow { ohms_per_kft: 0.0967, ampacity: [145.0, 175.0, 195.0] }, // 2/0
    CopperRow { ohms_per_kft: 0.0766, ampacity: [165.0, 200.0, 225.0] }, // 3/0
    CopperRow { ohms_per_kft: 0.0608, ampacity: [195.0, 230.0, 260.0] }, // 4/0
];

/// Electrical properties of one gauge in one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConductorSpec {
    pub gauge: Gauge,
    pub material: ConductorMaterial,
    /// Ω per 1000 ft.
    pub ohms_per_kft: f64,
    /// Table ampacity at 60/75/90 °C (A).
    pub ampacity: [f64; 3],
}

impl ConductorSpec {
    pub fn lookup(gauge: Gauge, material: ConductorMaterial) -> Self {
        let row = COPPER_TABLE[gauge.index()];
        let (r_factor, a_factor) = match material {
            ConductorMaterial::Copper => (1.0, 1.0),
            ConductorMaterial::Aluminum => (ALUMINUM_RESISTANCE_FACTOR, ALUMINUM_AMPACITY_FACTOR),
        };
        Self {
            gauge,
            material,
            ohms_per_kft: row.ohms_per_kft * r_factor,
            ampacity: row.ampacity.map(|a| a * a_factor),
        }
    }

    pub fn ohms_per_foot(&self) -> f64 {
        self.ohms_per_kft / 1000.0
    }

    pub fn table_ampacity(&self, insulation: InsulationRating) -> f64 {
        match insulation {
            InsulationRating::C60 => self.ampacity[0],
            InsulationRating::C75 => self.ampacity[1],
            InsulationRating::C90 => self.ampacity[2],
        }
    }

    /// Table ampacity × temperature factor × bundling factor.
    pub fn derated_ampacity(
        &self,
        insulation: InsulationRating,
        ambient_c: f64,
        bundling_factor: f64,
    ) -> f64 {
        self.table_ampacity(insulation) * temperature_derating(ambient_c) * bundling_factor
    }
}

/// Ambient temperature correction factor.
pub fn temperature_derating(ambient_c: f64) -> f64 {
    if ambient_c <= 25.0 {
        1.08
    } else if ambient_c <= 30.0 {
        1.00
    } else if ambient_c <= 35.0 {
        0.91
    } else if ambient_c <= 40.0 {
        0.82
    } else if ambient_c <= 45.0 {
        0.71
    } else if ambient_c <= 50.0 {
        0.58
    } else {
        0.41
    }
}
