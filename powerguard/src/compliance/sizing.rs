//! Wire Sizing Calculator
//!
//! Picks the smallest cataloged gauge that satisfies both ampacity and
//! voltage-drop limits for a given current, run length and voltage.
//!
//! Voltage drop uses the round trip: `drop = 2 × I × R_per_ft × L`, because
//! current flows out on the supply conductor and back on the return.
//!
//! Inputs carry units in their names: amps, feet, volts, °C. Current is the
//! current in *this* physical wire; callers sizing a parallel run pass the
//! per-wire share, never the run total.

use serde::{Deserialize, Serialize};

use super::conductor::{ConductorSpec, InsulationRating};
use super::gauge::Gauge;
use crate::defaults::*;
use crate::model::ConductorMaterial;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingStatus {
    Valid,
    Warning,
    Error,
}

/// Everything needed to size one wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRequest {
    pub current_a: f64,
    pub length_ft: f64,
    pub voltage: f64,
    pub temperature_c: f64,
    pub material: ConductorMaterial,
    pub insulation: InsulationRating,
    pub bundling_factor: f64,
    pub max_voltage_drop_percent: f64,
    /// Never recommend a gauge smaller than this.
    pub floor_gauge: Option<Gauge>,
}

impl SizingRequest {
    pub fn new(current_a: f64, length_ft: f64, voltage: f64) -> Self {
        Self {
            current_a,
            length_ft,
            voltage,
            temperature_c: DEFAULT_AMBIENT_TEMPERATURE_C,
            material: ConductorMaterial::Copper,
            insulation: InsulationRating::C75,
            bundling_factor: DEFAULT_BUNDLING_FACTOR,
            max_voltage_drop_percent: DEFAULT_MAX_VOLTAGE_DROP_PERCENT,
            floor_gauge: None,
        }
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature_c = celsius;
        self
    }

    pub fn with_material(mut self, material: ConductorMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_insulation(mut self, insulation: InsulationRating) -> Self {
        self.insulation = insulation;
        self
    }

    pub fn with_bundling_factor(mut self, factor: f64) -> Self {
        self.bundling_factor = factor;
        self
    }

    pub fn with_max_drop_percent(mut self, percent: f64) -> Self {
        self.max_voltage_drop_percent = percent;
        self
    }

    pub fn with_floor(mut self, gauge: Option<Gauge>) -> Self {
        self.floor_gauge = gauge;
        self
    }

    /// Clamp physically meaningless inputs to usable values.
    fn normalized(&self) -> Self {
        let mut req = self.clone();
        if !req.current_a.is_finite() || req.current_a < 0.0 {
            req.current_a = 0.0;
        }
        if !req.length_ft.is_finite() || req.length_ft < 0.0 {
            req.length_ft = 0.0;
        }
        if !req.voltage.is_finite() || req.voltage <= 0.0 {
            tracing::debug!(
                "Sizing voltage {} unusable, falling back to {} V",
                self.voltage,
                DEFAULT_SYSTEM_VOLTAGE
            );
            req.voltage = DEFAULT_SYSTEM_VOLTAGE;
        }
        if !req.bundling_factor.is_finite() || req.bundling_factor <= 0.0 {
            req.bundling_factor = DEFAULT_BUNDLING_FACTOR;
        }
        if !req.max_voltage_drop_percent.is_finite() || req.max_voltage_drop_percent <= 0.0 {
            req.max_voltage_drop_percent = DEFAULT_MAX_VOLTAGE_DROP_PERCENT;
        }
        if !req.temperature_c.is_finite() {
            req.temperature_c = DEFAULT_AMBIENT_TEMPERATURE_C;
        }
        req
    }

    pub fn max_allowed_drop(&self) -> f64 {
        self.voltage * self.max_voltage_drop_percent / 100.0
    }
}

/// Figures for one gauge under one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeEvaluation {
    pub gauge: Gauge,
    pub voltage_drop: f64,
    pub voltage_drop_percent: f64,
    pub derated_ampacity: f64,
    pub max_allowed_drop: f64,
}

impl GaugeEvaluation {
    pub fn drop_ok(&self) -> bool {
        self.voltage_drop <= self.max_allowed_drop
    }

    pub fn ampacity_ok(&self, current_a: f64) -> bool {
        current_a <= self.derated_ampacity
    }
}

/// Voltage drop and ampacity of `gauge` under `request`.
pub fn evaluate_gauge(request: &SizingRequest, gauge: Gauge) -> GaugeEvaluation {
    let req = request.normalized();
    let spec = ConductorSpec::lookup(gauge, req.material);
    let voltage_drop = 2.0 * req.current_a * spec.ohms_per_foot() * req.length_ft;
    GaugeEvaluation {
        gauge,
        voltage_drop,
        voltage_drop_percent: voltage_drop / req.voltage * 100.0,
        derated_ampacity: spec.derated_ampacity(req.insulation, req.temperature_c, req.bundling_factor),
        max_allowed_drop: req.max_allowed_drop(),
    }
}

/// Sizing outcome for one wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCalculation {
    pub current: f64,
    pub length: f64,
    pub voltage: f64,
    pub recommended_gauge: Gauge,
    pub actual_voltage_drop: f64,
    pub voltage_drop_percent: f64,
    pub derated_ampacity: f64,
    pub status: SizingStatus,
    pub message: String,
}

/// Smallest gauge satisfying ampacity and voltage drop, respecting the floor.
///
/// When even 4/0 fails, the result is `Error` at 4/0 with a message naming
/// each failed constraint and its margin.
pub fn size_wire(request: &SizingRequest) -> WireCalculation {
    let req = request.normalized();
    let floor = req.floor_gauge.unwrap_or_else(Gauge::smallest);

    let mut last = None;
    for gauge in Gauge::ALL.iter().copied().filter(|g| *g >= floor) {
        let eval = evaluate_gauge(&req, gauge);
        if eval.drop_ok() && eval.ampacity_ok(req.current_a) {
            return accept(&req, eval);
        }
        last = Some(eval);
    }

    let eval = last.unwrap_or_else(|| evaluate_gauge(&req, Gauge::largest()));
    reject(&req, eval)
}

fn accept(req: &SizingRequest, eval: GaugeEvaluation) -> WireCalculation {
    let near_drop = eval.voltage_drop >= SIZING_WARNING_FRACTION * eval.max_allowed_drop
        && req.current_a > 0.0;
    let near_ampacity = req.current_a >= SIZING_WARNING_FRACTION * eval.derated_ampacity;

    let (status, message) = if near_drop || near_ampacity {
        let limit = match (near_drop, near_ampacity) {
            (true, true) => "voltage-drop and ampacity limits",
            (true, false) => "voltage-drop limit",
            _ => "ampacity limit",
        };
        (
            SizingStatus::Warning,
            format!(
                "{} carries {:.1}A with {:.2}% drop but is within 10% of its {} (drop limit {:.1}%, derated ampacity {:.1}A)",
                eval.gauge,
                req.current_a,
                eval.voltage_drop_percent,
                limit,
                req.max_voltage_drop_percent,
                eval.derated_ampacity
            ),
        )
    } else {
        (
            SizingStatus::Valid,
            format!(
                "{} carries {:.1}A with {:.2}% drop (limit {:.1}%), derated ampacity {:.1}A",
                eval.gauge,
                req.current_a,
                eval.voltage_drop_percent,
                req.max_voltage_drop_percent,
                eval.derated_ampacity
            ),
        )
    };

    build(req, eval, status, message)
}

fn reject(req: &SizingRequest, eval: GaugeEvaluation) -> WireCalculation {
    let mut failures = Vec::new();
    if !eval.drop_ok() {
        failures.push(format!(
            "voltage drop {:.2}% exceeds the {:.1}% limit by {:.2} percentage points",
            eval.voltage_drop_percent,
            req.max_voltage_drop_percent,
            eval.voltage_drop_percent - req.max_voltage_drop_percent
        ));
    }
    if !eval.ampacity_ok(req.current_a) {
        failures.push(format!(
            "{:.1}A exceeds the {:.1}A derated ampacity by {:.1}A",
            req.current_a,
            eval.derated_ampacity,
            req.current_a - eval.derated_ampacity
        ));
    }
    let message = format!(
        "No cataloged gauge up to {} works for {:.1}A over {:.1} ft at {:.1}V: {}",
        eval.gauge,
        req.current_a,
        req.length_ft,
        req.voltage,
        failures.join("; ")
    );
    build(req, eval, SizingStatus::Error, message)
}

fn build(req: &SizingRequest, eval: GaugeEvaluation, status: SizingStatus, message: String) -> WireCalculation {
    WireCalculation {
        current: req.current_a,
        length: req.length_ft,
        voltage: req.voltage,
        recommended_gauge: eval.gauge,
        actual_voltage_drop: eval.voltage_drop,
        voltage_drop_percent: eval.voltage_drop_percent,
        derated_ampacity: eval.derated_ampacity,
        status,
        message,
    }
}
