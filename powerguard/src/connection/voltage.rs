//! Voltage compatibility between two DC terminals.

use super::{ConnectionContext, ConnectionRule, RuleFailure};
use crate::defaults::{CANONICAL_SYSTEM_VOLTAGES, VOLTAGE_MATCH_TOLERANCE};

/// Only evaluated when both components declare a voltage and both terminals
/// are DC bus terminals. Differences within `tolerance` always pass
/// (12.0 vs 12.8). Beyond it, the connection is rejected only when both
/// voltages are distinct canonical system voltages (12/24/48).
pub struct VoltageCompatibilityRule {
    pub tolerance: f64,
}

impl Default for VoltageCompatibilityRule {
    fn default() -> Self {
        Self {
            tolerance: VOLTAGE_MATCH_TOLERANCE,
        }
    }
}

fn is_canonical(volts: f64) -> bool {
    CANONICAL_SYSTEM_VOLTAGES
        .iter()
        .any(|v| (v - volts).abs() < 1e-6)
}

impl ConnectionRule for VoltageCompatibilityRule {
    fn id(&self) -> &str {
        "voltage_compatibility"
    }

    fn name(&self) -> &str {
        "Voltage Compatibility"
    }

    fn check(&self, ctx: &ConnectionContext<'_>) -> Option<RuleFailure> {
        let (a, b) = ctx.classes()?;
        if !a.is_dc_bus() || !b.is_dc_bus() {
            return None;
        }
        // A converter's declared voltage is its output; the input side may differ.
        if ctx.from.terminal.is_some_and(|t| t.converter_input)
            || ctx.to.terminal.is_some_and(|t| t.converter_input)
        {
            return None;
        }

        let from_v = ctx.from.component.declared_voltage()?;
        let to_v = ctx.to.component.declared_voltage()?;

        if (from_v - to_v).abs() <= self.tolerance {
            return None;
        }
        if is_canonical(from_v) && is_canonical(to_v) {
            return Some(RuleFailure::error(format!(
                "Voltage mismatch: {} is a {}V system but {} is {}V",
                ctx.from.component.id, from_v, ctx.to.component.id, to_v
            )));
        }
        None
    }
}
