//! Design snapshot model: components, wires and the snapshot that carries them.

pub mod component;
pub mod wire;

pub use component::{number_from_value, Component, ComponentProperties, Position};
pub use wire::{ConductorMaterial, Polarity, Wire};

use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_SYSTEM_VOLTAGE;

/// Everything a caller hands the engine for one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_voltage: Option<f64>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl DesignSnapshot {
    pub fn new(components: Vec<Component>, wires: Vec<Wire>) -> Self {
        Self {
            system_voltage: None,
            components,
            wires,
        }
    }

    pub fn with_system_voltage(mut self, volts: f64) -> Self {
        self.system_voltage = Some(volts);
        self
    }

    /// Explicit system voltage, else the first battery's, else 12 V.
    pub fn effective_system_voltage(&self) -> f64 {
        self.system_voltage
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or_else(|| infer_system_voltage(&self.components))
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }
}

/// Infer the DC system voltage from the first battery that declares one.
pub fn infer_system_voltage(components: &[Component]) -> f64 {
    components
        .iter()
        .filter(|c| c.device_type == "battery")
        .find_map(|c| c.declared_voltage())
        .unwrap_or(DEFAULT_SYSTEM_VOLTAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_voltage_inference() {
        let snapshot = DesignSnapshot::new(
            vec![
                Component::new("load", "dc-load").with_voltage(12.0),
                Component::new("bank", "battery").with_voltage(24.0),
            ],
            vec![],
        );
        assert_eq!(snapshot.effective_system_voltage(), 24.0);

        let explicit = snapshot.clone().with_system_voltage(48.0);
        assert_eq!(explicit.effective_system_voltage(), 48.0);

        let empty = DesignSnapshot::default();
        assert_eq!(empty.effective_system_voltage(), DEFAULT_SYSTEM_VOLTAGE);
    }
}
