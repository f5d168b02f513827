//! Components placed on the schematic and their properties.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Canvas position of a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Typed view of a component's property bag.
///
/// Device catalogs evolve faster than the engine, so every field is optional
/// and numeric fields accept either a JSON number or a numeric string
/// (`"120"`, `"120W"`). Keys the engine does not know are kept in `extra`.
/// Fallbacks for missing values live in [`crate::defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperties {
    /// Load draw, panel STC rating, or inverter continuous rating (W).
    #[serde(default, deserialize_with = "loose_f64", skip_serializing_if = "Option::is_none")]
    pub watts: Option<f64>,

    /// Declared operating voltage (V). For converters this is the output side.
    #[serde(default, deserialize_with = "loose_f64", skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,

    /// Rated output current for chargers, fixed draw for loads (A).
    #[serde(default, deserialize_with = "loose_f64", skip_serializing_if = "Option::is_none")]
    pub amps: Option<f64>,

    /// Battery capacity (Ah).
    #[serde(
        default,
        alias = "capacity",
        deserialize_with = "loose_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub capacity_ah: Option<f64>,

    /// Inverter efficiency, as a fraction (0.9) or a percentage (90).
    #[serde(default, deserialize_with = "loose_f64", skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,

    /// Solar panel maximum-power voltage (V).
    #[serde(default, deserialize_with = "loose_f64", skip_serializing_if = "Option::is_none")]
    pub vmp: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Read a number out of a loosely typed property value.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let numeric: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
                .collect();
            numeric.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// A device instance on the schematic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,

    /// Device type, keyed into the [`crate::registry::DeviceRegistry`].
    #[serde(rename = "type")]
    pub device_type: String,

    /// Canvas placement; `None` when the component has not been placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(default)]
    pub properties: ComponentProperties,
}

impl Component {
    pub fn new(id: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            device_type: device_type.into(),
            position: None,
            properties: ComponentProperties::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    pub fn with_watts(mut self, watts: f64) -> Self {
        self.properties.watts = Some(watts);
        self
    }

    pub fn with_voltage(mut self, voltage: f64) -> Self {
        self.properties.voltage = Some(voltage);
        self
    }

    pub fn with_amps(mut self, amps: f64) -> Self {
        self.properties.amps = Some(amps);
        self
    }

    pub fn with_capacity(mut self, capacity_ah: f64) -> Self {
        self.properties.capacity_ah = Some(capacity_ah);
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.properties.efficiency = Some(efficiency);
        self
    }

    pub fn with_vmp(mut self, vmp: f64) -> Self {
        self.properties.vmp = Some(vmp);
        self
    }

    /// Declared voltage, ignoring non-positive entries.
    pub fn declared_voltage(&self) -> Option<f64> {
        self.properties.voltage.filter(|v| *v > 0.0)
    }

    pub fn declared_watts(&self) -> Option<f64> {
        self.properties.watts.filter(|w| *w >= 0.0)
    }

    pub fn declared_amps(&self) -> Option<f64> {
        self.properties.amps.filter(|a| *a >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_accept_numeric_strings() {
        let json = r#"{
            "id": "load-1",
            "type": "dc-load",
            "position": { "x": 10, "y": 20 },
            "properties": { "watts": "120W", "voltage": 12, "capacity": "100", "label": "Fridge" }
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();

        assert_eq!(component.position, Some(Position::new(10.0, 20.0)));
        assert_eq!(component.properties.watts, Some(120.0));
        assert_eq!(component.properties.voltage, Some(12.0));
        assert_eq!(component.properties.capacity_ah, Some(100.0));
        assert_eq!(
            component.properties.extra.get("label"),
            Some(&Value::String("Fridge".to_string()))
        );
    }

    #[test]
    fn test_garbage_property_is_ignored() {
        let json = r#"{ "id": "b", "type": "battery", "properties": { "voltage": "twelve" } }"#;
        let component: Component = serde_json::from_str(json).unwrap();

        assert_eq!(component.properties.voltage, None);
        assert_eq!(component.position, None);
    }

    #[test]
    fn test_declared_voltage_ignores_zero() {
        let component = Component::new("b", "battery").with_voltage(0.0);
        assert_eq!(component.declared_voltage(), None);
    }
}
