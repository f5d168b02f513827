//! Wires connecting component terminals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Electrical role of a conductor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    /// AC line conductor.
    Hot,
    Neutral,
    Ground,
}

impl Polarity {
    pub fn is_ac(&self) -> bool {
        matches!(self, Polarity::Hot | Polarity::Neutral)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Hot => "hot",
            Polarity::Neutral => "neutral",
            Polarity::Ground => "ground",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conductor metal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConductorMaterial {
    #[default]
    Copper,
    Aluminum,
}

impl fmt::Display for ConductorMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConductorMaterial::Copper => f.write_str("copper"),
            ConductorMaterial::Aluminum => f.write_str("aluminum"),
        }
    }
}

/// A physical conductor between two component terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub from_component_id: String,
    pub to_component_id: String,
    pub from_terminal: String,
    pub to_terminal: String,
    pub polarity: Polarity,

    /// One-way run length (ft).
    #[serde(default)]
    pub length: f64,

    /// Installed gauge as entered by the user ("10", "1/0 AWG", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<String>,

    /// Explicit current override (A). Wins over inference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,

    #[serde(default)]
    pub conductor_material: ConductorMaterial,
}

impl Wire {
    pub fn new(
        id: impl Into<String>,
        from: (&str, &str),
        to: (&str, &str),
        polarity: Polarity,
    ) -> Self {
        Self {
            id: id.into(),
            from_component_id: from.0.to_string(),
            from_terminal: from.1.to_string(),
            to_component_id: to.0.to_string(),
            to_terminal: to.1.to_string(),
            polarity,
            length: 0.0,
            gauge: None,
            current: None,
            conductor_material: ConductorMaterial::Copper,
        }
    }

    pub fn with_length(mut self, feet: f64) -> Self {
        self.length = feet;
        self
    }

    pub fn with_gauge(mut self, gauge: impl Into<String>) -> Self {
        self.gauge = Some(gauge.into());
        self
    }

    pub fn with_current(mut self, amps: f64) -> Self {
        self.current = Some(amps);
        self
    }

    pub fn with_material(mut self, material: ConductorMaterial) -> Self {
        self.conductor_material = material;
        self
    }

    /// Whether this wire has `component_id` at either end.
    pub fn touches(&self, component_id: &str) -> bool {
        self.from_component_id == component_id || self.to_component_id == component_id
    }

    /// The component at the opposite end from `component_id`.
    pub fn other_end(&self, component_id: &str) -> Option<(&str, &str)> {
        if self.from_component_id == component_id {
            Some((&self.to_component_id, &self.to_terminal))
        } else if self.to_component_id == component_id {
            Some((&self.from_component_id, &self.from_terminal))
        } else {
            None
        }
    }

    /// Terminal used on `component_id`'s end of the wire.
    pub fn terminal_at(&self, component_id: &str) -> Option<&str> {
        if self.from_component_id == component_id {
            Some(&self.from_terminal)
        } else if self.to_component_id == component_id {
            Some(&self.to_terminal)
        } else {
            None
        }
    }

    pub fn is_self_connection(&self) -> bool {
        self.from_component_id == self.to_component_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_deserializes_camel_case() {
        let json = r#"{
            "id": "w1",
            "fromComponentId": "battery-1",
            "toComponentId": "load-1",
            "fromTerminal": "positive",
            "toTerminal": "positive",
            "polarity": "positive",
            "length": 10,
            "gauge": "10 AWG"
        }"#;
        let wire: Wire = serde_json::from_str(json).unwrap();

        assert_eq!(wire.from_component_id, "battery-1");
        assert_eq!(wire.polarity, Polarity::Positive);
        assert_eq!(wire.conductor_material, ConductorMaterial::Copper);
        assert_eq!(wire.current, None);
        assert_eq!(wire.gauge.as_deref(), Some("10 AWG"));
    }

    #[test]
    fn test_other_end() {
        let wire = Wire::new("w1", ("a", "positive"), ("b", "in"), Polarity::Positive);

        assert_eq!(wire.other_end("a"), Some(("b", "in")));
        assert_eq!(wire.other_end("b"), Some(("a", "positive")));
        assert_eq!(wire.other_end("c"), None);
        assert_eq!(wire.terminal_at("b"), Some("in"));
    }
}
