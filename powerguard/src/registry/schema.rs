//! Device Definition Schema
//!
//! Static description of a device type: its category, its named terminals and
//! the polarity class of each, plus free-text wiring guidance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a device plays in the power system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Source,
    Load,
    Storage,
    Distribution,
    Control,
}

/// Electrical class of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolarityClass {
    Positive,
    Negative,
    Ground,
    AcIn,
    AcOut,
    PvPositive,
    PvNegative,
    Data,
}

impl PolarityClass {
    pub fn is_ac(&self) -> bool {
        matches!(self, PolarityClass::AcIn | PolarityClass::AcOut)
    }

    /// DC conductor classes, PV included.
    pub fn is_dc(&self) -> bool {
        matches!(
            self,
            PolarityClass::Positive
                | PolarityClass::Negative
                | PolarityClass::PvPositive
                | PolarityClass::PvNegative
        )
    }

    /// Battery-side DC classes (no PV).
    pub fn is_dc_bus(&self) -> bool {
        matches!(self, PolarityClass::Positive | PolarityClass::Negative)
    }

    pub fn is_pv(&self) -> bool {
        matches!(self, PolarityClass::PvPositive | PolarityClass::PvNegative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolarityClass::Positive => "positive",
            PolarityClass::Negative => "negative",
            PolarityClass::Ground => "ground",
            PolarityClass::AcIn => "ac-in",
            PolarityClass::AcOut => "ac-out",
            PolarityClass::PvPositive => "pv-positive",
            PolarityClass::PvNegative => "pv-negative",
            PolarityClass::Data => "data",
        }
    }
}

impl fmt::Display for PolarityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalDefinition {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    pub polarity: PolarityClass,

    /// Must be wired for the device to work.
    #[serde(default)]
    pub mandatory: bool,

    /// Input side of a voltage converter. The device's declared voltage does
    /// not apply on this terminal.
    #[serde(default)]
    pub converter_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDefinition {
    #[serde(rename = "type")]
    pub device_type: String,

    pub name: String,

    pub category: DeviceCategory,

    /// Identical devices may be linked positive-to-negative (series strings).
    #[serde(default)]
    pub chainable: bool,

    pub terminals: Vec<TerminalDefinition>,

    #[serde(default)]
    pub wiring_guidance: String,
}

impl DeviceDefinition {
    pub fn terminal(&self, id: &str) -> Option<&TerminalDefinition> {
        self.terminals.iter().find(|t| t.id == id)
    }

    pub fn mandatory_terminals(&self) -> impl Iterator<Item = &TerminalDefinition> {
        self.terminals.iter().filter(|t| t.mandatory)
    }
}
