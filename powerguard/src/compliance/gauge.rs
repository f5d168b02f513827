//! American Wire Gauge sizes.
//!
//! Variants are declared smallest conductor first, so the derived ordering is
//! the physical one: `Awg18 < Awg10 < Awg4_0`. Comparing the raw strings
//! ("10" vs "4/0") would not give that order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gauge {
    Awg18,
    Awg16,
    Awg14,
    Awg12,
    Awg10,
    Awg8,
    Awg6,
    Awg4,
    Awg2,
    Awg1,
    Awg1_0,
    Awg2_0,
    Awg3_0,
    Awg4_0,
}

impl Gauge {
    /// All gauges, smallest conductor first.
    pub const ALL: [Gauge; 14] = [
        Gauge::Awg18,
        Gauge::Awg16,
        Gauge::Awg14,
        Gauge::Awg12,
        Gauge::Awg10,
        Gauge::Awg8,
        Gauge::Awg6,
        Gauge::Awg4,
        Gauge::Awg2,
        Gauge::Awg1,
        Gauge::Awg1_0,
        Gauge::Awg2_0,
        Gauge::Awg3_0,
        Gauge::Awg4_0,
    ];

    pub fn smallest() -> Gauge {
        Gauge::Awg18
    }

    pub fn largest() -> Gauge {
        Gauge::Awg4_0
    }

    /// Table label without the unit ("10", "1/0").
    pub fn label(&self) -> &'static str {
        match self {
            Gauge::Awg18 => "18",
            Gauge::Awg16 => "16",
            Gauge::Awg14 => "14",
            Gauge::Awg12 => "12",
            Gauge::Awg10 => "10",
            Gauge::Awg8 => "8",
            Gauge::Awg6 => "6",
            Gauge::Awg4 => "4",
            Gauge::Awg2 => "2",
            Gauge::Awg1 => "1",
            Gauge::Awg1_0 => "1/0",
            Gauge::Awg2_0 => "2/0",
            Gauge::Awg3_0 => "3/0",
            Gauge::Awg4_0 => "4/0",
        }
    }

    /// Position in [`Gauge::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AWG", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized wire gauge '{0}'")]
pub struct ParseGaugeError(pub String);

impl FromStr for Gauge {
    type Err = ParseGaugeError;

    /// Accepts "10", "10 AWG", "10awg", "#10", "1/0", "0", "00", "4/0 AWG".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let core = lower
            .trim_start_matches('#')
            .trim_end_matches("awg")
            .trim_end_matches("ga")
            .trim();

        let gauge = match core {
            "18" => Gauge::Awg18,
            "16" => Gauge::Awg16,
            "14" => Gauge::Awg14,
            "12" => Gauge::Awg12,
            "10" => Gauge::Awg10,
            "8" => Gauge::Awg8,
            "6" => Gauge::Awg6,
            "4" => Gauge::Awg4,
            "2" => Gauge::Awg2,
            "1" => Gauge::Awg1,
            "1/0" | "0" => Gauge::Awg1_0,
            "2/0" | "00" => Gauge::Awg2_0,
            "3/0" | "000" => Gauge::Awg3_0,
            "4/0" | "0000" => Gauge::Awg4_0,
            _ => return Err(ParseGaugeError(s.to_string())),
        };
        Ok(gauge)
    }
}

impl Serialize for Gauge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Gauge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("10".parse::<Gauge>().unwrap(), Gauge::Awg10);
        assert_eq!("10 AWG".parse::<Gauge>().unwrap(), Gauge::Awg10);
        assert_eq!("#8awg".parse::<Gauge>().unwrap(), Gauge::Awg8);
        assert_eq!("1/0".parse::<Gauge>().unwrap(), Gauge::Awg1_0);
        assert_eq!("00".parse::<Gauge>().unwrap(), Gauge::Awg2_0);
        assert_eq!("4/0 AWG".parse::<Gauge>().unwrap(), Gauge::Awg4_0);
        assert!("3".parse::<Gauge>().is_err());
        assert!("thick".parse::<Gauge>().is_err());
    }

    #[test]
    fn test_ordering_is_physical() {
        assert!(Gauge::Awg18 < Gauge::Awg10);
        assert!(Gauge::Awg2 < Gauge::Awg1_0);
        assert!(Gauge::Awg1_0 < Gauge::Awg4_0);
        assert!(Gauge::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Gauge::ALL[Gauge::Awg6.index()], Gauge::Awg6);
    }

    #[test]
    fn test_display() {
        assert_eq!(Gauge::Awg2_0.to_string(), "2/0 AWG");
        assert_eq!(serde_json::to_string(&Gauge::Awg12).unwrap(), "\"12\"");
    }
}
