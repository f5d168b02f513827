//! Device kind classification.
//!
//! Traversal behavior depends on what a component *is*, not on its category
//! alone: an MPPT and a solar panel are both sources but contribute current in
//! different ways. Known type strings map directly; anything else falls back
//! to the registry category.

use serde::{Deserialize, Serialize};

use crate::defaults::*;
use crate::model::Component;
use crate::registry::{DeviceCategory, DeviceRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Battery,
    SolarPanel,
    Mppt,
    AcCharger,
    /// Catalog source with battery-side DC terminals; delivers its `amps`.
    DcSource,
    DcDcCharger,
    Inverter,
    InverterCharger,
    ShorePower,
    BusBar,
    /// Inline fuse, breaker or battery switch.
    Protection,
    Shunt,
    DcLoad,
    AcLoad,
    DcPanel,
    AcPanel,
    Monitor,
    Other,
}

impl DeviceKind {
    pub fn classify(component: &Component, registry: &DeviceRegistry) -> Self {
        match component.device_type.as_str() {
            "battery" => DeviceKind::Battery,
            "solar-panel" => DeviceKind::SolarPanel,
            "mppt" => DeviceKind::Mppt,
            "blue-smart-charger" => DeviceKind::AcCharger,
            "orion-dc-dc" => DeviceKind::DcDcCharger,
            "inverter" | "phoenix-inverter" => DeviceKind::Inverter,
            "multiplus" => DeviceKind::InverterCharger,
            "shore-power" => DeviceKind::ShorePower,
            "busbar-positive" | "busbar-negative" | "busbar" => DeviceKind::BusBar,
            "fuse" | "breaker" | "battery-switch" => DeviceKind::Protection,
            "smartshunt" => DeviceKind::Shunt,
            "dc-load" => DeviceKind::DcLoad,
            "ac-load" => DeviceKind::AcLoad,
            "dc-panel" => DeviceKind::DcPanel,
            "ac-panel" => DeviceKind::AcPanel,
            "cerbo-gx" => DeviceKind::Monitor,
            other => Self::from_registry(other, registry),
        }
    }

    fn from_registry(device_type: &str, registry: &DeviceRegistry) -> Self {
        let Some(def) = registry.lookup(device_type) else {
            return DeviceKind::Other;
        };
        let has_dc_bus = def.terminals.iter().any(|t| t.polarity.is_dc_bus());
        let has_pv = def.terminals.iter().any(|t| t.polarity.is_pv());
        let ac_only = def.terminals.iter().any(|t| t.polarity.is_ac()) && !has_dc_bus;

        match def.category {
            DeviceCategory::Storage => DeviceKind::Battery,
            DeviceCategory::Load if ac_only => DeviceKind::AcLoad,
            DeviceCategory::Load => DeviceKind::DcLoad,
            DeviceCategory::Source if has_dc_bus => DeviceKind::DcSource,
            DeviceCategory::Source if has_pv => DeviceKind::SolarPanel,
            DeviceCategory::Source if ac_only => DeviceKind::ShorePower,
            DeviceCategory::Distribution if ac_only => DeviceKind::AcPanel,
            DeviceCategory::Distribution if has_dc_bus => DeviceKind::BusBar,
            DeviceCategory::Control => DeviceKind::Monitor,
            DeviceCategory::Source | DeviceCategory::Distribution => DeviceKind::Other,
        }
    }

    /// Inverter-class: converts DC input into AC output.
    pub fn is_inverter(&self) -> bool {
        matches!(self, DeviceKind::Inverter | DeviceKind::InverterCharger)
    }

    /// Charging sources that deliver their own rated output current.
    pub fn is_charger(&self) -> bool {
        matches!(
            self,
            DeviceKind::Mppt | DeviceKind::AcCharger | DeviceKind::DcDcCharger | DeviceKind::DcSource
        )
    }

    pub fn is_load(&self) -> bool {
        matches!(self, DeviceKind::DcLoad | DeviceKind::AcLoad)
    }

    pub fn is_panel(&self) -> bool {
        matches!(self, DeviceKind::DcPanel | DeviceKind::AcPanel)
    }

    /// Devices that sit on the battery side of a bus bar.
    pub fn is_battery_path(&self) -> bool {
        matches!(
            self,
            DeviceKind::Battery | DeviceKind::Protection | DeviceKind::Shunt
        )
    }
}

/// Rated output of a charging source when it does not declare `amps`.
pub fn default_charger_amps(kind: DeviceKind) -> f64 {
    match kind {
        DeviceKind::AcCharger => DEFAULT_BLUE_SMART_AMPS,
        DeviceKind::DcDcCharger => DEFAULT_ORION_AMPS,
        DeviceKind::DcSource => DEFAULT_WIRE_CURRENT,
        _ => DEFAULT_MPPT_AMPS,
    }
}

/// Nameplate rating of an inverter-class device when it does not declare `watts`.
pub fn default_inverter_watts(component: &Component) -> f64 {
    match component.device_type.as_str() {
        "multiplus" => DEFAULT_MULTIPLUS_WATTS,
        "phoenix-inverter" => DEFAULT_PHOENIX_INVERTER_WATTS,
        _ => DEFAULT_INVERTER_WATTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        let registry = DeviceRegistry::builtin();
        let kind = |t: &str| DeviceKind::classify(&Component::new("x", t), registry);

        assert_eq!(kind("multiplus"), DeviceKind::InverterCharger);
        assert!(kind("phoenix-inverter").is_inverter());
        assert!(kind("orion-dc-dc").is_charger());
        assert!(kind("breaker").is_battery_path());
        assert_eq!(kind("flux-capacitor"), DeviceKind::Other);
    }

    #[test]
    fn test_custom_load_falls_back_to_category() {
        let registry = DeviceRegistry::with_catalog_str(
            r#"[{
                "type": "water-heater", "name": "Water Heater", "category": "load",
                "terminals": [
                    { "id": "hot", "polarity": "ac-in" },
                    { "id": "neutral", "polarity": "ac-in" }
                ]
            }]"#,
        )
        .unwrap();

        let heater = Component::new("wh", "water-heater");
        assert_eq!(DeviceKind::classify(&heater, &registry), DeviceKind::AcLoad);
    }

    #[test]
    fn test_custom_source_and_distribution_categories() {
        let registry = DeviceRegistry::with_catalog_str(
            r#"[
                { "type": "wind-generator", "name": "Wind", "category": "source",
                  "terminals": [
                    { "id": "positive", "polarity": "positive" },
                    { "id": "negative", "polarity": "negative" }
                  ] },
                { "type": "generator", "name": "Generator", "category": "source",
                  "terminals": [ { "id": "hot", "polarity": "ac-out" } ] },
                { "type": "power-post", "name": "Power Post", "category": "distribution",
                  "terminals": [ { "id": "stud-1", "polarity": "positive" } ] },
                { "type": "sub-panel", "name": "Sub Panel", "category": "distribution",
                  "terminals": [ { "id": "main-hot", "polarity": "ac-in" } ] }
            ]"#,
        )
        .unwrap();
        let kind = |t: &str| DeviceKind::classify(&Component::new("x", t), &registry);

        assert_eq!(kind("wind-generator"), DeviceKind::DcSource);
        assert!(kind("wind-generator").is_charger());
        assert_eq!(kind("generator"), DeviceKind::ShorePower);
        assert_eq!(kind("power-post"), DeviceKind::BusBar);
        assert_eq!(kind("sub-panel"), DeviceKind::AcPanel);
    }
}
