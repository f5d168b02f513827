//! Device Registry
//!
//! Read-only catalog of device types keyed by type string. The built-in
//! catalog is parsed once per process and shared by every caller; custom
//! catalogs are layered on top by building a new registry.
//!
//! # Usage
//!
//! ```rust
//! use powerguard::registry::{DeviceRegistry, PolarityClass};
//!
//! let registry = DeviceRegistry::builtin();
//! let battery = registry.lookup("battery").unwrap();
//! assert_eq!(battery.terminal("positive").unwrap().polarity, PolarityClass::Positive);
//! ```

pub mod builtin;
pub mod schema;

pub use builtin::{get_builtin_definitions, load_catalog_file, parse_catalog};
pub use schema::*;

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::PowerGuardError;
use crate::model::Component;

static BUILTIN: OnceLock<DeviceRegistry> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    definitions: HashMap<String, DeviceDefinition>,
}

impl DeviceRegistry {
    /// Empty registry. Every device type is unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = DeviceDefinition>) -> Self {
        let mut registry = Self::empty();
        for def in definitions {
            registry.insert(def);
        }
        registry
    }

    /// The embedded catalog, parsed on first use.
    pub fn builtin() -> &'static DeviceRegistry {
        BUILTIN.get_or_init(|| {
            let registry = Self::from_definitions(get_builtin_definitions());
            tracing::debug!("Device registry loaded with {} types", registry.len());
            registry
        })
    }

    /// Built-in catalog plus the definitions in `json`. Later entries replace
    /// earlier ones with the same type.
    pub fn with_catalog_str(json: &str) -> Result<Self, PowerGuardError> {
        let mut registry = Self::builtin().clone();
        for def in parse_catalog(json)? {
            registry.insert(def);
        }
        Ok(registry)
    }

    pub fn with_catalog_file(path: &Path) -> Result<Self, PowerGuardError> {
        let mut registry = Self::builtin().clone();
        for def in load_catalog_file(path)? {
            registry.insert(def);
        }
        Ok(registry)
    }

    fn insert(&mut self, def: DeviceDefinition) {
        self.definitions.insert(def.device_type.clone(), def);
    }

    pub fn lookup(&self, device_type: &str) -> Option<&DeviceDefinition> {
        self.definitions.get(device_type)
    }

    pub fn contains(&self, device_type: &str) -> bool {
        self.definitions.contains_key(device_type)
    }

    /// Terminal definition for a component's terminal, if both are cataloged.
    pub fn terminal(&self, component: &Component, terminal_id: &str) -> Option<&TerminalDefinition> {
        self.lookup(&component.device_type)?.terminal(terminal_id)
    }

    pub fn terminal_class(&self, component: &Component, terminal_id: &str) -> Option<PolarityClass> {
        self.terminal(component, terminal_id).map(|t| t.polarity)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions sorted by type.
    pub fn definitions(&self) -> Vec<&DeviceDefinition> {
        let mut defs: Vec<&DeviceDefinition> = self.definitions.values().collect();
        defs.sort_by(|a, b| a.device_type.cmp(&b.device_type));
        defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_core_types() {
        let registry = DeviceRegistry::builtin();
        for device_type in [
            "battery",
            "solar-panel",
            "mppt",
            "blue-smart-charger",
            "orion-dc-dc",
            "inverter",
            "phoenix-inverter",
            "multiplus",
            "busbar-positive",
            "busbar-negative",
            "fuse",
            "smartshunt",
            "dc-load",
            "ac-load",
            "dc-panel",
            "ac-panel",
        ] {
            assert!(registry.contains(device_type), "missing {}", device_type);
        }
    }

    #[test]
    fn test_unknown_type_is_none() {
        assert!(DeviceRegistry::builtin().lookup("flux-capacitor").is_none());
    }

    #[test]
    fn test_terminal_class_lookup() {
        let registry = DeviceRegistry::builtin();
        let inverter = Component::new("inv", "inverter");

        assert_eq!(
            registry.terminal_class(&inverter, "dc-positive"),
            Some(PolarityClass::Positive)
        );
        assert_eq!(
            registry.terminal_class(&inverter, "ac-out-hot"),
            Some(PolarityClass::AcOut)
        );
        assert_eq!(registry.terminal_class(&inverter, "bogus"), None);
    }

    #[test]
    fn test_custom_catalog_overrides_builtin() {
        let json = r#"[{
            "type": "dc-load", "name": "Custom Load", "category": "load",
            "terminals": [{ "id": "v+", "polarity": "positive", "mandatory": true }]
        }]"#;
        let registry = DeviceRegistry::with_catalog_str(json).unwrap();

        let load = registry.lookup("dc-load").unwrap();
        assert_eq!(load.name, "Custom Load");
        assert!(registry.contains("battery"));
        assert_eq!(registry.len(), DeviceRegistry::builtin().len());
    }
}
