//! Built-in and External Device Catalogs
//!
//! This module loads device definitions from:
//! 1. Embedded JSON files compiled into the binary
//! 2. Additional JSON catalogs supplied by the caller (string or file)
//!
//! Each catalog file is a JSON array of device definitions.

use crate::core::PowerGuardError;
use crate::registry::schema::DeviceDefinition;
use std::path::Path;

const EMBEDDED_STORAGE: &str = include_str!("../../devices/storage.json");
const EMBEDDED_SOURCES: &str = include_str!("../../devices/sources.json");
const EMBEDDED_CONVERSION: &str = include_str!("../../devices/conversion.json");
const EMBEDDED_DISTRIBUTION: &str = include_str!("../../devices/distribution.json");
const EMBEDDED_LOADS: &str = include_str!("../../devices/loads.json");
const EMBEDDED_CONTROL: &str = include_str!("../../devices/control.json");

/// Get all device definitions from the embedded catalog files
pub fn get_builtin_definitions() -> Vec<DeviceDefinition> {
    let embedded_jsons = [
        ("storage", EMBEDDED_STORAGE),
        ("sources", EMBEDDED_SOURCES),
        ("conversion", EMBEDDED_CONVERSION),
        ("distribution", EMBEDDED_DISTRIBUTION),
        ("loads", EMBEDDED_LOADS),
        ("control", EMBEDDED_CONTROL),
    ];

    let mut definitions = Vec::new();

    for (name, json_str) in embedded_jsons {
        match parse_catalog(json_str) {
            Ok(defs) => definitions.extend(defs),
            Err(e) => {
                tracing::warn!("Failed to parse embedded device catalog '{}': {}", name, e);
            }
        }
    }

    definitions
}

/// Parse a catalog document (a JSON array of definitions)
pub fn parse_catalog(json: &str) -> Result<Vec<DeviceDefinition>, PowerGuardError> {
    let definitions: Vec<DeviceDefinition> = serde_json::from_str(json)?;
    for def in &definitions {
        if def.device_type.trim().is_empty() {
            return Err(PowerGuardError::Catalog(format!(
                "device '{}' has an empty type",
                def.name
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for terminal in &def.terminals {
            if !seen.insert(terminal.id.as_str()) {
                return Err(PowerGuardError::Catalog(format!(
                    "device '{}' declares terminal '{}' twice",
                    def.device_type, terminal.id
                )));
            }
        }
    }
    Ok(definitions)
}

/// Load a catalog from a JSON file
pub fn load_catalog_file(path: &Path) -> Result<Vec<DeviceDefinition>, PowerGuardError> {
    let content = std::fs::read_to_string(path)?;
    let definitions = parse_catalog(&content)?;
    tracing::info!(
        "Loaded {} device definitions from {:?}",
        definitions.len(),
        path.file_name()
    );
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::schema::{DeviceCategory, PolarityClass};

    #[test]
    fn test_embedded_catalogs_parse() {
        for json in [
            EMBEDDED_STORAGE,
            EMBEDDED_SOURCES,
            EMBEDDED_CONVERSION,
            EMBEDDED_DISTRIBUTION,
            EMBEDDED_LOADS,
            EMBEDDED_CONTROL,
        ] {
            let defs = parse_catalog(json).unwrap();
            assert!(!defs.is_empty());
            for def in &defs {
                assert!(!def.terminals.is_empty(), "{} has no terminals", def.device_type);
            }
        }
    }

    #[test]
    fn test_battery_definition() {
        let defs = parse_catalog(EMBEDDED_STORAGE).unwrap();
        let battery = defs.iter().find(|d| d.device_type == "battery").unwrap();

        assert_eq!(battery.category, DeviceCategory::Storage);
        assert!(battery.chainable);
        assert_eq!(
            battery.terminal("positive").map(|t| t.polarity),
            Some(PolarityClass::Positive)
        );
        assert_eq!(battery.mandatory_terminals().count(), 2);
    }

    #[test]
    fn test_orion_input_is_converter_side() {
        let defs = parse_catalog(EMBEDDED_SOURCES).unwrap();
        let orion = defs.iter().find(|d| d.device_type == "orion-dc-dc").unwrap();

        assert!(orion.terminal("input-positive").unwrap().converter_input);
        assert!(!orion.terminal("output-positive").unwrap().converter_input);
    }

    #[test]
    fn test_duplicate_terminal_rejected() {
        let json = r#"[{
            "type": "widget", "name": "Widget", "category": "load",
            "terminals": [
                { "id": "a", "polarity": "positive" },
                { "id": "a", "polarity": "negative" }
            ]
        }]"#;
        assert!(matches!(parse_catalog(json), Err(PowerGuardError::Catalog(_))));
    }
}
