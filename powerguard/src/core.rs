//! Core validation API shared by the CLI and embedding applications.
//! Loading can fail; analysis never does.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyzer::{DesignValidator, ValidationReport};
use crate::compliance::InsulationRating;
use crate::defaults::*;
use crate::model::DesignSnapshot;
use crate::registry::DeviceRegistry;

#[derive(Debug, thiserror::Error)]
pub enum PowerGuardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

/// Tunable parameters for validation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub max_voltage_drop_percent: f64,
    pub ambient_temperature_c: f64,
    pub insulation: InsulationRating,
    pub bundling_factor: f64,
    /// Used for inverters that do not declare an efficiency.
    pub inverter_efficiency: f64,
    /// Never recommend a smaller gauge than the one installed.
    pub respect_installed_gauge: bool,
    /// Placements closer than this (canvas units) overlap.
    pub overlap_distance: f64,
    /// Check ids to skip, e.g. `["overlap", "orphan_component"]`.
    pub disabled_checks: Vec<String>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_voltage_drop_percent: DEFAULT_MAX_VOLTAGE_DROP_PERCENT,
            ambient_temperature_c: DEFAULT_AMBIENT_TEMPERATURE_C,
            insulation: InsulationRating::C75,
            bundling_factor: DEFAULT_BUNDLING_FACTOR,
            inverter_efficiency: DEFAULT_INVERTER_EFFICIENCY,
            respect_installed_gauge: true,
            overlap_distance: DEFAULT_OVERLAP_DISTANCE,
            disabled_checks: vec![],
        }
    }
}

impl ValidationOptions {
    pub fn from_json_str(json: &str) -> Result<Self, PowerGuardError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PowerGuardError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), PowerGuardError> {
        if !(self.max_voltage_drop_percent.is_finite() && self.max_voltage_drop_percent > 0.0) {
            return Err(PowerGuardError::Config(format!(
                "max_voltage_drop_percent must be positive, got {}",
                self.max_voltage_drop_percent
            )));
        }
        if !(self.bundling_factor > 0.0 && self.bundling_factor <= 1.0) {
            return Err(PowerGuardError::Config(format!(
                "bundling_factor must be in (0, 1], got {}",
                self.bundling_factor
            )));
        }
        if !(self.inverter_efficiency > 0.0 && self.inverter_efficiency <= 1.0) {
            return Err(PowerGuardError::Config(format!(
                "inverter_efficiency must be in (0, 1], got {}",
                self.inverter_efficiency
            )));
        }
        if !self.ambient_temperature_c.is_finite() {
            return Err(PowerGuardError::Config(
                "ambient_temperature_c must be a number".to_string(),
            ));
        }
        if !(self.overlap_distance.is_finite() && self.overlap_distance >= 0.0) {
            return Err(PowerGuardError::Config(format!(
                "overlap_distance must be zero or positive, got {}",
                self.overlap_distance
            )));
        }
        Ok(())
    }

    pub fn is_enabled(&self, check: &str) -> bool {
        !self.disabled_checks.iter().any(|c| c == check)
    }
}

/// Core validation API used by the CLI and embedding applications.
pub struct PowerGuardCore;

impl PowerGuardCore {
    /// Validate an in-memory snapshot against the built-in catalog.
    pub fn validate(snapshot: &DesignSnapshot, options: ValidationOptions) -> ValidationReport {
        Self::validate_with_registry(snapshot, options, DeviceRegistry::builtin())
    }

    pub fn validate_with_registry(
        snapshot: &DesignSnapshot,
        options: ValidationOptions,
        registry: &DeviceRegistry,
    ) -> ValidationReport {
        DesignValidator::new(registry, options).validate_snapshot(snapshot)
    }

    /// Read a design snapshot from a JSON file.
    pub fn load_snapshot(path: &Path) -> Result<DesignSnapshot, PowerGuardError> {
        let json = std::fs::read_to_string(path)?;
        let snapshot: DesignSnapshot = serde_json::from_str(&json)?;
        tracing::debug!(
            "Loaded {} with {} components and {} wires",
            path.display(),
            snapshot.components.len(),
            snapshot.wires.len()
        );
        Ok(snapshot)
    }

    /// Load and validate a snapshot file.
    pub fn validate_file(
        path: &Path,
        options: ValidationOptions,
    ) -> Result<ValidationReport, PowerGuardError> {
        let snapshot = Self::load_snapshot(path)?;
        Ok(Self::validate(&snapshot, options))
    }
}
