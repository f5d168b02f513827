//! Documented fallback values.
//!
//! Every default the engine applies when a component or wire omits a property
//! lives here. Behavior on incomplete designs is therefore predictable: a
//! missing property never fails a validation pass, it resolves to one of the
//! constants below.

/// System voltage used when neither the caller nor any battery declares one (V).
pub const DEFAULT_SYSTEM_VOLTAGE: f64 = 12.0;

/// Canonical DC system voltages (V).
pub const CANONICAL_SYSTEM_VOLTAGES: [f64; 3] = [12.0, 24.0, 48.0];

/// Declared voltages closer than this are always compatible (V).
/// Covers nominal vs. loaded battery voltage, e.g. 12.0 vs 12.8.
pub const VOLTAGE_MATCH_TOLERANCE: f64 = 1.0;

/// AC line voltage for AC loads and panels that do not declare one (V).
pub const DEFAULT_AC_VOLTAGE: f64 = 120.0;

/// Current assigned to a wire when no inference branch applies (A).
pub const DEFAULT_WIRE_CURRENT: f64 = 10.0;

/// Draw assumed for a DC load declaring neither `watts` nor `amps` (A).
pub const DEFAULT_LOAD_AMPS: f64 = 10.0;

/// Inverter conversion efficiency when not declared.
pub const DEFAULT_INVERTER_EFFICIENCY: f64 = 0.875;

/// Share of nameplate rating assumed when no AC load is discoverable.
pub const INVERTER_UTILIZATION: f64 = 0.8;

/// Nameplate ratings for inverter-class devices that do not declare `watts` (W).
pub const DEFAULT_INVERTER_WATTS: f64 = 1000.0;
pub const DEFAULT_PHOENIX_INVERTER_WATTS: f64 = 1200.0;
pub const DEFAULT_MULTIPLUS_WATTS: f64 = 3000.0;

/// Solar panel rating when `watts` is missing (W).
pub const DEFAULT_SOLAR_PANEL_WATTS: f64 = 100.0;

/// Vmp = system voltage × this factor unless the panel declares a usable voltage.
pub const SOLAR_VMP_FACTOR: f64 = 1.5;

/// A declared panel voltage within this fraction of the system voltage is
/// treated as a mistaken system-voltage entry.
pub const SOLAR_VOLTAGE_MISTAKE_BAND: f64 = 0.2;

/// Rated output currents for charging sources that do not declare `amps` (A).
pub const DEFAULT_MPPT_AMPS: f64 = 30.0;
pub const DEFAULT_BLUE_SMART_AMPS: f64 = 15.0;
pub const DEFAULT_ORION_AMPS: f64 = 30.0;

/// Wire sizing parameters.
pub const DEFAULT_MAX_VOLTAGE_DROP_PERCENT: f64 = 3.0;
pub const DEFAULT_AMBIENT_TEMPERATURE_C: f64 = 30.0;
pub const DEFAULT_BUNDLING_FACTOR: f64 = 1.0;

/// A sizing result within this fraction of either limit is a warning.
pub const SIZING_WARNING_FRACTION: f64 = 0.9;

/// Placements closer than this are reported as overlapping (canvas units).
pub const DEFAULT_OVERLAP_DISTANCE: f64 = 40.0;
