//! PowerGuard - electrical network analysis for low-voltage power systems
//!
//! Given the components of an RV, marine or off-grid power system and the
//! wires joining their terminals, this library infers the current in every
//! wire, recommends a conductor gauge from ampacity and voltage-drop limits,
//! and scores the design with a ranked list of issues.
//!
//! # Quick Start
//!
//! ```
//! use powerguard::model::{Component, Polarity, Wire};
//!
//! let components = vec![
//!     Component::new("bat", "battery").with_voltage(12.0).at(0.0, 0.0),
//!     Component::new("fuse", "fuse").at(150.0, 0.0),
//!     Component::new("light", "dc-load").with_watts(120.0).at(300.0, 0.0),
//! ];
//! let wires = vec![
//!     Wire::new("w1", ("bat", "positive"), ("fuse", "in"), Polarity::Positive).with_length(1.0),
//!     Wire::new("w2", ("fuse", "out"), ("light", "positive"), Polarity::Positive).with_length(10.0),
//!     Wire::new("w3", ("light", "negative"), ("bat", "negative"), Polarity::Negative).with_length(10.0),
//! ];
//!
//! let report = powerguard::validate(&components, &wires, Some(12.0));
//! assert!(report.valid);
//!
//! for issue in &report.issues {
//!     println!("{}: {}", issue.severity, issue.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Connection rules**: terminal polarity, wire polarity, voltage compatibility
//! - **Current inference**: inverters, solar, chargers, panels, bus-bar net current
//! - **Wire sizing**: AWG 18 to 4/0, copper and aluminum, temperature derating
//! - **Validation**: structural checks, scoring, per-wire reports

pub mod analyzer;
pub mod compliance;
pub mod connection;
pub mod core;
pub mod defaults;
pub mod model;
pub mod registry;
pub mod topology;

// Re-export main types
pub use analyzer::{
    CurrentBasis, CurrentEstimate, DesignValidator, Issue, IssueCategory, Severity,
    ValidationMetrics, ValidationReport, WireReport,
};
pub use compliance::{Gauge, InsulationRating, SizingRequest, SizingStatus, WireCalculation};
pub use connection::{ConnectionRulesEngine, ConnectionVerdict};
pub use crate::core::{PowerGuardCore, PowerGuardError, ValidationOptions};
pub use model::{Component, ConductorMaterial, DesignSnapshot, Polarity, Wire};
pub use registry::DeviceRegistry;

use analyzer::CurrentEstimator;
use topology::Topology;

/// Check whether two terminals may be wired together (built-in catalog).
pub fn validate_connection(
    from: &Component,
    from_terminal: &str,
    to: &Component,
    to_terminal: &str,
) -> ConnectionVerdict {
    ConnectionRulesEngine::with_default_rules(DeviceRegistry::builtin())
        .validate_connection(from, from_terminal, to, to_terminal)
}

/// Current carried by `wire`. Size with `per_wire`; `total` is the whole
/// parallel run. System voltage is inferred from the first battery.
pub fn estimate_current(wire: &Wire, components: &[Component], wires: &[Wire]) -> CurrentEstimate {
    let topology = Topology::new(components, wires, DeviceRegistry::builtin());
    CurrentEstimator::new(&topology, model::infer_system_voltage(components)).estimate(wire)
}

/// Smallest gauge meeting the request's ampacity and voltage-drop limits.
pub fn size(request: &SizingRequest) -> WireCalculation {
    compliance::size_wire(request)
}

/// Validate a design with default options and the built-in catalog.
pub fn validate(components: &[Component], wires: &[Wire], system_voltage: Option<f64>) -> ValidationReport {
    DesignValidator::with_defaults().validate(components, wires, system_voltage)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Component, ConductorMaterial, DesignSnapshot, DesignValidator, Gauge, Issue,
        IssueCategory, Polarity, PowerGuardCore, PowerGuardError, Severity, SizingRequest,
        ValidationOptions, ValidationReport, Wire,
    };
}
