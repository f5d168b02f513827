//! Design Validator
//!
//! Runs current inference and wire sizing on every wire, re-runs the
//! connection rules against the current topology, adds the structural checks
//! and folds everything into one ranked issue list and a score.
//!
//! Stateless: each call builds its own topology and visited sets, so the same
//! validator can serve concurrent callers and repeated calls on an unchanged
//! snapshot return identical reports.

use serde::{Deserialize, Serialize};

use super::current::{CurrentEstimate, CurrentEstimator};
use super::issues::{sort_issues, Issue, IssueCategory, Severity};
use super::score::compute_score;
use super::structural::check_structure;
use crate::compliance::{evaluate_gauge, size_wire, Gauge, SizingRequest, SizingStatus, WireCalculation};
use crate::connection::ConnectionRulesEngine;
use crate::core::ValidationOptions;
use crate::model::{infer_system_voltage, Component, DesignSnapshot, Wire};
use crate::registry::DeviceRegistry;
use crate::topology::Topology;

pub const WIRE_SIZING: &str = "wire_sizing";
pub const INSTALLED_GAUGE: &str = "installed_gauge";
pub const CONNECTION: &str = "connection";

/// Current and sizing figures for one wire, for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReport {
    pub wire_id: String,
    pub current: CurrentEstimate,
    pub voltage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_gauge: Option<Gauge>,
    /// `None` for data wires, which carry no meaningful current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<WireCalculation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMetrics {
    pub component_count: usize,
    pub wire_count: usize,
    pub connection_count: usize,
    pub orphan_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub wires_sized: usize,
    /// Sum of per-wire currents over sized wires (A).
    pub total_current: f64,
    pub system_voltage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub score: f64,
    pub issues: Vec<Issue>,
    pub metrics: ValidationMetrics,
    pub wire_reports: Vec<WireReport>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.metrics.error_count > 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Whether any issue is at least as severe as `threshold`.
    pub fn has_at_least(&self, threshold: Severity) -> bool {
        self.issues.iter().any(|i| i.severity <= threshold)
    }

    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    pub fn wire_report(&self, wire_id: &str) -> Option<&WireReport> {
        self.wire_reports.iter().find(|r| r.wire_id == wire_id)
    }
}

pub struct DesignValidator<'r> {
    registry: &'r DeviceRegistry,
    options: ValidationOptions,
    connections: ConnectionRulesEngine<'r>,
}

impl DesignValidator<'static> {
    /// Built-in catalog, default options.
    pub fn with_defaults() -> Self {
        Self::new(DeviceRegistry::builtin(), ValidationOptions::default())
    }
}

impl<'r> DesignValidator<'r> {
    pub fn new(registry: &'r DeviceRegistry, options: ValidationOptions) -> Self {
        Self {
            registry,
            options,
            connections: ConnectionRulesEngine::with_default_rules(registry),
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn validate_snapshot(&self, snapshot: &DesignSnapshot) -> ValidationReport {
        self.validate(&snapshot.components, &snapshot.wires, snapshot.system_voltage)
    }

    /// Validate a design. Without a usable `system_voltage` it is inferred
    /// from the first battery, else 12 V.
    pub fn validate(
        &self,
        components: &[Component],
        wires: &[Wire],
        system_voltage: Option<f64>,
    ) -> ValidationReport {
        let system_voltage = system_voltage
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or_else(|| infer_system_voltage(components));

        let topology = Topology::new(components, wires, self.registry);
        let estimator = CurrentEstimator::new(&topology, system_voltage)
            .with_default_efficiency(self.options.inverter_efficiency);

        let mut issues = Vec::new();
        let mut wire_reports = Vec::with_capacity(wires.len());

        for wire in wires {
            let (report, wire_issues) = self.check_wire(&estimator, wire);
            wire_reports.push(report);
            issues.extend(wire_issues);
        }

        for wire in wires {
            if wire.is_self_connection() {
                continue;
            }
            let verdict = self.connections.validate_wire(wire, components);
            let (Some(severity), Some(message)) = (verdict.severity, verdict.message) else {
                continue;
            };
            let rule = verdict.rule_id.unwrap_or_default();
            issues.push(
                Issue::new(CONNECTION, &wire.id, severity, IssueCategory::Electrical, message)
                    .with_wire(&wire.id)
                    .with_components([&wire.from_component_id, &wire.to_component_id])
                    .with_suggestion(format!("Failed connection rule '{}'", rule)),
            );
        }

        issues.extend(check_structure(
            &topology,
            components,
            wires,
            self.options.overlap_distance,
        ));

        issues.retain(|i| self.options.is_enabled(&i.rule_id));
        sort_issues(&mut issues);

        let score = compute_score(&issues);
        let stats = topology.stats();
        let sized: Vec<&WireCalculation> = wire_reports.iter().filter_map(|r| r.calculation.as_ref()).collect();
        let metrics = ValidationMetrics {
            component_count: stats.component_count,
            wire_count: wires.len(),
            connection_count: stats.connection_count,
            orphan_count: stats.orphan_count,
            error_count: issues.iter().filter(|i| i.severity == Severity::Error).count(),
            warning_count: issues.iter().filter(|i| i.severity == Severity::Warning).count(),
            info_count: issues.iter().filter(|i| i.severity == Severity::Info).count(),
            wires_sized: sized.len(),
            total_current: sized.iter().map(|c| c.current).sum(),
            system_voltage,
        };

        tracing::info!(
            "Validated {} components, {} wires at {} V: score {}, {} errors, {} warnings",
            metrics.component_count,
            metrics.wire_count,
            system_voltage,
            score,
            metrics.error_count,
            metrics.warning_count
        );

        ValidationReport {
            valid: metrics.error_count == 0,
            score,
            issues,
            metrics,
            wire_reports,
        }
    }

    fn sizing_request(&self, current: f64, wire: &Wire, voltage: f64, floor: Option<Gauge>) -> SizingRequest {
        SizingRequest::new(current, wire.length, voltage)
            .with_temperature(self.options.ambient_temperature_c)
            .with_material(wire.conductor_material)
            .with_insulation(self.options.insulation)
            .with_bundling_factor(self.options.bundling_factor)
            .with_max_drop_percent(self.options.max_voltage_drop_percent)
            .with_floor(floor)
    }

    fn check_wire(&self, estimator: &CurrentEstimator<'_, '_>, wire: &Wire) -> (WireReport, Vec<Issue>) {
        let estimate = estimator.estimate(wire);
        let voltage = estimator.wire_voltage(wire);
        let mut issues = Vec::new();

        let installed = match wire.gauge.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Gauge>() {
                Ok(gauge) => Some(gauge),
                Err(e) => {
                    issues.push(
                        Issue::new(
                            INSTALLED_GAUGE,
                            &wire.id,
                            Severity::Warning,
                            IssueCategory::WireSizing,
                            format!("Wire {}: {}", wire.id, e),
                        )
                        .with_wire(&wire.id)
                        .with_suggestion("Use an AWG size from 18 to 4/0"),
                    );
                    None
                }
            },
        };

        let mut report = WireReport {
            wire_id: wire.id.clone(),
            current: estimate,
            voltage,
            installed_gauge: installed,
            calculation: None,
        };

        if estimator.is_data_wire(wire) {
            return (report, issues);
        }

        let floor = if self.options.respect_installed_gauge {
            installed
        } else {
            None
        };
        let request = self.sizing_request(estimate.per_wire, wire, voltage, floor);
        let calculation = size_wire(&request);
        let figures = current_figures(&estimate);

        match calculation.status {
            SizingStatus::Valid => {}
            SizingStatus::Warning => issues.push(
                Issue::new(
                    WIRE_SIZING,
                    &wire.id,
                    Severity::Warning,
                    IssueCategory::WireSizing,
                    format!("Wire {} {}: {}", wire.id, figures, calculation.message),
                )
                .with_wire(&wire.id)
                .with_suggestion(format!(
                    "Consider the next size up from {}",
                    calculation.recommended_gauge
                )),
            ),
            SizingStatus::Error => issues.push(
                Issue::new(
                    WIRE_SIZING,
                    &wire.id,
                    Severity::Error,
                    IssueCategory::WireSizing,
                    format!("Wire {} {}: {}", wire.id, figures, calculation.message),
                )
                .with_wire(&wire.id)
                .with_suggestion("Shorten the run, raise the system voltage or add parallel conductors"),
            ),
        }

        if let Some(gauge) = installed {
            let eval = evaluate_gauge(&request, gauge);
            if !eval.ampacity_ok(request.current_a) {
                issues.push(
                    Issue::new(
                        INSTALLED_GAUGE,
                        &wire.id,
                        Severity::Error,
                        IssueCategory::WireSizing,
                        format!(
                            "Wire {} is {} but carries {}; derated ampacity is only {:.1}A",
                            wire.id, gauge, figures, eval.derated_ampacity
                        ),
                    )
                    .with_wire(&wire.id)
                    .with_suggestion(undersize_hint(&self.sizing_request(estimate.per_wire, wire, voltage, None))),
                );
            } else if !eval.drop_ok() {
                issues.push(
                    Issue::new(
                        INSTALLED_GAUGE,
                        &wire.id,
                        Severity::Warning,
                        IssueCategory::WireSizing,
                        format!(
                            "Wire {} is {}: {:.2}% voltage drop over {:.1} ft exceeds the {:.1}% limit",
                            wire.id,
                            gauge,
                            eval.voltage_drop_percent,
                            wire.length,
                            self.options.max_voltage_drop_percent
                        ),
                    )
                    .with_wire(&wire.id)
                    .with_suggestion(undersize_hint(&self.sizing_request(estimate.per_wire, wire, voltage, None))),
                );
            }
        }

        report.calculation = Some(calculation);
        (report, issues)
    }
}

/// "(25.0A per wire, 50.0A total over 2 parallel wires)" or "(25.0A)".
fn current_figures(estimate: &CurrentEstimate) -> String {
    if estimate.parallel_count > 1 {
        format!(
            "({:.1}A per wire, {:.1}A total over {} parallel wires)",
            estimate.per_wire, estimate.total, estimate.parallel_count
        )
    } else {
        format!("({:.1}A)", estimate.per_wire)
    }
}

fn undersize_hint(request: &SizingRequest) -> String {
    let needed = size_wire(request);
    match needed.status {
        SizingStatus::Error => "No single conductor is large enough; add parallel conductors".to_string(),
        _ => format!("Use {} or larger", needed.recommended_gauge),
    }
}
