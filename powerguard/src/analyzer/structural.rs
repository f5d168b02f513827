//! Structural and layout checks.
//!
//! Everything the validator reports that does not need a current estimate:
//! broken references, unused mandatory terminals, orphans, overlapping
//! placements, an unprotected battery and designs generated without any
//! power source.

use std::collections::{BTreeSet, HashSet};

use super::issues::{Issue, IssueCategory, Severity};
use crate::model::{Component, Position, Wire};
use crate::registry::PolarityClass;
use crate::topology::{DeviceKind, Topology};

pub const DUPLICATE_ID: &str = "duplicate_id";
pub const UNKNOWN_DEVICE: &str = "unknown_device";
pub const DANGLING_WIRE: &str = "dangling_wire";
pub const SELF_CONNECTION: &str = "self_connection";
pub const UNKNOWN_TERMINAL: &str = "unknown_terminal";
pub const MANDATORY_TERMINAL: &str = "mandatory_terminal";
pub const ORPHAN_COMPONENT: &str = "orphan_component";
pub const OVERLAP: &str = "overlap";
pub const UNFUSED_BATTERY: &str = "unfused_battery";
pub const NO_POWER_SOURCE: &str = "no_power_source";

pub fn check_structure(topology: &Topology<'_>, components: &[Component], wires: &[Wire], overlap_distance: f64) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(check_duplicate_ids(components, wires));
    issues.extend(check_unknown_devices(topology, components));
    issues.extend(check_wire_references(topology, wires));
    issues.extend(check_mandatory_terminals(topology, components, wires));
    issues.extend(check_orphans(components, wires));
    issues.extend(check_overlaps(components, overlap_distance));
    issues.extend(check_unfused_batteries(topology, components));
    issues.extend(check_power_source(topology, components));
    issues
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> BTreeSet<&'a str> {
    let mut seen = HashSet::new();
    ids.filter(|id| !seen.insert(*id)).collect()
}

pub fn check_duplicate_ids(components: &[Component], wires: &[Wire]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for id in duplicates(components.iter().map(|c| c.id.as_str())) {
        issues.push(
            Issue::new(
                DUPLICATE_ID,
                &format!("component:{}", id),
                Severity::Error,
                IssueCategory::AiQuality,
                format!("Component id '{}' is used more than once", id),
            )
            .with_components([id])
            .with_suggestion("Give every component a unique id; only the first one is analyzed"),
        );
    }

    for id in duplicates(wires.iter().map(|w| w.id.as_str())) {
        issues.push(
            Issue::new(
                DUPLICATE_ID,
                &format!("wire:{}", id),
                Severity::Error,
                IssueCategory::AiQuality,
                format!("Wire id '{}' is used more than once", id),
            )
            .with_wire(id),
        );
    }
    issues
}

pub fn check_unknown_devices(topology: &Topology<'_>, components: &[Component]) -> Vec<Issue> {
    components
        .iter()
        .filter(|c| !topology.registry().contains(&c.device_type))
        .map(|c| {
            Issue::new(
                UNKNOWN_DEVICE,
                &c.id,
                Severity::Info,
                IssueCategory::AiQuality,
                format!(
                    "{} has device type '{}', which is not in the catalog; its connections are not checked",
                    c.id, c.device_type
                ),
            )
            .with_components([&c.id])
        })
        .collect()
}

/// Missing components, self-connections and terminals absent from the catalog.
pub fn check_wire_references(topology: &Topology<'_>, wires: &[Wire]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for wire in wires {
        let ends = [
            ("from", &wire.from_component_id, &wire.from_terminal),
            ("to", &wire.to_component_id, &wire.to_terminal),
        ];

        let missing: Vec<&str> = ends
            .iter()
            .filter(|(_, id, _)| topology.component(id).is_none())
            .map(|(_, id, _)| id.as_str())
            .collect();
        if !missing.is_empty() {
            issues.push(
                Issue::new(
                    DANGLING_WIRE,
                    &wire.id,
                    Severity::Error,
                    IssueCategory::Terminal,
                    format!(
                        "Wire {} references missing component(s): {}",
                        wire.id,
                        missing.join(", ")
                    ),
                )
                .with_wire(&wire.id)
                .with_suggestion("Reconnect the wire or delete it"),
            );
        }

        if wire.is_self_connection() {
            issues.push(
                Issue::new(
                    SELF_CONNECTION,
                    &wire.id,
                    Severity::Error,
                    IssueCategory::Electrical,
                    format!(
                        "Wire {} starts and ends on {} ({} to {})",
                        wire.id, wire.from_component_id, wire.from_terminal, wire.to_terminal
                    ),
                )
                .with_wire(&wire.id)
                .with_components([&wire.from_component_id]),
            );
        }

        for (side, id, terminal) in ends {
            let Some(component) = topology.component(id) else {
                continue;
            };
            let Some(definition) = topology.registry().lookup(&component.device_type) else {
                continue;
            };
            if definition.terminal(terminal).is_none() {
                let known: Vec<&str> = definition.terminals.iter().map(|t| t.id.as_str()).collect();
                issues.push(
                    Issue::new(
                        UNKNOWN_TERMINAL,
                        &format!("{}:{}", wire.id, side),
                        Severity::Warning,
                        IssueCategory::Terminal,
                        format!(
                            "Wire {} uses terminal '{}' on {} ({}), which has no such terminal",
                            wire.id, terminal, id, component.device_type
                        ),
                    )
                    .with_wire(&wire.id)
                    .with_components([id])
                    .with_suggestion(format!("Valid terminals: {}", known.join(", "))),
                );
            }
        }
    }
    issues
}

fn is_wired(wires: &[Wire], component_id: &str, terminal: &str) -> bool {
    wires.iter().any(|w| {
        (w.from_component_id == component_id && w.from_terminal == terminal)
            || (w.to_component_id == component_id && w.to_terminal == terminal)
    })
}

/// Mandatory terminals without a wire. Orphans are reported once, as orphans.
pub fn check_mandatory_terminals(topology: &Topology<'_>, components: &[Component], wires: &[Wire]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for component in components {
        if !seen.insert(component.id.as_str()) || !wires.iter().any(|w| w.touches(&component.id)) {
            continue;
        }
        let Some(definition) = topology.registry().lookup(&component.device_type) else {
            continue;
        };
        for terminal in definition.mandatory_terminals() {
            if is_wired(wires, &component.id, &terminal.id) {
                continue;
            }
            let label = terminal.name.as_deref().unwrap_or(&terminal.id);
            issues.push(
                Issue::new(
                    MANDATORY_TERMINAL,
                    &format!("{}.{}", component.id, terminal.id),
                    Severity::Warning,
                    IssueCategory::Terminal,
                    format!(
                        "{} ({}) has no wire on required terminal {}",
                        component.id, definition.name, label
                    ),
                )
                .with_components([&component.id])
                .with_suggestion(definition.wiring_guidance.clone()),
            );
        }
    }
    issues
}

pub fn check_orphans(components: &[Component], wires: &[Wire]) -> Vec<Issue> {
    let mut seen = HashSet::new();
    components
        .iter()
        .filter(|c| seen.insert(c.id.as_str()))
        .filter(|c| !wires.iter().any(|w| w.touches(&c.id)))
        .map(|c| {
            Issue::new(
                ORPHAN_COMPONENT,
                &c.id,
                Severity::Warning,
                IssueCategory::Layout,
                format!("{} ({}) is not connected to anything", c.id, c.device_type),
            )
            .with_components([&c.id])
            .with_suggestion("Wire the component into the system or remove it")
        })
        .collect()
}

/// Unplaced components are skipped.
pub fn check_overlaps(components: &[Component], min_distance: f64) -> Vec<Issue> {
    let placed: Vec<(&Component, &Position)> = components
        .iter()
        .filter_map(|c| c.position.as_ref().map(|p| (c, p)))
        .collect();

    let mut issues = Vec::new();
    for (i, &(a, a_pos)) in placed.iter().enumerate() {
        for &(b, b_pos) in &placed[i + 1..] {
            if a.id == b.id {
                continue;
            }
            let distance = a_pos.distance_to(b_pos);
            if distance < min_distance {
                let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };
                issues.push(
                    Issue::new(
                        OVERLAP,
                        &format!("{}+{}", first.id, second.id),
                        Severity::Info,
                        IssueCategory::Layout,
                        format!(
                            "{} and {} overlap ({:.0} apart, minimum {:.0})",
                            first.id, second.id, distance, min_distance
                        ),
                    )
                    .with_components([&first.id, &second.id]),
                );
            }
        }
    }
    issues
}

/// Battery positive terminals should feed a fuse, breaker, switch or shunt.
pub fn check_unfused_batteries(topology: &Topology<'_>, components: &[Component]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for battery in components {
        if !seen.insert(battery.id.as_str()) || topology.kind(&battery.id) != DeviceKind::Battery {
            continue;
        }
        for wire in topology.wires_at(&battery.id) {
            let Some(terminal) = wire.terminal_at(&battery.id) else {
                continue;
            };
            if topology.terminal_class(&battery.id, terminal) != Some(PolarityClass::Positive) {
                continue;
            }
            let Some((other, _)) = wire.other_end(&battery.id) else {
                continue;
            };
            if !topology.kind(other).is_battery_path() {
                issues.push(
                    Issue::new(
                        UNFUSED_BATTERY,
                        &wire.id,
                        Severity::Warning,
                        IssueCategory::Electrical,
                        format!(
                            "Battery {} positive connects straight to {} with no fuse or breaker",
                            battery.id, other
                        ),
                    )
                    .with_wire(&wire.id)
                    .with_components([battery.id.as_str(), other])
                    .with_suggestion("Add a fuse or breaker close to the battery positive terminal"),
                );
            }
        }
    }
    issues
}

pub fn check_power_source(topology: &Topology<'_>, components: &[Component]) -> Vec<Issue> {
    let kinds: Vec<DeviceKind> = components.iter().map(|c| topology.kind(&c.id)).collect();
    let has_load = kinds.iter().any(|k| k.is_load() || k.is_panel());
    let has_source = kinds.iter().any(|k| {
        matches!(
            k,
            DeviceKind::Battery | DeviceKind::SolarPanel | DeviceKind::ShorePower
        ) || k.is_charger()
    });

    if has_load && !has_source {
        vec![Issue::new(
            NO_POWER_SOURCE,
            "design",
            Severity::Warning,
            IssueCategory::AiQuality,
            "Design has loads but no battery, solar panel, charger or shore power",
        )
        .with_suggestion("Add a battery bank or another power source")]
    } else {
        Vec::new()
    }
}
