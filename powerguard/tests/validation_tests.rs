//! Design validator scoring and option handling

use powerguard::analyzer::{compute_score, DesignValidator};
use powerguard::prelude::*;
use powerguard::registry::DeviceRegistry;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn simple_design() -> (Vec<Component>, Vec<Wire>) {
    let snapshot = PowerGuardCore::load_snapshot(&fixture_path("simple_load.json")).unwrap();
    (snapshot.components, snapshot.wires)
}

#[test]
fn test_valid_iff_no_errors() {
    for name in [
        "simple_load.json",
        "parallel_inverter.json",
        "busbar_net.json",
        "invalid_design.json",
    ] {
        let report =
            PowerGuardCore::validate_file(&fixture_path(name), ValidationOptions::default()).unwrap();
        assert_eq!(report.valid, report.count(Severity::Error) == 0, "{}", name);
        assert_eq!(report.valid, !report.has_errors(), "{}", name);
        assert_eq!(report.score, compute_score(&report.issues), "{}", name);
        assert!((0.0..=100.0).contains(&report.score), "{}", name);
    }
}

#[test]
fn test_score_monotonic_in_orphans() {
    let (mut components, wires) = simple_design();
    let mut previous = powerguard::validate(&components, &wires, None).score;

    for n in 0..8 {
        components.push(Component::new(format!("spare-{}", n), "dc-load").at(1000.0 + n as f64 * 200.0, 900.0));
        let report = powerguard::validate(&components, &wires, None);
        assert!(report.score < previous, "score did not drop after orphan {}", n);
        assert!(report.valid);
        previous = report.score;
    }
}

#[test]
fn test_warnings_never_invalidate() {
    let (mut components, wires) = simple_design();
    components.push(Component::new("spare", "dc-load").at(900.0, 900.0));

    let report = powerguard::validate(&components, &wires, None);
    assert!(report.has_at_least(Severity::Warning));
    assert!(!report.has_at_least(Severity::Error));
    assert!(report.valid);
    assert_eq!(report.score, 97.0);
}

#[test]
fn test_disabled_checks_are_skipped() {
    let options = ValidationOptions {
        disabled_checks: vec!["orphan_component".to_string(), "self_connection".to_string()],
        ..ValidationOptions::default()
    };
    let report =
        PowerGuardCore::validate_file(&fixture_path("invalid_design.json"), options).unwrap();

    assert!(report
        .issues
        .iter()
        .all(|i| i.rule_id != "orphan_component" && i.rule_id != "self_connection"));
    assert!(report.issues.iter().any(|i| i.rule_id == "dangling_wire"));
}

#[test]
fn test_options_file() {
    let options = ValidationOptions::from_json_file(&fixture_path("strict_options.json")).unwrap();
    assert_eq!(options.max_voltage_drop_percent, 2.0);
    assert!(!options.is_enabled("overlap"));

    let report = PowerGuardCore::validate_file(&fixture_path("simple_load.json"), options).unwrap();

    // 10 AWG over 10 ft at 10A drops just over 2%.
    let feed = report.wire_report("w-fuse-load").unwrap();
    assert_eq!(feed.calculation.as_ref().unwrap().recommended_gauge, Gauge::Awg8);
    let issue = report
        .issues
        .iter()
        .find(|i| i.id == "installed_gauge:w-fuse-load")
        .unwrap();
    assert_eq!(issue.severity, Severity::Warning);
    assert!(issue.suggestion.as_deref().unwrap().contains("8 AWG"));
    assert!(report.valid);
}

#[test]
fn test_options_file_roundtrip_via_tempfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    let options = ValidationOptions {
        ambient_temperature_c: 40.0,
        respect_installed_gauge: false,
        ..ValidationOptions::default()
    };
    std::fs::write(&path, serde_json::to_string_pretty(&options).unwrap()).unwrap();

    assert_eq!(ValidationOptions::from_json_file(&path).unwrap(), options);

    std::fs::write(&path, r#"{ "inverter_efficiency": 0 }"#).unwrap();
    assert!(matches!(
        ValidationOptions::from_json_file(&path),
        Err(PowerGuardError::Config(_))
    ));
}

#[test]
fn test_installed_gauge_floor_can_be_ignored() {
    let (components, mut wires) = simple_design();
    for wire in &mut wires {
        wire.gauge = Some("4".to_string());
    }

    let floored = powerguard::validate(&components, &wires, None);
    let report = floored.wire_report("w-fuse-load").unwrap();
    assert_eq!(report.calculation.as_ref().unwrap().recommended_gauge, Gauge::Awg4);

    let options = ValidationOptions {
        respect_installed_gauge: false,
        ..ValidationOptions::default()
    };
    let free = DesignValidator::new(DeviceRegistry::builtin(), options).validate(&components, &wires, None);
    let report = free.wire_report("w-fuse-load").unwrap();
    assert_eq!(report.calculation.as_ref().unwrap().recommended_gauge, Gauge::Awg10);
}

#[test]
fn test_data_wires_are_not_sized() {
    let components = vec![
        Component::new("mppt", "mppt").at(0.0, 0.0),
        Component::new("gx", "cerbo-gx").at(300.0, 0.0),
    ];
    let wires = vec![Wire::new("comms", ("mppt", "ve-direct"), ("gx", "ve-direct-1"), Polarity::Positive)];

    let report = powerguard::validate(&components, &wires, Some(12.0));
    let comms = report.wire_report("comms").unwrap();
    assert!(comms.calculation.is_none());
    assert_eq!(report.metrics.wires_sized, 0);
}

#[test]
fn test_unplaced_design_has_no_overlaps() {
    let components = vec![
        Component::new("bat", "battery").with_voltage(12.0),
        Component::new("fuse", "fuse"),
        Component::new("light", "dc-load").with_watts(120.0),
    ];
    let wires = vec![
        Wire::new("w1", ("bat", "positive"), ("fuse", "in"), Polarity::Positive).with_length(1.0),
        Wire::new("w2", ("fuse", "out"), ("light", "positive"), Polarity::Positive).with_length(10.0),
        Wire::new("w3", ("light", "negative"), ("bat", "negative"), Polarity::Negative).with_length(10.0),
    ];

    let report = powerguard::validate(&components, &wires, Some(12.0));
    assert!(report.issues.iter().all(|i| i.rule_id != "overlap"));
    assert_eq!(report.score, 100.0);
}

#[test]
fn test_overlap_reported() {
    let (mut components, wires) = simple_design();
    components[1] = components[1].clone().at(10.0, 0.0);

    let report = powerguard::validate(&components, &wires, None);
    assert!(report
        .issues
        .iter()
        .any(|i| i.id == "overlap:battery-1+fuse-1" && i.severity == Severity::Info));
}
