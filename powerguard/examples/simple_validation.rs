//! Simple validation example: validate a design snapshot and print results.

use powerguard::prelude::*;
use std::path::Path;

fn main() -> Result<(), PowerGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/parallel_inverter.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_validation [path/to/design.json]");
        std::process::exit(1);
    }

    let report = PowerGuardCore::validate_file(path, ValidationOptions::default())?;

    println!("Validation results for: {}", path.display());
    println!("Score: {:.1}/100", report.score);
    println!("Total issues: {}", report.total_issues());
    println!();

    for wire in &report.wire_reports {
        let Some(calc) = &wire.calculation else {
            continue;
        };
        println!(
            "  {:<16} {:>7.1}A  {:>8}  {:.2}% drop",
            wire.wire_id,
            wire.current.per_wire,
            calc.recommended_gauge.to_string(),
            calc.voltage_drop_percent
        );
    }

    if report.has_errors() {
        println!("\nErrors:");
        for issue in report.issues.iter().filter(|i| i.severity == Severity::Error) {
            println!("  - {}", issue.message);
            if let Some(ref suggestion) = issue.suggestion {
                println!("    Suggestion: {}", suggestion);
            }
        }
        println!("\nValidation failed.");
        std::process::exit(1);
    }

    println!("\nValidation passed (no errors).");
    Ok(())
}
