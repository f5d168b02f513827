//! Size a single wire from the command line.
//! Run with: cargo run --example size_wire -- <amps> <feet> [volts]

use powerguard::prelude::*;
use powerguard::SizingStatus;

fn arg(n: usize, default: f64) -> f64 {
    std::env::args()
        .nth(n)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    let request = SizingRequest::new(arg(1, 40.0), arg(2, 12.0), arg(3, 12.0));

    for material in [ConductorMaterial::Copper, ConductorMaterial::Aluminum] {
        let result = powerguard::size(&request.clone().with_material(material));
        let marker = match result.status {
            SizingStatus::Valid => "ok",
            SizingStatus::Warning => "near limit",
            SizingStatus::Error => "no fit",
        };
        println!("{:<9} {:>8}  [{}]", material.to_string(), result.recommended_gauge.to_string(), marker);
        println!("          {}", result.message);
    }
}
