//! Design quality score.
//!
//! Starts at 100 and deducts per issue. The k-th issue of a severity costs
//! `weight × (1 + 0.1 × (k − 1))`, so one or two warnings barely register
//! while a pile of errors drives the score to zero. Every issue costs a
//! positive amount, which keeps the score monotonic in the issue set.

use super::issues::{Issue, Severity};

pub const ERROR_WEIGHT: f64 = 12.0;
pub const WARNING_WEIGHT: f64 = 3.0;
pub const INFO_WEIGHT: f64 = 0.5;

/// Extra cost of each further issue of the same severity.
pub const REPEAT_ESCALATION: f64 = 0.1;

pub fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Error => ERROR_WEIGHT,
        Severity::Warning => WARNING_WEIGHT,
        Severity::Info => INFO_WEIGHT,
    }
}

/// Total deduction for `count` issues of one severity.
pub fn deduction(severity: Severity, count: usize) -> f64 {
    let weight = severity_weight(severity);
    (0..count)
        .map(|k| weight * (1.0 + REPEAT_ESCALATION * k as f64))
        .sum()
}

/// Score in [0, 100], one decimal.
pub fn compute_score(issues: &[Issue]) -> f64 {
    let total: f64 = [Severity::Error, Severity::Warning, Severity::Info]
        .into_iter()
        .map(|severity| {
            let count = issues.iter().filter(|i| i.severity == severity).count();
            deduction(severity, count)
        })
        .sum();
    ((100.0 - total).max(0.0) * 10.0).round() / 10.0
}
