//! Parallel wire groups.
//!
//! Wires sharing the same unordered endpoint pair and the same polarity are one
//! conductor run split into N physical wires. The grouping is derived from the
//! wire list on every call and never stored.

use crate::model::{Polarity, Wire};

/// Identity of a conductor run: unordered endpoints plus polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParallelKey {
    pub a: String,
    pub b: String,
    pub polarity: Polarity,
}

impl ParallelKey {
    pub fn of(wire: &Wire) -> Self {
        let (a, b) = if wire.from_component_id <= wire.to_component_id {
            (&wire.from_component_id, &wire.to_component_id)
        } else {
            (&wire.to_component_id, &wire.from_component_id)
        };
        Self {
            a: a.clone(),
            b: b.clone(),
            polarity: wire.polarity,
        }
    }
}

/// Number of physical wires in `wire`'s run (at least 1).
pub fn parallel_count(wire: &Wire, wires: &[Wire]) -> usize {
    let key = ParallelKey::of(wire);
    1 + wires
        .iter()
        .filter(|w| w.id != wire.id && ParallelKey::of(w) == key)
        .count()
}

/// Per-wire share of a run's total current.
pub fn split_current(total: f64, count: usize) -> f64 {
    total / count.max(1) as f64
}
