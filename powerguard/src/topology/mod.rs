//! Design Topology Graph
//!
//! Graph view of a design snapshot using petgraph. Components are nodes and
//! every wire is an undirected edge, so traversals can enumerate the wires at
//! a component without rescanning the wire list.
//!
//! The graph borrows the snapshot; it is built per call and never shared.

pub mod classify;
pub mod parallel;

pub use classify::{default_charger_amps, default_inverter_watts, DeviceKind};
pub use parallel::{parallel_count, split_current, ParallelKey};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Component, Wire};
use crate::registry::{DeviceRegistry, PolarityClass, TerminalDefinition};

pub struct Topology<'a> {
    /// Node weight: index into `components`. Edge weight: index into `wires`.
    graph: UnGraph<usize, usize>,
    indices: HashMap<&'a str, NodeIndex>,
    components: &'a [Component],
    wires: &'a [Wire],
    registry: &'a DeviceRegistry,
}

impl<'a> Topology<'a> {
    pub fn new(components: &'a [Component], wires: &'a [Wire], registry: &'a DeviceRegistry) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut indices = HashMap::new();

        // Pass 1: components. Duplicate ids keep the first occurrence.
        for (i, component) in components.iter().enumerate() {
            if !indices.contains_key(component.id.as_str()) {
                let idx = graph.add_node(i);
                indices.insert(component.id.as_str(), idx);
            }
        }

        // Pass 2: wires. Dangling wires and self-connections carry no current
        // between components and stay out of the graph.
        for (i, wire) in wires.iter().enumerate() {
            if wire.is_self_connection() {
                continue;
            }
            let from = indices.get(wire.from_component_id.as_str());
            let to = indices.get(wire.to_component_id.as_str());
            if let (Some(&from), Some(&to)) = (from, to) {
                graph.add_edge(from, to, i);
            }
        }

        Self {
            graph,
            indices,
            components,
            wires,
            registry,
        }
    }

    pub fn registry(&self) -> &'a DeviceRegistry {
        self.registry
    }

    pub fn wires(&self) -> &'a [Wire] {
        self.wires
    }

    pub fn component(&self, id: &str) -> Option<&'a Component> {
        let idx = self.indices.get(id)?;
        self.graph
            .node_weight(*idx)
            .map(|&i| &self.components[i])
    }

    pub fn kind(&self, id: &str) -> DeviceKind {
        self.component(id)
            .map(|c| DeviceKind::classify(c, self.registry))
            .unwrap_or(DeviceKind::Other)
    }

    /// Wires attached to a component, in wire-list order.
    pub fn wires_at(&self, id: &str) -> Vec<&'a Wire> {
        let Some(&idx) = self.indices.get(id) else {
            return Vec::new();
        };
        let mut wire_indices: Vec<usize> = self.graph.edges(idx).map(|e| *e.weight()).collect();
        wire_indices.sort_unstable();
        wire_indices.dedup();
        wire_indices.into_iter().map(|i| &self.wires[i]).collect()
    }

    pub fn terminal(&self, component_id: &str, terminal_id: &str) -> Option<&'a TerminalDefinition> {
        let component = self.component(component_id)?;
        self.registry.terminal(component, terminal_id)
    }

    pub fn terminal_class(&self, component_id: &str, terminal_id: &str) -> Option<PolarityClass> {
        self.terminal(component_id, terminal_id).map(|t| t.polarity)
    }

    pub fn stats(&self) -> TopologyStats {
        TopologyStats {
            component_count: self.indices.len(),
            connection_count: self.graph.edge_count(),
            orphan_count: self
                .indices
                .values()
                .filter(|&&idx| self.graph.edges(idx).next().is_none())
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyStats {
    pub component_count: usize,
    pub connection_count: usize,
    pub orphan_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Polarity;

    fn create_test_design() -> (Vec<Component>, Vec<Wire>) {
        let components = vec![
            Component::new("bat", "battery").with_voltage(12.0),
            Component::new("load", "dc-load").with_watts(120.0),
            Component::new("spare", "fuse"),
        ];
        let wires = vec![
            Wire::new("w1", ("bat", "positive"), ("load", "positive"), Polarity::Positive),
            Wire::new("w2", ("bat", "negative"), ("load", "negative"), Polarity::Negative),
            Wire::new("w3", ("bat", "positive"), ("ghost", "in"), Polarity::Positive),
            Wire::new("w4", ("bat", "positive"), ("bat", "negative"), Polarity::Positive),
        ];
        (components, wires)
    }

    #[test]
    fn test_wires_at_component() {
        let (components, wires) = create_test_design();
        let topology = Topology::new(&components, &wires, DeviceRegistry::builtin());

        let ids: Vec<&str> = topology.wires_at("bat").iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
        assert!(topology.wires_at("spare").is_empty());
        assert!(topology.wires_at("ghost").is_empty());
    }

    #[test]
    fn test_kind_and_terminal_lookup() {
        let (components, wires) = create_test_design();
        let topology = Topology::new(&components, &wires, DeviceRegistry::builtin());

        assert_eq!(topology.kind("load"), DeviceKind::DcLoad);
        assert_eq!(topology.kind("ghost"), DeviceKind::Other);
        assert_eq!(
            topology.terminal_class("load", "negative"),
            Some(PolarityClass::Negative)
        );
    }

    #[test]
    fn test_stats() {
        let (components, wires) = create_test_design();
        let topology = Topology::new(&components, &wires, DeviceRegistry::builtin());
        let stats = topology.stats();

        assert_eq!(stats.component_count, 3);
        assert_eq!(stats.connection_count, 2);
        assert_eq!(stats.orphan_count, 1);
    }
}
