//! Current Inference
//!
//! Works out the current a wire must carry by walking the design topology
//! from the wire's endpoints. Branches are tried in a fixed order; the first
//! one that applies decides the figure:
//!
//! 1. explicit `current` on the wire
//! 2. DC side of an inverter: discovered AC load, or 80 % of nameplate
//! 3. solar panel: watts / Vmp
//! 4. charger output (MPPT, AC charger, DC-DC): rated amps
//! 5. load: watts / voltage, or amps
//! 6. distribution panel: sum of downstream loads
//! 7. battery path to a bus bar: net bus-bar current, floored at zero
//! 8. other bus-bar branch: magnitude of that branch's net current
//! 9. inline protection: whatever lies beyond the device
//! 10. otherwise 10 A
//!
//! Every walk carries its own visited set, keyed by component id, so ring
//! topologies terminate. DC walks follow only positive/negative wires and
//! AC walks only hot/neutral/ground wires; an inverter is the one place the
//! two meet, and it is counted by its DC-input estimate.
//!
//! The net figure on the battery path discards surplus generation: when
//! sources exceed loads the wire shows 0 A rather than a charge current.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::defaults::*;
use crate::model::{Component, Polarity, Wire};
use crate::registry::PolarityClass;
use crate::topology::{
    default_charger_amps, default_inverter_watts, parallel_count, split_current, DeviceKind,
    Topology,
};

/// Which inference branch produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentBasis {
    Override,
    InverterDcInput,
    InverterRated,
    SolarPanel,
    ChargerOutput,
    Load,
    Panel,
    BusBarNet,
    BusBarBranch,
    PassThrough,
    Default,
}

impl CurrentBasis {
    pub fn describe(&self) -> &'static str {
        match self {
            CurrentBasis::Override => "explicit current",
            CurrentBasis::InverterDcInput => "inverter DC input from AC load",
            CurrentBasis::InverterRated => "inverter rating at 80% utilization",
            CurrentBasis::SolarPanel => "solar panel output at Vmp",
            CurrentBasis::ChargerOutput => "charger rated output",
            CurrentBasis::Load => "load draw",
            CurrentBasis::Panel => "distribution panel loads",
            CurrentBasis::BusBarNet => "net bus bar current",
            CurrentBasis::BusBarBranch => "bus bar branch",
            CurrentBasis::PassThrough => "current through protection device",
            CurrentBasis::Default => "default estimate",
        }
    }
}

/// Current for one wire. `total` is the whole conductor run; `per_wire` is
/// this physical wire's share and is what sizing must use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentEstimate {
    pub total: f64,
    pub per_wire: f64,
    pub parallel_count: usize,
    pub basis: CurrentBasis,
}

/// Load and source current found beyond a node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Flow {
    load: f64,
    source: f64,
    found: bool,
}

impl Flow {
    fn load(amps: f64) -> Self {
        Self {
            load: amps,
            source: 0.0,
            found: true,
        }
    }

    fn source(amps: f64) -> Self {
        Self {
            load: 0.0,
            source: amps,
            found: true,
        }
    }

    fn add(&mut self, other: Flow) {
        self.load += other.load;
        self.source += other.source;
        self.found |= other.found;
    }

    fn net(&self) -> f64 {
        (self.load - self.source).max(0.0)
    }

    fn magnitude(&self) -> f64 {
        (self.load - self.source).abs()
    }
}

fn is_dc_wire(wire: &Wire) -> bool {
    matches!(wire.polarity, Polarity::Positive | Polarity::Negative)
}

fn is_ac_wire(wire: &Wire) -> bool {
    wire.polarity.is_ac() || wire.polarity == Polarity::Ground
}

pub struct CurrentEstimator<'t, 'a> {
    topology: &'t Topology<'a>,
    system_voltage: f64,
    default_efficiency: f64,
}

impl<'t, 'a> CurrentEstimator<'t, 'a> {
    pub fn new(topology: &'t Topology<'a>, system_voltage: f64) -> Self {
        let system_voltage = if system_voltage.is_finite() && system_voltage > 0.0 {
            system_voltage
        } else {
            tracing::debug!(
                "System voltage {} unusable, using {} V",
                system_voltage,
                DEFAULT_SYSTEM_VOLTAGE
            );
            DEFAULT_SYSTEM_VOLTAGE
        };
        Self {
            topology,
            system_voltage,
            default_efficiency: DEFAULT_INVERTER_EFFICIENCY,
        }
    }

    /// Efficiency used for inverters that do not declare their own.
    pub fn with_default_efficiency(mut self, efficiency: f64) -> Self {
        if efficiency.is_finite() && efficiency > 0.0 && efficiency <= 1.0 {
            self.default_efficiency = efficiency;
        }
        self
    }

    pub fn system_voltage(&self) -> f64 {
        self.system_voltage
    }

    pub fn estimate(&self, wire: &Wire) -> CurrentEstimate {
        let count = parallel_count(wire, self.topology.wires());

        // An override is what this physical wire carries.
        if let Some(amps) = wire.current.filter(|c| c.is_finite() && *c >= 0.0) {
            return CurrentEstimate {
                total: amps * count as f64,
                per_wire: amps,
                parallel_count: count,
                basis: CurrentBasis::Override,
            };
        }

        let (total, basis) = self.total_current(wire);
        CurrentEstimate {
            total,
            per_wire: split_current(total, count),
            parallel_count: count,
            basis,
        }
    }

    fn total_current(&self, wire: &Wire) -> (f64, CurrentBasis) {
        let ends = [
            (self.topology.component(&wire.from_component_id), wire.from_terminal.as_str()),
            (self.topology.component(&wire.to_component_id), wire.to_terminal.as_str()),
        ];
        let resolved: Vec<(&'a Component, &str)> =
            ends.iter().filter_map(|(c, t)| c.map(|c| (c, *t))).collect();

        for &(component, terminal) in &resolved {
            let kind = self.kind(component);
            if kind.is_inverter() && self.is_dc_terminal(component, terminal, wire.polarity) {
                return self.inverter_dc_current(component);
            }
        }

        for &(component, _) in &resolved {
            if self.kind(component) == DeviceKind::SolarPanel {
                return (self.solar_current(component), CurrentBasis::SolarPanel);
            }
        }

        for &(component, terminal) in &resolved {
            let kind = self.kind(component);
            if kind.is_charger() && self.is_charger_output(component, terminal, wire.polarity) {
                return (self.charger_amps(component, kind), CurrentBasis::ChargerOutput);
            }
        }

        for &(component, _) in &resolved {
            let kind = self.kind(component);
            if kind.is_load() {
                return (self.load_current(component, kind), CurrentBasis::Load);
            }
        }

        for &(component, _) in &resolved {
            if self.kind(component).is_panel() {
                let mut visited = HashSet::from([component.id.as_str()]);
                return (
                    self.panel_load_current(component, &mut visited),
                    CurrentBasis::Panel,
                );
            }
        }

        if let [(Some(a), _), (Some(b), _)] = ends {
            if let Some(bus) = self.battery_path_bus(a, b) {
                return (self.bus_net_current(bus), CurrentBasis::BusBarNet);
            }

            for (near, far) in [(a, b), (b, a)] {
                if self.kind(near) == DeviceKind::BusBar {
                    let mut visited = HashSet::from([near.id.as_str()]);
                    let flow = self.flow_into(far, self.far_terminal(wire, far), &mut visited);
                    return (flow.magnitude(), CurrentBasis::BusBarBranch);
                }
            }

            for (near, far) in [(a, b), (b, a)] {
                if matches!(self.kind(near), DeviceKind::Protection | DeviceKind::Shunt) {
                    let mut visited = HashSet::from([far.id.as_str()]);
                    let flow = self.flow_beyond(near, &mut visited);
                    if flow.found {
                        return (flow.magnitude(), CurrentBasis::PassThrough);
                    }
                }
            }
        }

        tracing::debug!(
            "No inference branch for wire {}, using {} A",
            wire.id,
            DEFAULT_WIRE_CURRENT
        );
        (DEFAULT_WIRE_CURRENT, CurrentBasis::Default)
    }

    /// Operating voltage used to size a wire: AC-side wires use the AC load
    /// voltage, PV wires the panel Vmp, everything else the system voltage.
    pub fn wire_voltage(&self, wire: &Wire) -> f64 {
        let ends: Vec<(&'a Component, &str)> = [
            (wire.from_component_id.as_str(), wire.from_terminal.as_str()),
            (wire.to_component_id.as_str(), wire.to_terminal.as_str()),
        ]
        .into_iter()
        .filter_map(|(id, t)| self.topology.component(id).map(|c| (c, t)))
        .collect();
        let classes: Vec<PolarityClass> = ends
            .iter()
            .filter_map(|(c, t)| self.topology.terminal_class(&c.id, t))
            .collect();

        let ac_side = ends.iter().any(|(c, _)| {
            matches!(
                self.kind(c),
                DeviceKind::AcLoad | DeviceKind::AcPanel | DeviceKind::ShorePower
            )
        });
        if wire.polarity.is_ac()
            || classes.iter().any(|c| c.is_ac())
            || (wire.polarity == Polarity::Ground && ac_side)
        {
            return ends
                .iter()
                .find(|(c, _)| self.kind(c) == DeviceKind::AcLoad)
                .and_then(|(c, _)| c.declared_voltage())
                .unwrap_or(DEFAULT_AC_VOLTAGE);
        }

        if let Some((panel, _)) = ends.iter().find(|(c, _)| self.kind(c) == DeviceKind::SolarPanel) {
            return self.solar_vmp(panel);
        }
        if classes.iter().any(|c| c.is_pv()) {
            return self.system_voltage * SOLAR_VMP_FACTOR;
        }

        self.system_voltage
    }

    /// Both terminals are data/communication ports.
    pub fn is_data_wire(&self, wire: &Wire) -> bool {
        let from = self.topology.terminal_class(&wire.from_component_id, &wire.from_terminal);
        let to = self.topology.terminal_class(&wire.to_component_id, &wire.to_terminal);
        from == Some(PolarityClass::Data) && to == Some(PolarityClass::Data)
    }

    fn kind(&self, component: &Component) -> DeviceKind {
        DeviceKind::classify(component, self.topology.registry())
    }

    fn far_terminal<'w>(&self, wire: &'w Wire, far: &Component) -> &'w str {
        if wire.to_component_id == far.id {
            &wire.to_terminal
        } else {
            &wire.from_terminal
        }
    }

    /// Unknown terminals fall back to the wire's own polarity.
    fn is_dc_terminal(&self, component: &Component, terminal: &str, polarity: Polarity) -> bool {
        match self.topology.registry().terminal_class(component, terminal) {
            Some(class) => class.is_dc_bus(),
            None => matches!(polarity, Polarity::Positive | Polarity::Negative),
        }
    }

    fn is_charger_output(&self, component: &Component, terminal: &str, polarity: Polarity) -> bool {
        match self.topology.registry().terminal(component, terminal) {
            Some(t) => t.polarity.is_dc_bus() && !t.converter_input,
            None => matches!(polarity, Polarity::Positive | Polarity::Negative),
        }
    }

    fn is_converter_input(&self, component: &Component, terminal: &str) -> bool {
        self.topology
            .registry()
            .terminal(component, terminal)
            .is_some_and(|t| t.converter_input)
    }

    // -- device figures ----------------------------------------------------

    /// Inverter efficiency as a fraction. Percent values (90) are accepted.
    pub fn efficiency(&self, inverter: &Component) -> f64 {
        match inverter.properties.efficiency {
            Some(e) if e.is_finite() && e > 0.0 => {
                let fraction = if e > 1.0 { e / 100.0 } else { e };
                if fraction <= 1.0 {
                    fraction
                } else {
                    self.default_efficiency
                }
            }
            _ => self.default_efficiency,
        }
    }

    /// DC input current of an inverter-class device.
    pub fn inverter_dc_current(&self, inverter: &Component) -> (f64, CurrentBasis) {
        let ac_watts = self.discover_ac_watts(inverter);
        if ac_watts > 0.0 {
            let amps = ac_watts / self.efficiency(inverter) / self.system_voltage;
            return (amps, CurrentBasis::InverterDcInput);
        }

        let rated = inverter
            .declared_watts()
            .filter(|w| *w > 0.0)
            .unwrap_or_else(|| default_inverter_watts(inverter));
        tracing::debug!(
            "No AC load found behind inverter {}, assuming {}% of {} W",
            inverter.id,
            INVERTER_UTILIZATION * 100.0,
            rated
        );
        (
            rated * INVERTER_UTILIZATION / self.system_voltage,
            CurrentBasis::InverterRated,
        )
    }

    /// AC wattage reachable from the inverter's AC outputs, through AC panels.
    /// Each load counts once no matter how many conductors reach it.
    pub fn discover_ac_watts(&self, inverter: &Component) -> f64 {
        let mut visited = HashSet::from([inverter.id.as_str()]);
        let mut watts = 0.0;

        for wire in self.topology.wires_at(&inverter.id) {
            if !is_ac_wire(wire) {
                continue;
            }
            let Some(terminal) = wire.terminal_at(&inverter.id) else {
                continue;
            };
            if self.topology.registry().terminal_class(inverter, terminal) != Some(PolarityClass::AcOut) {
                continue;
            }
            if let Some((other, _)) = wire.other_end(&inverter.id) {
                watts += self.ac_watts_beyond(other, &mut visited);
            }
        }
        watts
    }

    fn ac_watts_beyond<'v>(&self, id: &str, visited: &mut HashSet<&'v str>) -> f64
    where
        'a: 'v,
    {
        let Some(component) = self.topology.component(id) else {
            return 0.0;
        };
        if !visited.insert(component.id.as_str()) {
            return 0.0;
        }

        match self.kind(component) {
            DeviceKind::AcLoad => component.declared_watts().unwrap_or(0.0),
            DeviceKind::AcPanel => {
                let mut watts = 0.0;
                for wire in self.topology.wires_at(&component.id) {
                    if !is_ac_wire(wire) {
                        continue;
                    }
                    if let Some((other, _)) = wire.other_end(&component.id) {
                        if visited.contains(other) {
                            tracing::debug!("AC walk already visited {}", other);
                            continue;
                        }
                        watts += self.ac_watts_beyond(other, visited);
                    }
                }
                watts
            }
            _ => 0.0,
        }
    }

    /// Maximum-power voltage of a solar panel. A declared `vmp` wins; a
    /// declared voltage counts only when clearly above the system voltage.
    pub fn solar_vmp(&self, panel: &Component) -> f64 {
        if let Some(vmp) = panel.properties.vmp.filter(|v| v.is_finite() && *v > 0.0) {
            return vmp;
        }
        match panel.declared_voltage() {
            Some(v) if v > self.system_voltage * (1.0 + SOLAR_VOLTAGE_MISTAKE_BAND) => v,
            _ => self.system_voltage * SOLAR_VMP_FACTOR,
        }
    }

    pub fn solar_current(&self, panel: &Component) -> f64 {
        let watts = panel.declared_watts().unwrap_or(DEFAULT_SOLAR_PANEL_WATTS);
        watts / self.solar_vmp(panel)
    }

    fn charger_amps(&self, charger: &Component, kind: DeviceKind) -> f64 {
        charger
            .declared_amps()
            .filter(|a| *a > 0.0)
            .unwrap_or_else(|| default_charger_amps(kind))
    }

    /// Load draw: watts over the load's own voltage, else its amps, else 10 A.
    pub fn load_current(&self, load: &Component, kind: DeviceKind) -> f64 {
        let fallback_voltage = if kind == DeviceKind::AcLoad {
            DEFAULT_AC_VOLTAGE
        } else {
            self.system_voltage
        };
        let voltage = load.declared_voltage().unwrap_or(fallback_voltage);

        if let Some(watts) = load.declared_watts() {
            return watts / voltage;
        }
        if let Some(amps) = load.declared_amps() {
            return amps;
        }
        tracing::debug!("Load {} declares no watts or amps, using {} A", load.id, DEFAULT_LOAD_AMPS);
        DEFAULT_LOAD_AMPS
    }

    /// Sum of loads fed through a panel's positive (DC) or hot (AC) outputs.
    fn panel_load_current<'v>(&self, panel: &Component, visited: &mut HashSet<&'v str>) -> f64
    where
        'a: 'v,
    {
        let ac = self.kind(panel) == DeviceKind::AcPanel;
        let mut total = 0.0;

        for wire in self.topology.wires_at(&panel.id) {
            let feeds = if ac {
                wire.polarity == Polarity::Hot
            } else {
                wire.polarity == Polarity::Positive
            };
            if !feeds {
                continue;
            }
            let Some((other, terminal)) = wire.other_end(&panel.id) else {
                continue;
            };
            let Some(component) = self.topology.component(other) else {
                continue;
            };
            if !visited.insert(component.id.as_str()) {
                continue;
            }

            total += match self.kind(component) {
                DeviceKind::DcLoad if !ac => self.load_current(component, DeviceKind::DcLoad),
                DeviceKind::AcLoad if ac => self.load_current(component, DeviceKind::AcLoad),
                DeviceKind::DcPanel if !ac => self.panel_load_current(component, visited),
                DeviceKind::AcPanel if ac => self.panel_load_current(component, visited),
                kind if kind.is_inverter()
                    && !ac
                    && self.is_dc_terminal(component, terminal, wire.polarity) =>
                {
                    self.inverter_dc_current(component).0
                }
                _ => 0.0,
            };
        }
        total
    }

    // -- bus bar balance ---------------------------------------------------

    /// Bus bar the wire feeds from a battery, if the wire lies on that path.
    /// Either end may reach its side through fuses, breakers, switches or a
    /// shunt.
    fn battery_path_bus(&self, a: &'a Component, b: &'a Component) -> Option<&'a Component> {
        for (battery_side, bus_side) in [(a, b), (b, a)] {
            let mut seen = HashSet::from([bus_side.id.as_str()]);
            if self
                .find_through_protection(battery_side, DeviceKind::Battery, &mut seen)
                .is_none()
            {
                continue;
            }
            let mut seen = HashSet::from([battery_side.id.as_str()]);
            if let Some(bus) = self.find_through_protection(bus_side, DeviceKind::BusBar, &mut seen) {
                return Some(bus);
            }
        }
        None
    }

    fn find_through_protection(
        &self,
        start: &'a Component,
        target: DeviceKind,
        visited: &mut HashSet<&'a str>,
    ) -> Option<&'a Component> {
        if !visited.insert(start.id.as_str()) {
            return None;
        }
        let kind = self.kind(start);
        if kind == target {
            return Some(start);
        }
        if !matches!(kind, DeviceKind::Protection | DeviceKind::Shunt) {
            return None;
        }

        for wire in self.topology.wires_at(&start.id) {
            if !is_dc_wire(wire) {
                continue;
            }
            let Some(next) = wire
                .other_end(&start.id)
                .and_then(|(id, _)| self.topology.component(id))
            else {
                continue;
            };
            if let Some(found) = self.find_through_protection(next, target, visited) {
                return Some(found);
            }
        }
        None
    }

    /// Loads minus sources on a bus bar, floored at zero.
    fn bus_net_current(&self, bus: &'a Component) -> f64 {
        let mut visited = HashSet::new();
        let flow = self.flow_beyond(bus, &mut visited);
        tracing::debug!(
            "Bus bar {} balance: {:.2} A load, {:.2} A source",
            bus.id,
            flow.load,
            flow.source
        );
        flow.net()
    }

    /// Everything reachable over DC wires from `node`, excluding `visited`.
    fn flow_beyond<'v>(&self, node: &Component, visited: &mut HashSet<&'v str>) -> Flow
    where
        'a: 'v,
    {
        if let Some(component) = self.topology.component(&node.id) {
            visited.insert(component.id.as_str());
        }
        let mut flow = Flow::default();

        for wire in self.topology.wires_at(&node.id) {
            if !is_dc_wire(wire) {
                continue;
            }
            let Some((other, terminal)) = wire.other_end(&node.id) else {
                continue;
            };
            let Some(component) = self.topology.component(other) else {
                continue;
            };
            if visited.contains(component.id.as_str()) {
                continue;
            }
            flow.add(self.flow_into(component, terminal, visited));
        }
        flow
    }

    /// Contribution of `component`, entered through `terminal`.
    fn flow_into<'v>(
        &self,
        component: &'a Component,
        terminal: &str,
        visited: &mut HashSet<&'v str>,
    ) -> Flow
    where
        'a: 'v,
    {
        if !visited.insert(component.id.as_str()) {
            tracing::debug!("DC walk already visited {}", component.id);
            return Flow::default();
        }

        match self.kind(component) {
            kind if kind.is_inverter() => Flow::load(self.inverter_dc_current(component).0),
            DeviceKind::DcLoad => Flow::load(self.load_current(component, DeviceKind::DcLoad)),
            DeviceKind::DcPanel => Flow::load(self.panel_load_current(component, visited)),
            kind if kind.is_charger() => {
                if self.is_converter_input(component, terminal) {
                    Flow::load(self.charger_amps(component, kind))
                } else if self.is_charger_output(component, terminal, Polarity::Positive) {
                    Flow::source(self.charger_amps(component, kind))
                } else {
                    Flow::default()
                }
            }
            DeviceKind::SolarPanel => Flow::source(self.solar_current(component)),
            DeviceKind::BusBar | DeviceKind::Protection | DeviceKind::Shunt => {
                self.flow_beyond(component, visited)
            }
            // The battery covers the deficit; nothing to add.
            DeviceKind::Battery => Flow {
                found: true,
                ..Flow::default()
            },
            _ => Flow::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DeviceRegistry;

    fn estimate(components: &[Component], wires: &[Wire], wire_id: &str) -> CurrentEstimate {
        let topology = Topology::new(components, wires, DeviceRegistry::builtin());
        let estimator = CurrentEstimator::new(&topology, 12.0);
        let wire = wires.iter().find(|w| w.id == wire_id).unwrap();
        estimator.estimate(wire)
    }

    fn pos(id: &str, from: (&str, &str), to: (&str, &str)) -> Wire {
        Wire::new(id, from, to, Polarity::Positive)
    }

    #[test]
    fn test_override_is_per_wire() {
        let components = vec![
            Component::new("bat", "battery").with_voltage(12.0),
            Component::new("inv", "inverter"),
        ];
        let wires = vec![
            pos("a", ("bat", "positive"), ("inv", "dc-positive")).with_current(80.0),
            pos("b", ("bat", "positive"), ("inv", "dc-positive")),
        ];

        let result = estimate(&components, &wires, "a");
        assert_eq!(result.basis, CurrentBasis::Override);
        assert_eq!(result.per_wire, 80.0);
        assert_eq!(result.total, 160.0);
    }

    #[test]
    fn test_inverter_ac_discovery_through_panel() {
        let components = vec![
            Component::new("bat", "battery").with_voltage(12.0),
            Component::new("inv", "inverter").with_efficiency(90.0),
            Component::new("acp", "ac-panel"),
            Component::new("micro", "ac-load").with_watts(1000.0),
            Component::new("kettle", "ac-load").with_watts(800.0),
        ];
        let hot = |id: &str, from, to| Wire::new(id, from, to, Polarity::Hot);
        let wires = vec![
            pos("dc", ("bat", "positive"), ("inv", "dc-positive")),
            hot("feed", ("inv", "ac-out-hot"), ("acp", "main-hot")),
            Wire::new("feed-n", ("inv", "ac-out-neutral"), ("acp", "main-neutral"), Polarity::Neutral),
            hot("l1", ("acp", "load-1"), ("micro", "hot")),
            hot("l2", ("acp", "load-2"), ("kettle", "hot")),
            Wire::new("l2-n", ("acp", "load-neutral"), ("kettle", "neutral"), Polarity::Neutral),
        ];

        let result = estimate(&components, &wires, "dc");
        assert_eq!(result.basis, CurrentBasis::InverterDcInput);
        assert!((result.total - 1800.0 / 0.9 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverter_rated_fallback() {
        let components = vec![
            Component::new("bat", "battery"),
            Component::new("inv", "multiplus"),
        ];
        let wires = vec![pos("dc", ("bat", "positive"), ("inv", "dc-positive"))];

        let result = estimate(&components, &wires, "dc");
        assert_eq!(result.basis, CurrentBasis::InverterRated);
        assert!((result.total - DEFAULT_MULTIPLUS_WATTS * 0.8 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_solar_vmp_heuristics() {
        let components = vec![
            Component::new("pv1", "solar-panel").with_watts(180.0),
            Component::new("pv2", "solar-panel").with_watts(200.0).with_voltage(12.0),
            Component::new("pv3", "solar-panel").with_watts(200.0).with_voltage(40.0),
            Component::new("pv4", "solar-panel").with_watts(200.0).with_vmp(20.0),
            Component::new("mppt", "mppt"),
        ];
        let topology = Topology::new(&components, &[], DeviceRegistry::builtin());
        let estimator = CurrentEstimator::new(&topology, 12.0);

        assert_eq!(estimator.solar_current(&components[0]), 180.0 / 18.0);
        assert_eq!(estimator.solar_vmp(&components[1]), 18.0);
        assert_eq!(estimator.solar_vmp(&components[2]), 40.0);
        assert_eq!(estimator.solar_vmp(&components[3]), 20.0);
    }

    #[test]
    fn test_charger_output_and_default() {
        let components = vec![
            Component::new("mppt", "mppt").with_amps(50.0),
            Component::new("orion", "orion-dc-dc"),
            Component::new("bus", "busbar-positive"),
            Component::new("start", "battery"),
        ];
        let wires = vec![
            pos("m", ("mppt", "batt-positive"), ("bus", "bus-1")),
            pos("o", ("orion", "output-positive"), ("bus", "bus-2")),
            pos("in", ("start", "positive"), ("orion", "input-positive")),
        ];

        assert_eq!(estimate(&components, &wires, "m").total, 50.0);
        assert_eq!(estimate(&components, &wires, "o").total, DEFAULT_ORION_AMPS);
        // Converter input is not the charger's output; nothing else applies.
        assert_eq!(estimate(&components, &wires, "in").basis, CurrentBasis::Default);
    }

    #[test]
    fn test_load_current() {
        let components = vec![
            Component::new("bat", "battery"),
            Component::new("fridge", "dc-load").with_watts(60.0),
            Component::new("pump", "dc-load").with_amps(7.0),
            Component::new("mystery", "dc-load"),
            Component::new("tv", "ac-load").with_watts(240.0),
        ];
        let topology = Topology::new(&components, &[], DeviceRegistry::builtin());
        let estimator = CurrentEstimator::new(&topology, 12.0);

        assert_eq!(estimator.load_current(&components[1], DeviceKind::DcLoad), 5.0);
        assert_eq!(estimator.load_current(&components[2], DeviceKind::DcLoad), 7.0);
        assert_eq!(estimator.load_current(&components[3], DeviceKind::DcLoad), DEFAULT_LOAD_AMPS);
        assert_eq!(estimator.load_current(&components[4], DeviceKind::AcLoad), 2.0);
    }

    #[test]
    fn test_dc_panel_sums_loads() {
        let components = vec![
            Component::new("bus", "busbar-positive"),
            Component::new("dcp", "dc-panel"),
            Component::new("lights", "dc-load").with_watts(36.0),
            Component::new("fan", "dc-load").with_amps(2.0),
        ];
        let wires = vec![
            pos("feed", ("bus", "bus-1"), ("dcp", "main-positive")),
            pos("l1", ("dcp", "load-1"), ("lights", "positive")),
            pos("l2", ("dcp", "load-2"), ("fan", "positive")),
            Wire::new("l2n", ("dcp", "load-negative"), ("fan", "negative"), Polarity::Negative),
        ];

        let result = estimate(&components, &wires, "feed");
        assert_eq!(result.basis, CurrentBasis::Panel);
        assert!((result.total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_net_current_through_fuse() {
        let components = vec![
            Component::new("bat", "battery").with_voltage(12.0),
            Component::new("fuse", "fuse"),
            Component::new("bus", "busbar-positive"),
            Component::new("mppt", "mppt").with_amps(10.0),
            Component::new("heater", "dc-load").with_amps(25.0),
        ];
        let wires = vec![
            pos("b-f", ("bat", "positive"), ("fuse", "in")),
            pos("f-bus", ("fuse", "out"), ("bus", "bus-1")),
            pos("m", ("mppt", "batt-positive"), ("bus", "bus-2")),
            pos("h", ("bus", "bus-3"), ("heater", "positive")),
        ];

        for id in ["b-f", "f-bus"] {
            let result = estimate(&components, &wires, id);
            assert_eq!(result.basis, CurrentBasis::BusBarNet, "wire {}", id);
            assert!((result.total - 15.0).abs() < 1e-9, "wire {}", id);
        }
    }

    #[test]
    fn test_ring_bus_terminates() {
        let components = vec![
            Component::new("bat", "battery"),
            Component::new("b1", "busbar-positive"),
            Component::new("b2", "busbar-positive"),
            Component::new("b3", "busbar-positive"),
            Component::new("load", "dc-load").with_amps(12.0),
        ];
        let wires = vec![
            pos("main", ("bat", "positive"), ("b1", "bus-1")),
            pos("r1", ("b1", "bus-2"), ("b2", "bus-1")),
            pos("r2", ("b2", "bus-2"), ("b3", "bus-1")),
            pos("r3", ("b3", "bus-2"), ("b1", "bus-3")),
            pos("l", ("b3", "bus-3"), ("load", "positive")),
        ];

        let result = estimate(&components, &wires, "main");
        assert_eq!(result.basis, CurrentBasis::BusBarNet);
        assert_eq!(result.total, 12.0);
    }

    #[test]
    fn test_default_when_nothing_applies() {
        let components = vec![
            Component::new("bat", "battery"),
            Component::new("sw", "battery-switch"),
        ];
        let wires = vec![pos("w", ("bat", "positive"), ("sw", "in"))];

        let result = estimate(&components, &wires, "w");
        assert_eq!(result.basis, CurrentBasis::Default);
        assert_eq!(result.total, DEFAULT_WIRE_CURRENT);
    }

    #[test]
    fn test_wire_voltage() {
        let components = vec![
            Component::new("inv", "inverter"),
            Component::new("tv", "ac-load").with_voltage(230.0),
            Component::new("pv", "solar-panel").with_vmp(21.0),
            Component::new("mppt", "mppt"),
            Component::new("cerbo", "cerbo-gx"),
        ];
        let wires = vec![
            Wire::new("ac", ("inv", "ac-out-hot"), ("tv", "hot"), Polarity::Hot),
            pos("pv", ("pv", "positive"), ("mppt", "pv-positive")),
            pos("data", ("mppt", "ve-direct"), ("cerbo", "ve-direct-1")),
        ];
        let topology = Topology::new(&components, &wires, DeviceRegistry::builtin());
        let estimator = CurrentEstimator::new(&topology, 24.0);

        assert_eq!(estimator.wire_voltage(&wires[0]), 230.0);
        assert_eq!(estimator.wire_voltage(&wires[1]), 21.0);
        assert!(estimator.is_data_wire(&wires[2]));
        assert!(!estimator.is_data_wire(&wires[1]));
    }
}
