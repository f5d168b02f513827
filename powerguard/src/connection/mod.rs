//! Connection Rule Engine
//!
//! Decides whether two component terminals may be joined by a wire. Rules are
//! independent trait objects evaluated in a fixed order; the first failure
//! short-circuits and is returned as the verdict. Accumulating findings across
//! a whole design is the validator's job, not this module's.
//!
//! The engine never fails closed: a device type missing from the registry
//! yields a valid verdict, and an unknown terminal id skips every rule that
//! needs its polarity class.
//!
//! # Usage
//!
//! ```
//! use powerguard::connection::ConnectionRulesEngine;
//! use powerguard::model::Component;
//! use powerguard::registry::DeviceRegistry;
//!
//! let engine = ConnectionRulesEngine::with_default_rules(DeviceRegistry::builtin());
//! let fuse = Component::new("f1", "fuse");
//! let load = Component::new("l1", "dc-load");
//!
//! let verdict = engine.validate_connection(&fuse, "out", &load, "negative");
//! assert!(!verdict.valid);
//! ```

pub mod polarity;
pub mod voltage;

pub use polarity::{TerminalPolarityRule, WirePolarityRule};
pub use voltage::VoltageCompatibilityRule;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analyzer::issues::Severity;
use crate::model::{Component, Polarity, Wire};
use crate::registry::{DeviceDefinition, DeviceRegistry, PolarityClass, TerminalDefinition};

/// One side of a proposed connection, resolved against the registry.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionEnd<'a> {
    pub component: &'a Component,
    pub terminal_id: &'a str,
    pub definition: Option<&'a DeviceDefinition>,
    pub terminal: Option<&'a TerminalDefinition>,
}

impl<'a> ConnectionEnd<'a> {
    fn resolve(component: &'a Component, terminal_id: &'a str, registry: &'a DeviceRegistry) -> Self {
        let definition = registry.lookup(&component.device_type);
        Self {
            component,
            terminal_id,
            definition,
            terminal: definition.and_then(|d| d.terminal(terminal_id)),
        }
    }

    pub fn class(&self) -> Option<PolarityClass> {
        self.terminal.map(|t| t.polarity)
    }

    pub fn chainable(&self) -> bool {
        self.definition.map(|d| d.chainable).unwrap_or(false)
    }

    /// `battery.positive`
    pub fn label(&self) -> String {
        format!("{}.{}", self.component.id, self.terminal_id)
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionContext<'a> {
    pub from: ConnectionEnd<'a>,
    pub to: ConnectionEnd<'a>,
    /// Polarity of an existing wire. `None` for a proposed connection.
    pub wire_polarity: Option<Polarity>,
}

impl<'a> ConnectionContext<'a> {
    /// Both terminals resolved, with their classes.
    pub fn classes(&self) -> Option<(PolarityClass, PolarityClass)> {
        Some((self.from.class()?, self.to.class()?))
    }

    /// A positive-to-negative link between two chainable devices of the
    /// same type (batteries or panels in series).
    pub fn is_series_link(&self) -> bool {
        let Some((a, b)) = self.classes() else {
            return false;
        };
        let opposite = matches!(
            (a, b),
            (PolarityClass::Positive, PolarityClass::Negative)
                | (PolarityClass::Negative, PolarityClass::Positive)
                | (PolarityClass::PvPositive, PolarityClass::PvNegative)
                | (PolarityClass::PvNegative, PolarityClass::PvPositive)
        );
        opposite
            && self.from.component.id != self.to.component.id
            && self.from.component.device_type == self.to.component.device_type
            && self.from.chainable()
            && self.to.chainable()
    }
}

/// Why a rule rejected a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub severity: Severity,
    pub message: String,
}

impl RuleFailure {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// A single, independently pluggable connection rule.
pub trait ConnectionRule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn check(&self, ctx: &ConnectionContext<'_>) -> Option<RuleFailure>;
}

/// Outcome of validating one terminal pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionVerdict {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl ConnectionVerdict {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
            severity: None,
            rule_id: None,
        }
    }

    fn failed(rule_id: &str, failure: RuleFailure) -> Self {
        Self {
            valid: failure.severity != Severity::Error,
            message: Some(failure.message),
            severity: Some(failure.severity),
            rule_id: Some(rule_id.to_string()),
        }
    }
}

pub struct ConnectionRulesEngine<'r> {
    registry: &'r DeviceRegistry,
    rules: Vec<Arc<dyn ConnectionRule>>,
}

impl<'r> ConnectionRulesEngine<'r> {
    pub fn new(registry: &'r DeviceRegistry) -> Self {
        Self {
            registry,
            rules: Vec::new(),
        }
    }

    /// Terminal polarity, wire polarity, then voltage compatibility.
    pub fn with_default_rules(registry: &'r DeviceRegistry) -> Self {
        let mut engine = Self::new(registry);
        engine.add_rule(Arc::new(TerminalPolarityRule));
        engine.add_rule(Arc::new(WirePolarityRule));
        engine.add_rule(Arc::new(VoltageCompatibilityRule::default()));
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn ConnectionRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn ConnectionRule>] {
        &self.rules
    }

    /// Check a proposed connection before a wire exists.
    pub fn validate_connection(
        &self,
        from: &Component,
        from_terminal: &str,
        to: &Component,
        to_terminal: &str,
    ) -> ConnectionVerdict {
        self.evaluate(from, from_terminal, to, to_terminal, None)
    }

    /// Re-check an existing wire. Wires whose endpoints are missing from
    /// `components` are left to the structural checks.
    pub fn validate_wire(&self, wire: &Wire, components: &[Component]) -> ConnectionVerdict {
        let from = components.iter().find(|c| c.id == wire.from_component_id);
        let to = components.iter().find(|c| c.id == wire.to_component_id);
        match (from, to) {
            (Some(from), Some(to)) => {
                self.evaluate(from, &wire.from_terminal, to, &wire.to_terminal, Some(wire.polarity))
            }
            _ => ConnectionVerdict::ok(),
        }
    }

    fn evaluate(
        &self,
        from: &Component,
        from_terminal: &str,
        to: &Component,
        to_terminal: &str,
        wire_polarity: Option<Polarity>,
    ) -> ConnectionVerdict {
        let ctx = ConnectionContext {
            from: ConnectionEnd::resolve(from, from_terminal, self.registry),
            to: ConnectionEnd::resolve(to, to_terminal, self.registry),
            wire_polarity,
        };

        if ctx.from.definition.is_none() || ctx.to.definition.is_none() {
            tracing::debug!(
                "Unknown device type on {} or {}, accepting connection",
                ctx.from.label(),
                ctx.to.label()
            );
            return ConnectionVerdict::ok();
        }

        for rule in &self.rules {
            if let Some(failure) = rule.check(&ctx) {
                return ConnectionVerdict::failed(rule.id(), failure);
            }
        }
        ConnectionVerdict::ok()
    }
}
