//! Example: adding a project-specific connection rule to the engine.
//! Run with: cargo run --example custom_rules

use powerguard::connection::{ConnectionContext, ConnectionRule, ConnectionRulesEngine, RuleFailure};
use powerguard::model::Component;
use powerguard::registry::DeviceRegistry;
use std::sync::Arc;

/// Shore power must land on a breaker before anything else.
struct ShorePowerBreaker;

impl ConnectionRule for ShorePowerBreaker {
    fn id(&self) -> &str {
        "shore_power_breaker"
    }

    fn name(&self) -> &str {
        "Shore Power Through Breaker"
    }

    fn check(&self, ctx: &ConnectionContext<'_>) -> Option<RuleFailure> {
        let (shore, other) = if ctx.from.component.device_type == "shore-power" {
            (&ctx.from, &ctx.to)
        } else if ctx.to.component.device_type == "shore-power" {
            (&ctx.to, &ctx.from)
        } else {
            return None;
        };
        if other.component.device_type == "ac-panel" {
            return None;
        }
        Some(RuleFailure::warning(format!(
            "{} feeds {} directly; route shore power through an AC panel breaker",
            shore.label(),
            other.label()
        )))
    }
}

fn main() {
    let mut engine = ConnectionRulesEngine::with_default_rules(DeviceRegistry::builtin());
    engine.add_rule(Arc::new(ShorePowerBreaker));

    let shore = Component::new("shore", "shore-power");
    let panel = Component::new("acp", "ac-panel");
    let charger = Component::new("charger", "blue-smart-charger");

    for (to, terminal) in [(&panel, "main-hot"), (&charger, "ac-in")] {
        let verdict = engine.validate_connection(&shore, "hot", to, terminal);
        match verdict.message {
            Some(message) => println!("[{:?}] {}", verdict.severity, message),
            None => println!("shore.hot -> {}.{}: ok", to.id, terminal),
        }
    }
}
