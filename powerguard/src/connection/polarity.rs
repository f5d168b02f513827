//! Polarity rules: terminal class against terminal class, and an existing
//! wire's polarity against both terminals.

use super::{ConnectionContext, ConnectionRule, RuleFailure};
use crate::model::Polarity;
use crate::registry::PolarityClass;

/// Terminal classes must pair up: positive↔positive, negative↔negative,
/// ground↔ground, PV+↔PV+, PV-↔PV-, data↔data and AC in↔out. Series links
/// between chainable devices of one type are the only positive↔negative
/// exception.
pub struct TerminalPolarityRule;

impl ConnectionRule for TerminalPolarityRule {
    fn id(&self) -> &str {
        "terminal_polarity"
    }

    fn name(&self) -> &str {
        "Terminal Polarity Match"
    }

    fn check(&self, ctx: &ConnectionContext<'_>) -> Option<RuleFailure> {
        use PolarityClass::*;

        let (a, b) = ctx.classes()?;
        let from = ctx.from.label();
        let to = ctx.to.label();

        match (a, b) {
            (AcIn, AcOut) | (AcOut, AcIn) => None,
            (AcIn, AcIn) => Some(RuleFailure::error(format!(
                "Cannot connect AC input {} to AC input {}: one side must be an AC output",
                from, to
            ))),
            (AcOut, AcOut) => Some(RuleFailure::error(format!(
                "Cannot connect AC output {} to AC output {}: two sources would back-feed each other",
                from, to
            ))),
            _ if a == b => None,
            _ if (a.is_ac() && b.is_dc()) || (a.is_dc() && b.is_ac()) => Some(RuleFailure::error(
                format!("Cannot mix AC and DC: {} is {} but {} is {}", from, a, to, b),
            )),
            _ if ctx.is_series_link() => None,
            (Positive, Negative) | (Negative, Positive) | (PvPositive, PvNegative) | (PvNegative, PvPositive) => {
                Some(RuleFailure::error(format!(
                    "Polarity mismatch: {} ({}) cannot connect to {} ({}); series wiring is only allowed between chainable devices of the same type",
                    from, a, to, b
                )))
            }
            _ => Some(RuleFailure::error(format!(
                "Polarity mismatch: {} ({}) cannot connect to {} ({})",
                from, a, to, b
            ))),
        }
    }
}

/// Wire polarities a terminal class accepts.
fn accepts(class: PolarityClass, polarity: Polarity) -> bool {
    match class {
        PolarityClass::Positive | PolarityClass::PvPositive => polarity == Polarity::Positive,
        PolarityClass::Negative | PolarityClass::PvNegative => polarity == Polarity::Negative,
        PolarityClass::Ground => polarity == Polarity::Ground,
        PolarityClass::AcIn | PolarityClass::AcOut => polarity.is_ac(),
        PolarityClass::Data => true,
    }
}

/// An existing wire's polarity must suit the terminals it lands on. A series
/// link accepts the polarity of either end.
pub struct WirePolarityRule;

impl ConnectionRule for WirePolarityRule {
    fn id(&self) -> &str {
        "wire_polarity"
    }

    fn name(&self) -> &str {
        "Wire Polarity Consistency"
    }

    fn check(&self, ctx: &ConnectionContext<'_>) -> Option<RuleFailure> {
        let polarity = ctx.wire_polarity?;

        if ctx.is_series_link() {
            let (a, b) = ctx.classes()?;
            if accepts(a, polarity) || accepts(b, polarity) {
                return None;
            }
            return Some(RuleFailure::error(format!(
                "Wire polarity {} does not match series link {} ({}) to {} ({})",
                polarity,
                ctx.from.label(),
                a,
                ctx.to.label(),
                b
            )));
        }

        for end in [&ctx.from, &ctx.to] {
            let Some(class) = end.class() else {
                continue;
            };
            if !accepts(class, polarity) {
                return Some(RuleFailure::error(format!(
                    "Wire polarity {} does not match {} terminal {}",
                    polarity,
                    class,
                    end.label()
                )));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionEnd;
    use crate::model::Component;
    use crate::registry::DeviceRegistry;

    fn check<R: ConnectionRule>(
        rule: &R,
        from: (&Component, &str),
        to: (&Component, &str),
        polarity: Option<Polarity>,
    ) -> Option<RuleFailure> {
        let registry = DeviceRegistry::builtin();
        let ctx = ConnectionContext {
            from: ConnectionEnd::resolve(from.0, from.1, registry),
            to: ConnectionEnd::resolve(to.0, to.1, registry),
            wire_polarity: polarity,
        };
        rule.check(&ctx)
    }

    #[test]
    fn test_ac_in_to_out_only() {
        let inverter = Component::new("inv", "inverter");
        let panel = Component::new("acp", "ac-panel");
        let load = Component::new("tv", "ac-load");

        assert!(check(&TerminalPolarityRule, (&inverter, "ac-out-hot"), (&panel, "main-hot"), None).is_none());

        let failure = check(&TerminalPolarityRule, (&panel, "main-hot"), (&load, "hot"), None).unwrap();
        assert!(failure.message.contains("AC input"));
    }

    #[test]
    fn test_ac_dc_mix_rejected() {
        let battery = Component::new("b", "battery");
        let load = Component::new("tv", "ac-load");

        let failure = check(&TerminalPolarityRule, (&battery, "positive"), (&load, "hot"), None).unwrap();
        assert!(failure.message.contains("AC and DC"));
    }

    #[test]
    fn test_pv_to_plain_dc_rejected() {
        let panel = Component::new("pv", "solar-panel");
        let battery = Component::new("b", "battery");

        assert!(check(&TerminalPolarityRule, (&panel, "positive"), (&battery, "positive"), None).is_some());
    }

    #[test]
    fn test_series_panels_allowed() {
        let a = Component::new("pv1", "solar-panel");
        let b = Component::new("pv2", "solar-panel");

        assert!(check(&TerminalPolarityRule, (&a, "positive"), (&b, "negative"), None).is_none());
        assert!(check(&WirePolarityRule, (&a, "positive"), (&b, "negative"), Some(Polarity::Positive)).is_none());
    }

    #[test]
    fn test_wire_polarity_on_ac() {
        let inverter = Component::new("inv", "inverter");
        let load = Component::new("tv", "ac-load");

        assert!(check(&WirePolarityRule, (&inverter, "ac-out-hot"), (&load, "hot"), Some(Polarity::Hot)).is_none());
        assert!(check(&WirePolarityRule, (&inverter, "ac-out-hot"), (&load, "hot"), Some(Polarity::Positive)).is_some());
    }

    #[test]
    fn test_wire_polarity_skipped_without_wire() {
        let battery = Component::new("b", "battery");
        let fuse = Component::new("f", "fuse");

        assert!(check(&WirePolarityRule, (&battery, "positive"), (&fuse, "in"), None).is_none());
    }
}
