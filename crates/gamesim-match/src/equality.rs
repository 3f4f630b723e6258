//! Structural equality between strategies
//!
//! Strategies are compared by name and by the attributes they expose.
//! Attributes may point at other strategies, possibly forming cycles, so the
//! comparison tracks every pair it has entered; revisiting a pair counts as
//! equal so far and ends that branch.

use std::collections::HashSet;
use crate::action::Action;
use crate::strategy::Strategy;

/// How many actions of an open-ended sequence are compared.
pub const SEQUENCE_PREFIX: usize = 200;

/// One comparable attribute of a strategy.
pub enum Attribute<'a> {
    Value(serde_json::Value),
    /// A finite prefix of a sequence, see [`SEQUENCE_PREFIX`]
    Sequence(Vec<Action>),
    Strategy(&'a dyn Strategy),
}

impl<'a> Attribute<'a> {
    pub fn value(value: impl serde::Serialize) -> Self {
        Attribute::Value(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
    }
}

pub fn structurally_equal(a: &dyn Strategy, b: &dyn Strategy) -> bool {
    let mut visited = HashSet::new();
    compare(a, b, &mut visited)
}

fn address(strategy: &dyn Strategy) -> usize {
    strategy as *const dyn Strategy as *const () as usize
}

fn compare(a: &dyn Strategy, b: &dyn Strategy, visited: &mut HashSet<(usize, usize)>) -> bool {
    if !visited.insert((address(a), address(b))) {
        return true;
    }
    if a.name() != b.name() {
        return false;
    }

    let mut left = a.attributes();
    let mut right = b.attributes();
    if left.len() != right.len() {
        return false;
    }
    left.sort_by_key(|(key, _)| *key);
    right.sort_by_key(|(key, _)| *key);

    left.iter().zip(right.iter()).all(|((ka, va), (kb, vb))| {
        ka == kb
            && match (va, vb) {
                (Attribute::Value(x), Attribute::Value(y)) => x == y,
                (Attribute::Sequence(x), Attribute::Sequence(y)) => x == y,
                (Attribute::Strategy(x), Attribute::Strategy(y)) => compare(*x, *y, visited),
                _ => false,
            }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;
    use crate::history::History;
    use crate::strategies::StrategyConfig;
    use crate::strategy::StrategyError;

    struct Partner {
        mood: u8,
        partner: OnceLock<&'static dyn Strategy>,
    }

    impl Strategy for Partner {
        fn name(&self) -> String {
            "Partner".to_string()
        }
        fn strategy(&mut self, _own: &History, _opponent: &History) -> Result<Action, StrategyError> {
            Ok(Action::A)
        }
        fn reset(&mut self) {}
        fn clone_fresh(&self) -> Box<dyn Strategy> {
            Box::new(Partner { mood: self.mood, partner: OnceLock::new() })
        }
        fn attributes(&self) -> Vec<(&'static str, Attribute<'_>)> {
            let mut attributes = vec![("mood", Attribute::value(self.mood))];
            if let Some(partner) = self.partner.get() {
                attributes.push(("partner", Attribute::Strategy(*partner)));
            }
            attributes
        }
    }

    fn leak(mood: u8) -> &'static Partner {
        Box::leak(Box::new(Partner { mood, partner: OnceLock::new() }))
    }

    #[test]
    fn test_mutually_referencing_strategies_terminate() {
        let a = leak(1);
        let b = leak(1);
        a.partner.set(b).ok();
        b.partner.set(a).ok();

        assert!(structurally_equal(a, b));
        assert!(structurally_equal(a, a));
    }

    #[test]
    fn test_cycle_with_differing_member() {
        let a = leak(1);
        let b = leak(2);
        let c = leak(1);
        let d = leak(1);
        a.partner.set(b).ok();
        b.partner.set(a).ok();
        c.partner.set(d).ok();
        d.partner.set(c).ok();

        // a -> b(mood 2) differs from c -> d(mood 1)
        assert!(!structurally_equal(a, c));
    }

    #[test]
    fn test_builtin_parameters_compared() {
        let tft = StrategyConfig::TitForTat { forgiveness: 0, retaliation_delay: 0 }.build();
        let same = tft.clone_fresh();
        let forgiving = StrategyConfig::TitForTat { forgiveness: 10, retaliation_delay: 0 }.build();

        assert!(structurally_equal(tft.as_ref(), same.as_ref()));
        assert!(!structurally_equal(tft.as_ref(), forgiving.as_ref()));
    }

    #[test]
    fn test_sequences_compared_by_prefix() {
        let c1 = StrategyConfig::Cycler { pattern: "AAB".to_string() }.build();
        let c2 = StrategyConfig::Cycler { pattern: "AAB".to_string() }.build();
        let c3 = StrategyConfig::Cycler { pattern: "ABA".to_string() }.build();
        assert!(structurally_equal(c1.as_ref(), c2.as_ref()));
        assert!(!structurally_equal(c1.as_ref(), c3.as_ref()));
    }

    #[test]
    fn test_different_names_differ() {
        let c = StrategyConfig::Cooperator.build();
        let d = StrategyConfig::Defector.build();
        assert!(!structurally_equal(c.as_ref(), d.as_ref()));
    }
}
