//! Bounded, restartable action sequences
//!
//! A repeating pattern with an explicit cursor. Reading a prefix never
//! moves the cursor; only [`ActionCycle::advance`] does.

use serde::{Deserialize, Serialize};
use crate::action::{actions_to_str, str_to_actions, Action, ActionError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCycle {
    pattern: Vec<Action>,
    position: usize,
}

impl ActionCycle {
    /// An empty pattern yields `A` forever.
    pub fn new(pattern: Vec<Action>) -> Self {
        Self { pattern, position: 0 }
    }

    pub fn parse(pattern: &str) -> Result<Self, ActionError> {
        Ok(Self::new(str_to_actions(pattern)?))
    }

    pub fn pattern(&self) -> &[Action] {
        &self.pattern
    }

    /// The next action without consuming it.
    pub fn peek(&self) -> Action {
        if self.pattern.is_empty() {
            return Action::A;
        }
        self.pattern[self.position % self.pattern.len()]
    }

    /// Return the next action and move the cursor.
    pub fn advance(&mut self) -> Action {
        let action = self.peek();
        if !self.pattern.is_empty() {
            self.position = (self.position + 1) % self.pattern.len();
        }
        action
    }

    /// The next `n` actions from the current cursor, without moving it.
    pub fn prefix(&self, n: usize) -> Vec<Action> {
        let mut probe = self.clone();
        (0..n).map(|_| probe.advance()).collect()
    }

    pub fn restart(&mut self) {
        self.position = 0;
    }
}

impl core::fmt::Display for ActionCycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", actions_to_str(&self.pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::{A, B};

    #[test]
    fn test_advance_cycles() {
        let mut cycle = ActionCycle::parse("AAB").unwrap();
        let played: Vec<_> = (0..7).map(|_| cycle.advance()).collect();
        assert_eq!(played, vec![A, A, B, A, A, B, A]);
    }

    #[test]
    fn test_prefix_does_not_advance() {
        let mut cycle = ActionCycle::parse("AB").unwrap();
        cycle.advance();
        let before = cycle.clone();
        assert_eq!(cycle.prefix(4), vec![B, A, B, A]);
        assert_eq!(cycle, before);
        assert_eq!(cycle.peek(), B);
    }

    #[test]
    fn test_restart() {
        let mut cycle = ActionCycle::parse("BA").unwrap();
        cycle.advance();
        cycle.restart();
        assert_eq!(cycle.advance(), B);
    }

    #[test]
    fn test_empty_pattern() {
        let mut cycle = ActionCycle::new(vec![]);
        assert_eq!(cycle.advance(), A);
        assert_eq!(cycle.prefix(3), vec![A, A, A]);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(ActionCycle::parse("ABX").is_err());
        assert_eq!(ActionCycle::parse("ABB").unwrap().to_string(), "ABB");
    }
}
