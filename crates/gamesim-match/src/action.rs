//! The two-valued action alphabet

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A move in a two-action game.
///
/// `A` coerces to `true` and `B` to `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    A,
    B,
}

/// Errors raised while decoding actions
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action character {0:?}, expected 'A' or 'B'")]
    UnknownCharacter(char),
}

impl Action {
    /// Returns the opposite action.
    pub fn flip(self) -> Self {
        match self {
            Action::A => Action::B,
            Action::B => Action::A,
        }
    }

    /// Single-character encoding used in persisted histories.
    pub fn to_char(self) -> char {
        match self {
            Action::A => 'A',
            Action::B => 'B',
        }
    }

    /// Decode a single character. Anything but `'A'` or `'B'` is rejected.
    pub fn from_char(character: char) -> Result<Self, ActionError> {
        match character {
            'A' => Ok(Action::A),
            'B' => Ok(Action::B),
            other => Err(ActionError::UnknownCharacter(other)),
        }
    }
}

impl From<Action> for bool {
    fn from(action: Action) -> bool {
        action == Action::A
    }
}

impl From<bool> for Action {
    fn from(value: bool) -> Self {
        if value {
            Action::A
        } else {
            Action::B
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Parse a string like `"AABB"` into actions.
pub fn str_to_actions(actions: &str) -> Result<Vec<Action>, ActionError> {
    actions.chars().map(Action::from_char).collect()
}

/// Encode actions as a string of `'A'`s and `'B'`s: `[B, B, A]` becomes `"BBA"`.
pub fn actions_to_str<'a>(actions: impl IntoIterator<Item = &'a Action>) -> String {
    actions.into_iter().map(|a| a.to_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(Action::A.flip(), Action::B);
        assert_eq!(Action::B.flip(), Action::A);
        assert_eq!(Action::A.flip().flip(), Action::A);
    }

    #[test]
    fn test_bool_coercion() {
        assert!(bool::from(Action::A));
        assert!(!bool::from(Action::B));
        assert_eq!(Action::from(true), Action::A);
        assert_eq!(Action::from(false), Action::B);
    }

    #[test]
    fn test_from_char() {
        assert_eq!(Action::from_char('A'), Ok(Action::A));
        assert_eq!(Action::from_char('B'), Ok(Action::B));
        assert_eq!(Action::from_char('C'), Err(ActionError::UnknownCharacter('C')));
        assert_eq!(Action::from_char('a'), Err(ActionError::UnknownCharacter('a')));
    }

    #[test]
    fn test_string_helpers() {
        assert_eq!(str_to_actions("ABBA"), Ok(vec![Action::A, Action::B, Action::B, Action::A]));
        assert_eq!(str_to_actions(""), Ok(vec![]));
        assert!(str_to_actions("AXB").is_err());
        assert_eq!(actions_to_str(&[Action::B, Action::B, Action::A]), "BBA");
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::A.to_string(), "A");
        assert_eq!(format!("{}{}", Action::B, Action::A), "BA");
    }
}
