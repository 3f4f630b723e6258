//! Payoff matrix for two-action games

use serde::{Deserialize, Serialize};
use crate::action::Action;

/// Scores an ordered pair of actions.
///
/// Built from the four classic scalars: reward `R` for mutual `A`,
/// sucker `S` and temptation `T` for mixed play, punishment `P` for mutual `B`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoffMatrix {
    r: f64,
    s: f64,
    t: f64,
    p: f64,
}

impl PayoffMatrix {
    pub fn new(r: f64, s: f64, t: f64, p: f64) -> Self {
        Self { r, s, t, p }
    }

    /// Returns `(score_a, score_b)` for the given pair of actions
    pub fn score(&self, pair: (Action, Action)) -> (f64, f64) {
        match pair {
            (Action::A, Action::A) => (self.r, self.r),
            (Action::B, Action::B) => (self.p, self.p),
            (Action::A, Action::B) => (self.s, self.t),
            (Action::B, Action::A) => (self.t, self.s),
        }
    }

    /// The matrix values in Press and Dyson notation: `(R, P, S, T)`.
    pub fn rpst(&self) -> (f64, f64, f64, f64) {
        (self.r, self.p, self.s, self.t)
    }

    pub fn is_finite(&self) -> bool {
        [self.r, self.s, self.t, self.p].iter().all(|v| v.is_finite())
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        Self::new(3.0, 0.0, 5.0, 1.0)
    }
}

impl core::fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (r, p, s, t) = self.rpst();
        write!(f, "Game: (R,P,S,T) = ({}, {}, {}, {})", r, p, s, t)
    }
}
