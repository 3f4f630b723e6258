//! Per-player play history and state distributions

use serde::{Deserialize, Serialize};
use crate::action::Action;

/// The outcome of one turn as seen by one player: `(own action, opponent action)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct State {
    pub own: Action,
    pub opponent: Action,
}

impl State {
    pub const AA: State = State { own: Action::A, opponent: Action::A };
    pub const AB: State = State { own: Action::A, opponent: Action::B };
    pub const BA: State = State { own: Action::B, opponent: Action::A };
    pub const BB: State = State { own: Action::B, opponent: Action::B };

    /// All four states in canonical `AA, AB, BA, BB` order.
    pub const ALL: [State; 4] = [State::AA, State::AB, State::BA, State::BB];

    pub fn new(own: Action, opponent: Action) -> Self {
        Self { own, opponent }
    }

    /// The same turn seen from the other side.
    pub fn reversed(self) -> Self {
        Self { own: self.opponent, opponent: self.own }
    }

    fn slot(self) -> usize {
        match (self.own, self.opponent) {
            (Action::A, Action::A) => 0,
            (Action::A, Action::B) => 1,
            (Action::B, Action::A) => 2,
            (Action::B, Action::B) => 3,
        }
    }
}

impl core::fmt::Display for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.own, self.opponent)
    }
}

/// Frequency table over the four states.
///
/// Every state always has a defined count: states never observed read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDistribution {
    counts: [u64; 4],
}

impl StateDistribution {
    pub fn from_counts(aa: u64, ab: u64, ba: u64, bb: u64) -> Self {
        Self { counts: [aa, ab, ba, bb] }
    }

    pub fn get(&self, state: State) -> u64 {
        self.counts[state.slot()]
    }

    pub fn increment(&mut self, state: State) {
        self.counts[state.slot()] += 1;
    }

    pub fn add(&mut self, state: State, count: u64) {
        self.counts[state.slot()] += count;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Counts in canonical `AA, AB, BA, BB` order.
    pub fn counts(&self) -> [u64; 4] {
        self.counts
    }

    /// The distribution from the opponent's perspective (`AB` and `BA` swap).
    pub fn reversed(&self) -> Self {
        let [aa, ab, ba, bb] = self.counts;
        Self::from_counts(aa, ba, ab, bb)
    }

    /// Each count divided by this distribution's own total.
    /// An empty distribution normalizes to all zeros.
    pub fn normalized(&self) -> NormalizedStateDistribution {
        let total = self.total();
        if total == 0 {
            return NormalizedStateDistribution::default();
        }
        let mut rates = [0.0; 4];
        for (rate, &count) in rates.iter_mut().zip(self.counts.iter()) {
            *rate = count as f64 / total as f64;
        }
        NormalizedStateDistribution { rates }
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, u64)> + '_ {
        State::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

impl core::ops::AddAssign for StateDistribution {
    fn add_assign(&mut self, other: Self) {
        for (count, extra) in self.counts.iter_mut().zip(other.counts) {
            *count += extra;
        }
    }
}

/// A [`StateDistribution`] scaled to rates. Absent states read as `0.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStateDistribution {
    rates: [f64; 4],
}

impl NormalizedStateDistribution {
    pub fn get(&self, state: State) -> f64 {
        self.rates[state.slot()]
    }

    pub fn rates(&self) -> [f64; 4] {
        self.rates
    }

    pub fn total(&self) -> f64 {
        self.rates.iter().sum()
    }
}

/// Everything a player has done so far in the current match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    actions: Vec<Action>,
    action_a: u64,
    action_b: u64,
    state_distribution: StateDistribution,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one turn: our own move and the reply it met.
    pub fn record(&mut self, own: Action, opponent: Action) {
        self.actions.push(own);
        match own {
            Action::A => self.action_a += 1,
            Action::B => self.action_b += 1,
        }
        self.state_distribution.increment(State::new(own, opponent));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn last(&self) -> Option<Action> {
        self.actions.last().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// How many times `action` has been played.
    pub fn count(&self, action: Action) -> u64 {
        match action {
            Action::A => self.action_a,
            Action::B => self.action_b,
        }
    }

    pub fn state_distribution(&self) -> &StateDistribution {
        &self.state_distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::{A, B};

    #[test]
    fn test_absent_states_read_zero() {
        let dist = StateDistribution::default();
        for state in State::ALL {
            assert_eq!(dist.get(state), 0);
        }
        assert!(dist.is_empty());
    }

    #[test]
    fn test_normalized_empty_is_zero() {
        let norm = StateDistribution::default().normalized();
        assert_eq!(norm.rates(), [0.0; 4]);
        assert_eq!(norm.total(), 0.0);
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let dist = StateDistribution::from_counts(1, 2, 3, 4);
        let norm = dist.normalized();
        assert_eq!(norm.get(State::AA), 0.1);
        assert_eq!(norm.get(State::BB), 0.4);
        assert!((norm.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_swaps_mixed_states() {
        let dist = StateDistribution::from_counts(1, 2, 3, 4);
        assert_eq!(dist.reversed().counts(), [1, 3, 2, 4]);
        assert_eq!(State::AB.reversed(), State::BA);
        assert_eq!(State::AA.reversed(), State::AA);
    }

    #[test]
    fn test_add_assign() {
        let mut dist = StateDistribution::from_counts(1, 0, 2, 0);
        dist += StateDistribution::from_counts(0, 3, 1, 4);
        assert_eq!(dist.counts(), [1, 3, 3, 4]);
    }

    #[test]
    fn test_history_record() {
        let mut history = History::new();
        history.record(A, B);
        history.record(A, A);
        history.record(B, B);

        assert_eq!(history.actions(), &[A, A, B]);
        assert_eq!(history.count(A), 2);
        assert_eq!(history.count(B), 1);
        assert_eq!(history.last(), Some(B));
        assert_eq!(history.state_distribution().get(State::AB), 1);
        assert_eq!(history.state_distribution().get(State::AA), 1);
        assert_eq!(history.state_distribution().get(State::BB), 1);
        assert_eq!(history.state_distribution().total(), 3);

        history.clear();
        assert!(history.is_empty());
        assert!(history.state_distribution().is_empty());
    }

    #[test]
    fn test_state_display() {
        let labels: Vec<String> = State::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["AA", "AB", "BA", "BB"]);
    }
}
