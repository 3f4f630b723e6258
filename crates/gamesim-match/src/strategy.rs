//! The strategy capability and the player wrapper that drives it

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::action::Action;
use crate::equality::{structurally_equal, Attribute};
use crate::history::History;
use crate::payoff::PayoffMatrix;

/// A strategy failed to produce an action. Fatal for the match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("strategy {name} failed: {reason}")]
pub struct StrategyError {
    pub name: String,
    pub reason: String,
}

impl StrategyError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { name: name.into(), reason: reason.into() }
    }
}

/// Match-level information passed to strategies before play.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchAttributes {
    /// Number of turns, when the strategy is allowed to know it
    pub length: Option<u32>,
    pub game: PayoffMatrix,
    /// Seed for strategies that sample; set per player per match
    #[serde(default)]
    pub seed: u64,
}

impl Default for MatchAttributes {
    fn default() -> Self {
        Self { length: None, game: PayoffMatrix::default(), seed: 0 }
    }
}

/// A decision-making strategy.
///
/// Implementations must be rebuildable from their own configuration:
/// `clone_fresh` returns an instance with the same parameters and no state.
pub trait Strategy: Send + Sync {
    /// Stable display identity. Parameters are appended as `Name: p1, p2`.
    fn name(&self) -> String;

    /// Choose the next action given the completed history of both sides.
    fn strategy(&mut self, own: &History, opponent: &History) -> Result<Action, StrategyError>;

    fn receive_match_attributes(&mut self, _attributes: &MatchAttributes) {}

    /// Drop any per-match state.
    fn reset(&mut self);

    fn clone_fresh(&self) -> Box<dyn Strategy>;

    /// Named attributes compared by structural equality.
    fn attributes(&self) -> Vec<(&'static str, Attribute<'_>)> {
        Vec::new()
    }
}

/// A strategy together with the history it accumulates during a match.
pub struct Player {
    strategy: Box<dyn Strategy>,
    history: History,
    attributes: MatchAttributes,
}

impl Player {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self { strategy, history: History::new(), attributes: MatchAttributes::default() }
    }

    pub fn name(&self) -> String {
        self.strategy.name()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    pub fn match_attributes(&self) -> &MatchAttributes {
        &self.attributes
    }

    pub fn set_match_attributes(&mut self, attributes: MatchAttributes) {
        self.attributes = attributes;
        self.strategy.receive_match_attributes(&self.attributes);
    }

    /// Clear history and strategy state, keeping configuration and attributes.
    pub fn reset(&mut self) {
        self.history.clear();
        self.strategy.reset();
        self.strategy.receive_match_attributes(&self.attributes);
    }

    /// A new player with the same configuration and attributes but no history.
    pub fn clone_fresh(&self) -> Self {
        let mut player = Self::new(self.strategy.clone_fresh());
        player.set_match_attributes(self.attributes);
        player
    }

    /// Play one simultaneous turn against `opponent`.
    ///
    /// Both strategies see only the turns already completed. If either
    /// fails, neither history is touched.
    pub fn play(&mut self, opponent: &mut Player) -> Result<(Action, Action), StrategyError> {
        let s1 = self.strategy.strategy(&self.history, &opponent.history)?;
        let s2 = opponent.strategy.strategy(&opponent.history, &self.history)?;
        self.history.record(s1, s2);
        opponent.history.record(s2, s1);
        Ok((s1, s2))
    }
}

impl From<Box<dyn Strategy>> for Player {
    fn from(strategy: Box<dyn Strategy>) -> Self {
        Self::new(strategy)
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.history == other.history
            && structurally_equal(self.strategy.as_ref(), other.strategy.as_ref())
    }
}

impl core::fmt::Debug for Player {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name())
            .field("history", &self.history)
            .finish()
    }
}
