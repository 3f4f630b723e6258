//! Built-in reference strategies
//!
//! Every built-in is described by a serialisable [`StrategyConfig`] and
//! rebuilt from it when cloned, so no state leaks between matches.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::action::{Action, ActionError};
use crate::equality::{Attribute, SEQUENCE_PREFIX};
use crate::history::History;
use crate::random::SeededRng;
use crate::sequence::ActionCycle;
use crate::strategy::{MatchAttributes, Strategy, StrategyError};

/// Configuration of a built-in strategy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StrategyConfig {
    /// Always plays `A`.
    Cooperator,
    /// Always plays `B`.
    Defector,
    /// Copy opponent's last move. Start with `A`.
    TitForTat {
        /// Percentage chance to play `A` anyway after the opponent played `B` (0-100)
        #[serde(default)]
        forgiveness: u8,
        /// Turns to wait before retaliating
        #[serde(default)]
        retaliation_delay: u8,
    },
    /// Tit For Tat but start with `B`.
    SuspiciousTitForTat,
    /// Play `A` until the opponent plays `B` more than `noise_tolerance` times.
    GrimTrigger {
        #[serde(default)]
        noise_tolerance: u8,
    },
    /// Repeat the last move if it earned at least the reward `R`, switch otherwise.
    WinStayLoseShift,
    /// Play `B` only after two consecutive `B`s from the opponent.
    TitForTwoTats,
    /// Escalating retaliation: after N opponent `B`s, answer with N(N+1)/2 `B`s in total.
    Gradual,
    /// Play `A` with probability `p`.
    Random { p: f64 },
    /// Repeat a fixed pattern such as `"AAB"`.
    Cycler { pattern: String },
    /// Play `A`, switching to `B` for the final `turns` turns when the match length is known.
    FinalTurnDefector { turns: u32 },
}

impl StrategyConfig {
    pub fn build(&self) -> Box<dyn Strategy> {
        Box::new(BuiltinStrategy::new(self.clone()))
    }

    /// Display name with non-default parameters appended.
    pub fn name(&self) -> String {
        match self {
            StrategyConfig::Cooperator => "Cooperator".to_string(),
            StrategyConfig::Defector => "Defector".to_string(),
            StrategyConfig::TitForTat { forgiveness: 0, retaliation_delay: 0 } => "Tit For Tat".to_string(),
            StrategyConfig::TitForTat { forgiveness, retaliation_delay } => {
                format!("Tit For Tat: {}, {}", forgiveness, retaliation_delay)
            }
            StrategyConfig::SuspiciousTitForTat => "Suspicious Tit For Tat".to_string(),
            StrategyConfig::GrimTrigger { noise_tolerance: 0 } => "Grim Trigger".to_string(),
            StrategyConfig::GrimTrigger { noise_tolerance } => format!("Grim Trigger: {}", noise_tolerance),
            StrategyConfig::WinStayLoseShift => "Win-Stay Lose-Shift".to_string(),
            StrategyConfig::TitForTwoTats => "Tit For 2 Tats".to_string(),
            StrategyConfig::Gradual => "Gradual".to_string(),
            StrategyConfig::Random { p } => format!("Random: {}", p),
            StrategyConfig::Cycler { pattern } => format!("Cycler: {}", pattern),
            StrategyConfig::FinalTurnDefector { turns } => format!("Final Turn Defector: {}", turns),
        }
    }

    /// Check parameters that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        match self {
            StrategyConfig::Random { p } if !(0.0..=1.0).contains(p) => Err(StrategyConfigError::Probability(*p)),
            StrategyConfig::Cycler { pattern } => match ActionCycle::parse(pattern) {
                Ok(_) => Ok(()),
                Err(source) => Err(StrategyConfigError::Pattern { pattern: pattern.clone(), source }),
            },
            _ => Ok(()),
        }
    }
}

/// A [`StrategyConfig`] that cannot be played.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StrategyConfigError {
    #[error("probability must lie in [0, 1], got {0}")]
    Probability(f64),

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: ActionError,
    },
}

/// A built-in strategy instance: its configuration plus per-match state.
#[derive(Clone, Debug)]
pub struct BuiltinStrategy {
    config: StrategyConfig,
    attributes: MatchAttributes,
    rng: SeededRng,
    cycle: ActionCycle,
    /// Set when the configuration is invalid; every move then fails
    fault: Option<StrategyConfigError>,
}

impl BuiltinStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        let fault = config.validate().err();
        let cycle = match &config {
            StrategyConfig::Cycler { pattern } => ActionCycle::parse(pattern).unwrap_or_else(|_| ActionCycle::new(Vec::new())),
            _ => ActionCycle::new(Vec::new()),
        };
        Self { config, attributes: MatchAttributes::default(), rng: SeededRng::new(0, 0), cycle, fault }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }
}

impl Strategy for BuiltinStrategy {
    fn name(&self) -> String {
        self.config.name()
    }

    fn strategy(&mut self, own: &History, opponent: &History) -> Result<Action, StrategyError> {
        if let Some(fault) = &self.fault {
            return Err(StrategyError::new(self.name(), fault.to_string()));
        }
        let own = own.actions();
        let opponent = opponent.actions();
        let action = match &self.config {
            StrategyConfig::Cooperator => Action::A,
            StrategyConfig::Defector => Action::B,
            StrategyConfig::TitForTat { forgiveness, retaliation_delay } => {
                execute_tit_for_tat(opponent, Action::A, *forgiveness, *retaliation_delay, &mut self.rng)
            }
            StrategyConfig::SuspiciousTitForTat => execute_tit_for_tat(opponent, Action::B, 0, 0, &mut self.rng),
            StrategyConfig::GrimTrigger { noise_tolerance } => execute_grim_trigger(opponent, *noise_tolerance),
            StrategyConfig::WinStayLoseShift => execute_win_stay_lose_shift(own, opponent, &self.attributes),
            StrategyConfig::TitForTwoTats => execute_tit_for_two_tats(opponent),
            StrategyConfig::Gradual => execute_gradual(own, opponent),
            StrategyConfig::Random { p } => self.rng.random_choice(*p),
            StrategyConfig::Cycler { .. } => self.cycle.advance(),
            StrategyConfig::FinalTurnDefector { turns } => match self.attributes.length {
                Some(length) if own.len() as u64 + u64::from(*turns) >= u64::from(length) => Action::B,
                _ => Action::A,
            },
        };
        Ok(action)
    }

    fn receive_match_attributes(&mut self, attributes: &MatchAttributes) {
        self.attributes = *attributes;
        self.rng = SeededRng::new(attributes.seed, 0);
    }

    fn reset(&mut self) {
        self.cycle.restart();
        self.rng = SeededRng::new(self.attributes.seed, 0);
    }

    fn clone_fresh(&self) -> Box<dyn Strategy> {
        self.config.build()
    }

    fn attributes(&self) -> Vec<(&'static str, Attribute<'_>)> {
        let mut attributes = vec![("config", Attribute::value(&self.config))];
        if let StrategyConfig::Cycler { .. } = self.config {
            attributes.push(("cycle", Attribute::Sequence(self.cycle.prefix(SEQUENCE_PREFIX))));
        }
        attributes
    }
}

/// Tit-for-Tat family: copy the opponent's last move, opening with `opening`
fn execute_tit_for_tat(
    opponent_history: &[Action],
    opening: Action,
    forgiveness: u8,
    retaliation_delay: u8,
    rng: &mut SeededRng,
) -> Action {
    match opponent_history.last() {
        None => opening,
        Some(Action::A) => Action::A,
        Some(Action::B) => {
            // Retaliation delay: wait N turns after seeing B
            if retaliation_delay > 0 {
                let last_b = opponent_history.iter().rposition(|a| *a == Action::B);
                if let Some(pos) = last_b {
                    let turns_since = opponent_history.len() - 1 - pos;
                    if turns_since < retaliation_delay as usize {
                        return Action::A;
                    }
                }
            }
            rng.random_choice(f64::from(forgiveness) / 100.0)
        }
    }
}

fn execute_grim_trigger(opponent_history: &[Action], noise_tolerance: u8) -> Action {
    let b_count = opponent_history.iter().filter(|a| **a == Action::B).count();
    if b_count > noise_tolerance as usize {
        Action::B
    } else {
        Action::A
    }
}

/// Win-stay, lose-switch against the reward `R` of the current game
fn execute_win_stay_lose_shift(
    my_history: &[Action],
    opponent_history: &[Action],
    attributes: &MatchAttributes,
) -> Action {
    let (Some(&my_last), Some(&opp_last)) = (my_history.last(), opponent_history.last()) else {
        return Action::A;
    };
    let (reward, _, _, _) = attributes.game.rpst();
    let (my_score, _) = attributes.game.score((my_last, opp_last));
    if my_score >= reward {
        my_last
    } else {
        my_last.flip()
    }
}

fn execute_tit_for_two_tats(opponent_history: &[Action]) -> Action {
    match opponent_history {
        [.., Action::B, Action::B] => Action::B,
        _ => Action::A,
    }
}

/// After N opponent `B`s the player should have played N(N+1)/2 `B`s in total
fn execute_gradual(my_history: &[Action], opponent_history: &[Action]) -> Action {
    let their_b = opponent_history.iter().filter(|a| **a == Action::B).count();
    let my_b = my_history.iter().filter(|a| **a == Action::B).count();
    let expected = their_b * (their_b + 1) / 2;
    if my_b < expected {
        Action::B
    } else {
        Action::A
    }
}
