//! Match logic for iterated two-action games
//!
//! Actions, the payoff matrix, the strategy contract, the match engine and
//! round-robin pairing enumeration. Tournaments and result aggregation live
//! in `gamesim-tournament`.

mod action;
mod equality;
mod game;
mod history;
mod pairing;
mod payoff;
mod random;
mod sequence;
mod strategies;
mod strategy;

pub use action::{actions_to_str, str_to_actions, Action, ActionError};
pub use equality::{structurally_equal, Attribute, SEQUENCE_PREFIX};
pub use game::{Match, Outcome, DEFAULT_TURNS};
pub use history::{History, NormalizedStateDistribution, State, StateDistribution};
pub use pairing::{complete_graph, graph_is_connected, index_for_pairing, pairing_count, pairing_for_index};
pub use payoff::PayoffMatrix;
pub use random::{Pdf, SeededRng};
pub use sequence::ActionCycle;
pub use strategies::{BuiltinStrategy, StrategyConfig, StrategyConfigError};
pub use strategy::{MatchAttributes, Player, Strategy, StrategyError};
