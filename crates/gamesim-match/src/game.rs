//! Match execution engine

use serde::{Deserialize, Serialize};
use crate::action::Action;
use crate::history::{NormalizedStateDistribution, StateDistribution};
use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;
use crate::strategy::{MatchAttributes, Player, Strategy, StrategyError};

/// Number of turns per match unless configured otherwise
pub const DEFAULT_TURNS: u32 = 200;

/// Who won a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Index (0 or 1) of the player with the strictly greater total score
    Winner(usize),
    Tie,
    /// The match has not been played, or had no turns
    NoResult,
}

impl Outcome {
    /// Win flag for the player at `index`: 1 if it won, 0 otherwise.
    pub fn win_flag(&self, index: usize) -> u8 {
        match self {
            Outcome::Winner(winner) if *winner == index => 1,
            _ => 0,
        }
    }
}

/// A fixed-length sequence of turns between two players
pub struct Match {
    players: [Player; 2],
    turns: u32,
    game: PayoffMatrix,
    attributes: MatchAttributes,
    seed: u64,
    result: Vec<(Action, Action)>,
    played: bool,
}

impl Match {
    /// Strategies are told the turn count and payoff matrix unless
    /// [`Match::with_match_attributes`] overrides them.
    pub fn new(players: (Box<dyn Strategy>, Box<dyn Strategy>), turns: u32, game: PayoffMatrix) -> Self {
        let (first, second) = players;
        Self {
            players: [Player::new(first), Player::new(second)],
            turns,
            game,
            attributes: MatchAttributes { length: Some(turns), game, seed: 0 },
            seed: 0,
            result: Vec::with_capacity(turns as usize),
            played: false,
        }
    }

    pub fn with_match_attributes(mut self, attributes: MatchAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Seed for stochastic strategies. Each side gets its own stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Play the match from a clean state and return the action pairs.
    ///
    /// A strategy error aborts the match; it is not retried.
    pub fn play(&mut self) -> Result<&[(Action, Action)], StrategyError> {
        self.result.clear();
        self.played = false;

        let base = SeededRng::new(self.seed, 0);
        for (role, player) in self.players.iter_mut().enumerate() {
            let mut attributes = self.attributes;
            attributes.seed = base.for_stream(role as u64).next_u64();
            player.set_match_attributes(attributes);
            player.reset();
        }

        let [first, second] = &mut self.players;
        for _ in 0..self.turns {
            let pair = first.play(second)?;
            self.result.push(pair);
        }

        self.played = true;
        log::debug!(
            "{} vs {}: {} turns, final score {:?}",
            self.players[0].name(),
            self.players[1].name(),
            self.turns,
            self.final_score()
        );
        Ok(&self.result)
    }

    pub fn result(&self) -> &[(Action, Action)] {
        &self.result
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn game(&self) -> &PayoffMatrix {
        &self.game
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Payoff pair for every turn played
    pub fn scores(&self) -> Vec<(f64, f64)> {
        self.result.iter().map(|&pair| self.game.score(pair)).collect()
    }

    pub fn final_score(&self) -> (f64, f64) {
        self.result.iter().fold((0.0, 0.0), |(a, b), &pair| {
            let (sa, sb) = self.game.score(pair);
            (a + sa, b + sb)
        })
    }

    /// Mean score per turn; zero for an empty match
    pub fn final_score_per_turn(&self) -> (f64, f64) {
        if self.result.is_empty() {
            return (0.0, 0.0);
        }
        let turns = self.result.len() as f64;
        let (a, b) = self.final_score();
        (a / turns, b / turns)
    }

    pub fn winner(&self) -> Outcome {
        if !self.played || self.result.is_empty() {
            return Outcome::NoResult;
        }
        let (a, b) = self.final_score();
        if a > b {
            Outcome::Winner(0)
        } else if b > a {
            Outcome::Winner(1)
        } else {
            Outcome::Tie
        }
    }

    /// State counts from each player's own perspective
    pub fn state_distribution(&self) -> [StateDistribution; 2] {
        [
            *self.players[0].history().state_distribution(),
            *self.players[1].history().state_distribution(),
        ]
    }

    pub fn normalized_state_distribution(&self) -> [NormalizedStateDistribution; 2] {
        let [first, second] = self.state_distribution();
        [first.normalized(), second.normalized()]
    }
}

impl core::fmt::Debug for Match {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Match")
            .field("players", &self.players)
            .field("turns", &self.turns)
            .field("game", &self.game)
            .field("played", &self.played)
            .finish()
    }
}
