//! Tournament configuration

use std::path::PathBuf;

use gamesim_match::{MatchAttributes, PayoffMatrix, StrategyConfig, DEFAULT_TURNS};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

pub const DEFAULT_REPETITIONS: u32 = 10;

/// Everything a [`crate::Tournament`] needs besides its players.
///
/// Missing fields take their defaults when loaded from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub name: String,
    pub game: PayoffMatrix,
    /// Turns per match
    pub turns: u32,
    /// Matches per pairing
    pub repetitions: u32,
    /// Replaces what strategies are told about each match. The per-player
    /// seed is always set by the match itself.
    pub match_attributes: Option<MatchAttributes>,
    /// Where interaction records go. `None` writes to a temporary file that
    /// is removed once results are built.
    pub output: Option<PathBuf>,
    pub build_results: bool,
    pub progress_bar: bool,
    /// Pairings played concurrently
    pub workers: usize,
    /// Root seed for every stochastic strategy in the tournament
    pub seed: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "gamesim".to_string(),
            game: PayoffMatrix::default(),
            turns: DEFAULT_TURNS,
            repetitions: DEFAULT_REPETITIONS,
            match_attributes: None,
            output: None,
            build_results: true,
            progress_bar: false,
            workers: 1,
            seed: 0,
        }
    }
}

impl TournamentConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the settings for a tournament of `player_count` players.
    pub fn validate(&self, player_count: usize) -> std::result::Result<(), ConfigurationError> {
        if player_count == 0 {
            return Err(ConfigurationError::NoPlayers);
        }
        if self.repetitions < 1 {
            return Err(ConfigurationError::NoRepetitions);
        }
        if self.turns == 0 {
            return Err(ConfigurationError::NoTurns);
        }
        if !self.game.is_finite() {
            return Err(ConfigurationError::NonFinitePayoffs(self.game.to_string()));
        }
        if let Some(attributes) = &self.match_attributes {
            if !attributes.game.is_finite() {
                return Err(ConfigurationError::NonFinitePayoffs(attributes.game.to_string()));
            }
        }
        if self.workers == 0 {
            return Err(ConfigurationError::NoWorkers);
        }
        Ok(())
    }
}

/// A complete tournament description: the lineup plus its configuration.
///
/// ```json
/// {"players": [{"kind": "Cooperator"}, {"kind": "Random", "p": 0.3}], "turns": 50}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentSetup {
    pub players: Vec<StrategyConfig>,
    #[serde(flatten)]
    pub config: TournamentConfig,
}

impl TournamentSetup {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TournamentConfig::default();
        assert_eq!(config.name, "gamesim");
        assert_eq!(config.turns, 200);
        assert_eq!(config.repetitions, 10);
        assert_eq!(config.game, PayoffMatrix::new(3.0, 0.0, 5.0, 1.0));
        assert!(config.build_results);
        assert!(!config.progress_bar);
        assert_eq!(config.output, None);
        assert_eq!(config.workers, 1);
        assert!(config.validate(2).is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = TournamentConfig::from_json(r#"{"turns": 5, "repetitions": 2, "output": "out.csv"}"#).unwrap();
        assert_eq!(config.turns, 5);
        assert_eq!(config.repetitions, 2);
        assert_eq!(config.output, Some(PathBuf::from("out.csv")));
        assert_eq!(config.name, "gamesim");
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(TournamentConfig::from_json("{turns: 5").is_err());
    }

    #[test]
    fn test_validate() {
        let config = TournamentConfig::default();
        assert_eq!(config.validate(0), Err(ConfigurationError::NoPlayers));
        assert_eq!(config.clone().with_repetitions(0).validate(3), Err(ConfigurationError::NoRepetitions));
        assert_eq!(config.clone().with_turns(0).validate(3), Err(ConfigurationError::NoTurns));
        assert_eq!(config.clone().with_workers(0).validate(3), Err(ConfigurationError::NoWorkers));

        let bad_game = TournamentConfig { game: PayoffMatrix::new(3.0, f64::NAN, 5.0, 1.0), ..Default::default() };
        assert!(matches!(bad_game.validate(3), Err(ConfigurationError::NonFinitePayoffs(_))));

        let bad_override = TournamentConfig {
            match_attributes: Some(MatchAttributes {
                length: None,
                game: PayoffMatrix::new(f64::INFINITY, 0.0, 5.0, 1.0),
                seed: 0,
            }),
            ..Default::default()
        };
        assert!(matches!(bad_override.validate(3), Err(ConfigurationError::NonFinitePayoffs(_))));
    }

    #[test]
    fn test_setup_from_json() {
        let setup = TournamentSetup::from_json(
            r#"{
                "players": [{"kind": "Cooperator"}, {"kind": "TitForTat"}, {"kind": "Random", "p": 0.3}],
                "turns": 50,
                "seed": 9
            }"#,
        )
        .unwrap();
        assert_eq!(setup.players.len(), 3);
        assert_eq!(setup.players[1], StrategyConfig::TitForTat { forgiveness: 0, retaliation_delay: 0 });
        assert_eq!(setup.config.turns, 50);
        assert_eq!(setup.config.seed, 9);
        assert_eq!(setup.config.repetitions, DEFAULT_REPETITIONS);
    }
}
