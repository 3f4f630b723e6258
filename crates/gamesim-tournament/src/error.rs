//! Tournament error types

use gamesim_match::{StrategyConfigError, StrategyError};
use thiserror::Error;

/// Why a tournament refused to start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("a tournament needs at least one player")]
    NoPlayers,

    #[error("repetitions must be at least 1")]
    NoRepetitions,

    #[error("turns must be at least 1")]
    NoTurns,

    #[error("payoff matrix has a non-finite entry: {0}")]
    NonFinitePayoffs(String),

    #[error("workers must be at least 1")]
    NoWorkers,

    #[error("player {index} ({name}) is misconfigured: {source}")]
    InvalidStrategy {
        index: usize,
        name: String,
        #[source]
        source: StrategyConfigError,
    },
}

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("pairing ({player_index}, {opponent_index}) failed on repetition {repetition}: {source}")]
    Strategy {
        player_index: usize,
        opponent_index: usize,
        repetition: u32,
        #[source]
        source: StrategyError,
    },

    #[error("interaction file i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("interaction file encoding: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed interaction record on line {line}: {reason}")]
    Record { line: u64, reason: String },

    #[error("interaction records carry no statistics; play with build_results enabled")]
    MissingStatistics,

    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("tournament cancelled after {completed} of {total} pairings")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, TournamentError>;
