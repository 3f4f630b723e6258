//! Round-robin tournaments for iterated two-action games
//!
//! A [`Tournament`] pairs every player with every other player and with
//! itself, plays each pairing for a number of repetitions, writes one
//! [`InteractionRow`] per player per repetition and aggregates the rows
//! into a ranked [`ResultSet`].
//!
//! ```no_run
//! use gamesim_match::StrategyConfig;
//! use gamesim_tournament::{Tournament, TournamentConfig};
//!
//! let lineup = [StrategyConfig::Cooperator, StrategyConfig::Defector];
//! let mut tournament = Tournament::from_configs(&lineup, TournamentConfig::default()).unwrap();
//! if let Some(results) = tournament.play().unwrap() {
//!     for row in results.summarise() {
//!         println!("{} {} {}", row.rank, row.name, row.median_normalized_score);
//!     }
//! }
//! ```

mod config;
mod error;
mod interactions;
mod result_set;
mod tournament;

pub use config::{TournamentConfig, TournamentSetup, DEFAULT_REPETITIONS};
pub use error::{ConfigurationError, Result, TournamentError};
pub use interactions::{
    header, read_interactions, read_interactions_from, CsvSink, InteractionRow, InteractionSink, InteractionStatistics,
    MemorySink, RAW_HEADER, STATISTICS_HEADER,
};
pub use result_set::{infer_players, mean, median, rank_players, ResultSet, SummaryRow};
pub use tournament::Tournament;
