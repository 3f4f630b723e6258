//! Ranked one-line-per-player summary

use std::io::Write;
use std::path::Path;

use gamesim_match::State;
use serde::{Deserialize, Serialize};

use super::{median, ResultSet};
use crate::error::{Result, TournamentError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub rank: usize,
    pub name: String,
    pub median_normalized_score: f64,
    pub median_wins: f64,
    #[serde(rename = "AA_rate")]
    pub aa_rate: f64,
    #[serde(rename = "AB_rate")]
    pub ab_rate: f64,
    #[serde(rename = "BA_rate")]
    pub ba_rate: f64,
    #[serde(rename = "BB_rate")]
    pub bb_rate: f64,
}

impl ResultSet {
    /// One row per player in ranking order, rank 0 first.
    ///
    /// State rates come from the player's normalized distributions against
    /// every other player, summed and scaled back to 1. A player that only
    /// met itself has all rates at zero.
    pub fn summarise(&self) -> Vec<SummaryRow> {
        self.ranking
            .iter()
            .enumerate()
            .map(|(rank, &player)| {
                let [aa_rate, ab_rate, ba_rate, bb_rate] = self.cross_opponent_rates(player);
                SummaryRow {
                    rank,
                    name: self.players[player].clone(),
                    median_normalized_score: median(self.normalized_scores[player].iter().copied()),
                    median_wins: median(self.wins[player].iter().map(|&w| w as f64)),
                    aa_rate,
                    ab_rate,
                    ba_rate,
                    bb_rate,
                }
            })
            .collect()
    }

    fn cross_opponent_rates(&self, player: usize) -> [f64; 4] {
        let mut totals = [0.0; 4];
        for (opponent, dist) in self.normalized_state_distribution[player].iter().enumerate() {
            if opponent == player {
                continue;
            }
            for (total, state) in totals.iter_mut().zip(State::ALL) {
                *total += dist.get(state);
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum == 0.0 {
            return [0.0; 4];
        }
        totals.map(|t| t / sum)
    }

    /// Write the summary as CSV with a header row.
    pub fn write_summary(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_summary_to(file)
    }

    pub fn write_summary_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in self.summarise() {
            writer.serialize(row)?;
        }
        writer.flush().map_err(TournamentError::Io)
    }
}
