//! Tournament results built from interaction records
//!
//! A [`ResultSet`] reads every row of a tournament, reduces them in four
//! independent groupings and reshapes the buckets into dense per-player
//! tables. Missing buckets read as zero.

mod grouping;
mod summary;

use std::collections::BTreeMap;
use std::path::Path;

use gamesim_match::{NormalizedStateDistribution, StateDistribution};
use serde::Serialize;

use crate::error::{Result, TournamentError};
use crate::interactions::{read_interactions, InteractionRow, InteractionStatistics};

pub use grouping::{mean, median};
use grouping::{group_by, Count, Mean, Sum};
pub use summary::SummaryRow;

/// Aggregated outcome of a tournament, indexed by player position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSet {
    pub players: Vec<String>,
    pub num_players: usize,
    pub repetitions: u32,
    /// `[player][opponent][repetition]` mean score difference per turn
    pub score_diffs: Vec<Vec<Vec<f64>>>,
    /// `[player][opponent][repetition]` mean turns played
    pub match_lengths: Vec<Vec<Vec<f64>>>,
    /// `[player][opponent][repetition]` mean score per turn
    pub payoffs: Vec<Vec<Vec<f64>>>,
    /// `[player][repetition]` matches won against other players
    pub wins: Vec<Vec<u64>>,
    /// `[player][repetition]` total score against other players
    pub scores: Vec<Vec<f64>>,
    /// `[player][repetition]` mean score per turn against other players
    pub normalized_scores: Vec<Vec<f64>>,
    /// `[player][opponent]` state counts summed over repetitions, self-play included
    pub state_distribution: Vec<Vec<StateDistribution>>,
    pub normalized_state_distribution: Vec<Vec<NormalizedStateDistribution>>,
    /// Rows per player against other players
    pub interaction_counts: Vec<u64>,
    /// Player indices, best first
    pub ranking: Vec<usize>,
    pub ranked_names: Vec<String>,
    /// `[player][opponent]` mean of `payoffs` over repetitions
    pub payoff_matrix: Vec<Vec<f64>>,
    /// `[player][opponent]` mean of `score_diffs` over repetitions
    pub payoff_diffs_means: Vec<Vec<f64>>,
}

type RepPlayerOpponent = (u32, usize, usize);

impl ResultSet {
    /// Build results from rows that carry statistics.
    ///
    /// `players` fixes the table size; rows referring to players or
    /// repetitions outside it are ignored.
    pub fn from_rows(rows: &[InteractionRow], players: Vec<String>, repetitions: u32) -> Result<Self> {
        let stats = rows
            .iter()
            .map(|row| row.statistics.map(|s| (row, s)).ok_or(TournamentError::MissingStatistics))
            .collect::<Result<Vec<(&InteractionRow, InteractionStatistics)>>>()?;

        let num_players = players.len();
        let reps = repetitions as usize;

        let ((per_repetition, per_pair), (per_player_repetition, counts)) = rayon::join(
            || {
                rayon::join(
                    || mean_per_repetition_player_opponent(&stats),
                    || state_sum_per_player_opponent(&stats),
                )
            },
            || rayon::join(|| sum_per_player_repetition(&stats), || interaction_count_per_player(&stats)),
        );

        let mut score_diffs = vec![vec![vec![0.0; reps]; num_players]; num_players];
        let mut match_lengths = score_diffs.clone();
        let mut payoffs = score_diffs.clone();
        for (&(rep, player, opponent), &(turns, per_turn, diff_per_turn)) in &per_repetition {
            if player < num_players && opponent < num_players && (rep as usize) < reps {
                let rep = rep as usize;
                match_lengths[player][opponent][rep] = turns;
                payoffs[player][opponent][rep] = per_turn;
                score_diffs[player][opponent][rep] = diff_per_turn;
            }
        }

        let mut wins = vec![vec![0u64; reps]; num_players];
        let mut scores = vec![vec![0.0; reps]; num_players];
        let mut normalized_scores = vec![vec![0.0; reps]; num_players];
        for (&(player, rep), &(win_total, score_total, per_turn)) in &per_player_repetition {
            if player < num_players && (rep as usize) < reps {
                let rep = rep as usize;
                wins[player][rep] = win_total;
                scores[player][rep] = score_total;
                normalized_scores[player][rep] = per_turn;
            }
        }

        let mut state_distribution = vec![vec![StateDistribution::default(); num_players]; num_players];
        for (&(player, opponent), &dist) in &per_pair {
            if player < num_players && opponent < num_players {
                state_distribution[player][opponent] = dist;
            }
        }
        let normalized_state_distribution = state_distribution
            .iter()
            .map(|row| row.iter().map(StateDistribution::normalized).collect())
            .collect();

        let interaction_counts = (0..num_players).map(|p| counts.get(&p).copied().unwrap_or(0)).collect();

        let ranking = rank_players(&normalized_scores);
        let ranked_names = ranking.iter().map(|&i| players[i].clone()).collect();
        let payoff_matrix = means_over_repetitions(&payoffs);
        let payoff_diffs_means = means_over_repetitions(&score_diffs);

        log::debug!("built results for {} players from {} rows", num_players, rows.len());

        Ok(Self {
            players,
            num_players,
            repetitions,
            score_diffs,
            match_lengths,
            payoffs,
            wins,
            scores,
            normalized_scores,
            state_distribution,
            normalized_state_distribution,
            interaction_counts,
            ranking,
            ranked_names,
            payoff_matrix,
            payoff_diffs_means,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, players: Vec<String>, repetitions: u32) -> Result<Self> {
        let rows = read_interactions(path)?;
        Self::from_rows(&rows, players, repetitions)
    }

    /// Like [`ResultSet::from_path`], taking player names and the number of
    /// repetitions from the records themselves.
    pub fn from_path_inferred(path: impl AsRef<Path>) -> Result<Self> {
        let rows = read_interactions(path)?;
        let (players, repetitions) = infer_players(&rows);
        Self::from_rows(&rows, players, repetitions)
    }
}

/// Player names by index and the repetition count implied by `rows`.
pub fn infer_players(rows: &[InteractionRow]) -> (Vec<String>, u32) {
    let mut names: BTreeMap<usize, &str> = BTreeMap::new();
    let mut repetitions = 0;
    for row in rows {
        names.entry(row.player_index).or_insert(&row.player_name);
        names.entry(row.opponent_index).or_insert(&row.opponent_name);
        repetitions = repetitions.max(row.repetition + 1);
    }
    let count = names.keys().next_back().map_or(0, |last| last + 1);
    let players = (0..count).map(|i| names.get(&i).map_or_else(String::new, |n| n.to_string())).collect();
    (players, repetitions)
}

/// Player indices ordered by descending median normalized score.
///
/// Ties keep index order. A player whose scores are all NaN ranks last.
pub fn rank_players(normalized_scores: &[Vec<f64>]) -> Vec<usize> {
    let medians: Vec<f64> = normalized_scores
        .iter()
        .map(|scores| {
            let m = median(scores.iter().copied());
            if m.is_nan() {
                f64::NEG_INFINITY
            } else {
                m
            }
        })
        .collect();
    let mut ranking: Vec<usize> = (0..normalized_scores.len()).collect();
    ranking.sort_by(|&a, &b| medians[b].total_cmp(&medians[a]));
    ranking
}

fn means_over_repetitions(table: &[Vec<Vec<f64>>]) -> Vec<Vec<f64>> {
    table
        .iter()
        .map(|row| row.iter().map(|reps| if reps.is_empty() { 0.0 } else { mean(reps) }).collect())
        .collect()
}

fn mean_per_repetition_player_opponent(
    stats: &[(&InteractionRow, InteractionStatistics)],
) -> BTreeMap<RepPlayerOpponent, (f64, f64, f64)> {
    group_by::<_, _, (Mean, Mean, Mean)>(
        stats.iter(),
        |(row, _)| (row.repetition, row.player_index, row.opponent_index),
        |(_, s)| (f64::from(s.turns), s.score_per_turn, s.score_difference_per_turn),
    )
}

fn state_sum_per_player_opponent(
    stats: &[(&InteractionRow, InteractionStatistics)],
) -> BTreeMap<(usize, usize), StateDistribution> {
    group_by::<_, _, Sum<StateDistribution>>(
        stats.iter(),
        |(row, _)| (row.player_index, row.opponent_index),
        |(_, s)| s.state_distribution,
    )
}

fn sum_per_player_repetition(
    stats: &[(&InteractionRow, InteractionStatistics)],
) -> BTreeMap<(usize, u32), (u64, f64, f64)> {
    group_by::<_, _, (Sum<u64>, Sum<f64>, Mean)>(
        stats.iter().filter(|(row, _)| !row.is_self_interaction()),
        |(row, _)| (row.player_index, row.repetition),
        |(_, s)| (u64::from(s.win), s.score, s.score_per_turn),
    )
}

fn interaction_count_per_player(stats: &[(&InteractionRow, InteractionStatistics)]) -> BTreeMap<usize, u64> {
    group_by::<_, _, Count>(
        stats.iter().filter(|(row, _)| !row.is_self_interaction()),
        |(row, _)| row.player_index,
        |_| (),
    )
}
