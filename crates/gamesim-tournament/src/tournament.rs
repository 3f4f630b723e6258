//! Round-robin tournament scheduling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gamesim_match::{complete_graph, pairing_count, Action, Match, SeededRng, Strategy, StrategyConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::{TournamentConfig, TournamentSetup};
use crate::error::{ConfigurationError, Result, TournamentError};
use crate::interactions::{CsvSink, InteractionRow, InteractionSink, InteractionStatistics};
use crate::result_set::ResultSet;

/// Every player meets every player, itself included, `repetitions` times.
pub struct Tournament {
    players: Vec<Box<dyn Strategy>>,
    names: Vec<String>,
    config: TournamentConfig,
    cancelled: Arc<AtomicBool>,
    num_interactions: u64,
}

/// Both sides of one played repetition
struct Replicate {
    actions: [Vec<Action>; 2],
    statistics: Option<[InteractionStatistics; 2]>,
}

impl Tournament {
    /// Fails before any match is played if the configuration cannot work.
    pub fn new(players: Vec<Box<dyn Strategy>>, config: TournamentConfig) -> Result<Self> {
        config.validate(players.len())?;
        let names = players.iter().map(|p| p.name()).collect();
        Ok(Self {
            players,
            names,
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
            num_interactions: 0,
        })
    }

    /// Rejects any player whose parameters cannot be played.
    pub fn from_configs(players: &[StrategyConfig], config: TournamentConfig) -> Result<Self> {
        for (index, player) in players.iter().enumerate() {
            player.validate().map_err(|source| ConfigurationError::InvalidStrategy {
                index,
                name: player.name(),
                source,
            })?;
        }
        Self::new(players.iter().map(StrategyConfig::build).collect(), config)
    }

    pub fn from_setup(setup: TournamentSetup) -> Result<Self> {
        Self::from_configs(&setup.players, setup.config)
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn player_names(&self) -> &[String] {
        &self.names
    }

    pub fn pairing_count(&self) -> usize {
        pairing_count(self.players.len())
    }

    /// Repetitions played by the last run.
    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }

    /// Setting the flag stops the tournament before its next pairing.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Play the tournament, write every interaction row and, when
    /// `build_results` is set, aggregate them.
    ///
    /// Without an `output` path the rows go to a temporary file that is
    /// removed before returning. If a strategy fails, rows of the pairings
    /// completed before it are kept in the output file.
    pub fn play(&mut self) -> Result<Option<ResultSet>> {
        let build_results = self.config.build_results;
        if !build_results && self.config.output.is_none() {
            log::warn!(
                "{}: build_results is off and no output path is set; results will not be accessible",
                self.config.name
            );
        }

        let (mut sink, path, temporary) = match &self.config.output {
            Some(path) => (CsvSink::create(path, build_results)?, path.clone(), None),
            None => {
                let temporary = tempfile::NamedTempFile::new()?;
                (CsvSink::new(temporary.reopen()?, build_results)?, temporary.path().to_path_buf(), Some(temporary))
            }
        };

        self.play_to_sink(&mut sink)?;
        drop(sink);

        let results = if build_results {
            Some(ResultSet::from_path(&path, self.names.clone(), self.config.repetitions)?)
        } else {
            None
        };

        if let Some(temporary) = temporary {
            temporary.close()?;
        }
        Ok(results)
    }

    /// Play every pairing in order, handing each completed pairing's rows
    /// to `sink`. The sink is flushed whether or not play succeeds.
    pub fn play_to_sink(&mut self, sink: &mut dyn InteractionSink) -> Result<()> {
        self.num_interactions = 0;
        let total = self.pairing_count();
        let progress = self.progress_bar(total);

        log::info!(
            "{}: {} players, {} pairings, {} repetitions of {} turns",
            self.config.name,
            self.players.len(),
            total,
            self.config.repetitions,
            self.config.turns
        );

        let played = if self.config.workers > 1 {
            self.run_parallel(sink, &progress, total)
        } else {
            self.run_serial(sink, &progress, total)
        };
        let flushed = sink.flush();
        progress.finish_and_clear();

        played?;
        flushed?;
        log::info!("{}: finished after {} interactions", self.config.name, self.num_interactions);
        Ok(())
    }

    fn run_serial(&mut self, sink: &mut dyn InteractionSink, progress: &ProgressBar, total: usize) -> Result<()> {
        let pairs: Vec<(usize, usize)> = complete_graph(self.players.len()).collect();
        for (pair_index, &pair) in pairs.iter().enumerate() {
            self.check_cancelled(pair_index, total)?;
            let replicates = self.play_pair(pair, pair_index)?;
            self.write_pair(sink, pair, &replicates)?;
            self.pair_complete(progress, pair, pair_index + 1, total);
        }
        Ok(())
    }

    /// Pairings are played in batches of `workers`; rows are written in
    /// enumeration order once a batch is done.
    fn run_parallel(&mut self, sink: &mut dyn InteractionSink, progress: &ProgressBar, total: usize) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.config.workers).build()?;
        let pairs: Vec<(usize, (usize, usize))> = complete_graph(self.players.len()).enumerate().collect();

        for batch in pairs.chunks(self.config.workers) {
            self.check_cancelled(batch[0].0, total)?;

            let this = &*self;
            let played: Vec<Result<Vec<Replicate>>> = pool.install(|| {
                batch
                    .par_iter()
                    .map(|&(pair_index, pair)| this.play_pair(pair, pair_index))
                    .collect()
            });

            for (&(pair_index, pair), replicates) in batch.iter().zip(played) {
                let replicates = replicates?;
                self.write_pair(sink, pair, &replicates)?;
                self.pair_complete(progress, pair, pair_index + 1, total);
            }
        }
        Ok(())
    }

    fn check_cancelled(&self, completed: usize, total: usize) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            log::warn!("{}: cancelled after {} of {} pairings", self.config.name, completed, total);
            return Err(TournamentError::Cancelled { completed, total });
        }
        Ok(())
    }

    /// Play every repetition of one pairing with fresh strategy instances.
    fn play_pair(&self, (i, j): (usize, usize), pair_index: usize) -> Result<Vec<Replicate>> {
        let root = SeededRng::new(self.config.seed, pair_index as u64);
        let mut replicates = Vec::with_capacity(self.config.repetitions as usize);

        for repetition in 0..self.config.repetitions {
            let mut game = Match::new(
                (self.players[i].clone_fresh(), self.players[j].clone_fresh()),
                self.config.turns,
                self.config.game,
            )
            .with_seed(root.for_stream(u64::from(repetition)).next_u64());
            if let Some(attributes) = self.config.match_attributes {
                game = game.with_match_attributes(attributes);
            }

            game.play().map_err(|source| TournamentError::Strategy {
                player_index: i,
                opponent_index: j,
                repetition,
                source,
            })?;

            let [first, second] = game.players();
            replicates.push(Replicate {
                actions: [first.history().actions().to_vec(), second.history().actions().to_vec()],
                statistics: self
                    .config
                    .build_results
                    .then(|| [InteractionStatistics::from_match(&game, 0), InteractionStatistics::from_match(&game, 1)]),
            });
        }
        Ok(replicates)
    }

    /// Two rows per repetition, one from each side, sharing an interaction index.
    fn write_pair(&mut self, sink: &mut dyn InteractionSink, pair: (usize, usize), replicates: &[Replicate]) -> Result<()> {
        let mut rows = Vec::with_capacity(replicates.len() * 2);
        for (repetition, replicate) in replicates.iter().enumerate() {
            for side in 0..2 {
                let (player, opponent) = if side == 0 { pair } else { (pair.1, pair.0) };
                rows.push(InteractionRow {
                    interaction_index: self.num_interactions,
                    player_index: player,
                    opponent_index: opponent,
                    repetition: repetition as u32,
                    player_name: self.names[player].clone(),
                    opponent_name: self.names[opponent].clone(),
                    actions: replicate.actions[side].clone(),
                    statistics: replicate.statistics.map(|stats| stats[side]),
                });
            }
            self.num_interactions += 1;
        }
        sink.write_interactions(&rows)
    }

    fn pair_complete(&self, progress: &ProgressBar, (i, j): (usize, usize), completed: usize, total: usize) {
        progress.inc(1);
        log::info!(
            "{}: {} vs {} complete [{}/{}]",
            self.config.name,
            self.names[i],
            self.names[j],
            completed,
            total
        );
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.progress_bar {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len} pairings ({eta})") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message("Playing matches");
        bar
    }
}

impl core::fmt::Debug for Tournament {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tournament")
            .field("players", &self.names)
            .field("config", &self.config)
            .finish()
    }
}
