//! Interaction records and where they are written
//!
//! One [`InteractionRow`] is produced per player perspective per repetition
//! of every pairing. Rows are stored as CSV with a header; the statistics
//! columns are present only when results were requested.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use gamesim_match::{actions_to_str, str_to_actions, Action, Match, State, StateDistribution};

use crate::error::{Result, TournamentError};

/// Columns every record carries
pub const RAW_HEADER: [&str; 7] = [
    "interaction_index",
    "player_index",
    "opponent_index",
    "repetition",
    "player_name",
    "opponent_name",
    "action_history",
];

/// Columns appended when statistics are computed
pub const STATISTICS_HEADER: [&str; 10] = [
    "score",
    "score_difference",
    "turns",
    "score_per_turn",
    "score_difference_per_turn",
    "win",
    "AA_count",
    "AB_count",
    "BA_count",
    "BB_count",
];

/// The full header for a file with or without statistics.
pub fn header(with_statistics: bool) -> Vec<&'static str> {
    let mut header = RAW_HEADER.to_vec();
    if with_statistics {
        header.extend(STATISTICS_HEADER);
    }
    header
}

/// Per-row figures derived from one played match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionStatistics {
    pub score: f64,
    pub score_difference: f64,
    pub turns: u32,
    pub score_per_turn: f64,
    pub score_difference_per_turn: f64,
    pub win: u8,
    pub state_distribution: StateDistribution,
}

impl InteractionStatistics {
    /// Statistics of a played match from the point of view of player `index` (0 or 1).
    pub fn from_match(game: &Match, index: usize) -> Self {
        let (first, second) = game.final_score();
        let (score, other) = if index == 0 { (first, second) } else { (second, first) };
        let turns = game.result().len();
        let score_difference = score - other;
        let (score_per_turn, score_difference_per_turn) = if turns == 0 {
            (0.0, 0.0)
        } else {
            (score / turns as f64, score_difference / turns as f64)
        };
        Self {
            score,
            score_difference,
            turns: turns as u32,
            score_per_turn,
            score_difference_per_turn,
            win: game.winner().win_flag(index),
            state_distribution: game.state_distribution()[index],
        }
    }
}

/// One player's view of one repetition of one pairing.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionRow {
    /// Shared by the two rows of the same repetition
    pub interaction_index: u64,
    pub player_index: usize,
    pub opponent_index: usize,
    pub repetition: u32,
    pub player_name: String,
    pub opponent_name: String,
    /// This player's own moves
    pub actions: Vec<Action>,
    pub statistics: Option<InteractionStatistics>,
}

impl InteractionRow {
    pub fn is_self_interaction(&self) -> bool {
        self.player_index == self.opponent_index
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.interaction_index.to_string(),
            self.player_index.to_string(),
            self.opponent_index.to_string(),
            self.repetition.to_string(),
            self.player_name.clone(),
            self.opponent_name.clone(),
            actions_to_str(&self.actions),
        ];
        if let Some(stats) = &self.statistics {
            record.extend([
                stats.score.to_string(),
                stats.score_difference.to_string(),
                stats.turns.to_string(),
                stats.score_per_turn.to_string(),
                stats.score_difference_per_turn.to_string(),
                stats.win.to_string(),
            ]);
            record.extend(stats.state_distribution.counts().iter().map(|c| c.to_string()));
        }
        record
    }

    /// Decode a record. `line` is only used in error messages.
    pub fn from_record(record: &StringRecord, line: u64) -> Result<Self> {
        let with_statistics = match record.len() {
            n if n == RAW_HEADER.len() => false,
            n if n == RAW_HEADER.len() + STATISTICS_HEADER.len() => true,
            n => {
                return Err(TournamentError::Record {
                    line,
                    reason: format!("expected {} or {} fields, found {}", RAW_HEADER.len(), RAW_HEADER.len() + STATISTICS_HEADER.len(), n),
                })
            }
        };

        let actions = str_to_actions(&record[6]).map_err(|err| TournamentError::Record {
            line,
            reason: err.to_string(),
        })?;

        let statistics = if with_statistics {
            let mut state_distribution = StateDistribution::default();
            for (offset, state) in State::ALL.into_iter().enumerate() {
                state_distribution.add(state, parse_field(record, 13 + offset, line)?);
            }
            Some(InteractionStatistics {
                score: parse_field(record, 7, line)?,
                score_difference: parse_field(record, 8, line)?,
                turns: parse_field(record, 9, line)?,
                score_per_turn: parse_field(record, 10, line)?,
                score_difference_per_turn: parse_field(record, 11, line)?,
                win: parse_field(record, 12, line)?,
                state_distribution,
            })
        } else {
            None
        };

        Ok(Self {
            interaction_index: parse_field(record, 0, line)?,
            player_index: parse_field(record, 1, line)?,
            opponent_index: parse_field(record, 2, line)?,
            repetition: parse_field(record, 3, line)?,
            player_name: record[4].to_string(),
            opponent_name: record[5].to_string(),
            actions,
            statistics,
        })
    }
}

fn parse_field<T>(record: &StringRecord, index: usize, line: u64) -> Result<T>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let raw = record.get(index).unwrap_or_default();
    raw.parse().map_err(|err| TournamentError::Record {
        line,
        reason: format!("{} = {:?}: {}", header(true)[index], raw, err),
    })
}

/// Somewhere to put interaction rows as pairings complete.
pub trait InteractionSink {
    fn write_interactions(&mut self, rows: &[InteractionRow]) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes rows as CSV, header first.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W, with_statistics: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(header(with_statistics))?;
        Ok(Self { writer })
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|err| TournamentError::Io(err.into_error()))
    }
}

impl CsvSink<File> {
    pub fn create(path: impl AsRef<Path>, with_statistics: bool) -> Result<Self> {
        Self::new(File::create(path)?, with_statistics)
    }
}

impl<W: Write> InteractionSink for CsvSink<W> {
    fn write_interactions(&mut self, rows: &[InteractionRow]) -> Result<()> {
        for row in rows {
            self.writer.write_record(row.to_record())?;
        }
        Ok(self.writer.flush()?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}

/// Keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<InteractionRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[InteractionRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<InteractionRow> {
        self.rows
    }
}

impl InteractionSink for MemorySink {
    fn write_interactions(&mut self, rows: &[InteractionRow]) -> Result<()> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }
}

/// Read every row of an interaction file.
pub fn read_interactions(path: impl AsRef<Path>) -> Result<Vec<InteractionRow>> {
    read_interactions_from(File::open(path)?)
}

pub fn read_interactions_from<R: Read>(reader: R) -> Result<Vec<InteractionRow>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let with_statistics = found.len() > RAW_HEADER.len();
    if found != header(with_statistics) {
        return Err(TournamentError::Record {
            line: 1,
            reason: format!("unrecognised header {:?}", found),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        rows.push(InteractionRow::from_record(&record, line)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamesim_match::{PayoffMatrix, StrategyConfig};
    use Action::{A, B};

    fn sample_row(statistics: bool) -> InteractionRow {
        InteractionRow {
            interaction_index: 4,
            player_index: 1,
            opponent_index: 2,
            repetition: 3,
            player_name: "Random: 0.5".to_string(),
            opponent_name: "Cycler, \"AB\"".to_string(),
            actions: vec![A, B, B],
            statistics: statistics.then(|| InteractionStatistics {
                score: 6.0,
                score_difference: 1.0,
                turns: 3,
                score_per_turn: 2.0,
                score_difference_per_turn: 1.0 / 3.0,
                win: 1,
                state_distribution: StateDistribution::from_counts(1, 0, 1, 1),
            }),
        }
    }

    #[test]
    fn test_header_columns() {
        assert_eq!(header(false).len(), 7);
        assert_eq!(header(true).len(), 17);
        assert_eq!(header(true)[13], "AA_count");
    }

    #[test]
    fn test_csv_sink_and_reader_agree() {
        for statistics in [false, true] {
            let mut sink = CsvSink::new(Vec::new(), statistics).unwrap();
            let rows = vec![sample_row(statistics), sample_row(statistics)];
            sink.write_interactions(&rows).unwrap();
            let bytes = sink.into_inner().unwrap();

            let text = String::from_utf8(bytes.clone()).unwrap();
            assert!(text.starts_with("interaction_index,player_index"));

            let read = read_interactions_from(bytes.as_slice()).unwrap();
            assert_eq!(read, rows);
        }
    }

    #[test]
    fn test_statistics_from_match() {
        let mut game = Match::new(
            (StrategyConfig::Cooperator.build(), StrategyConfig::Defector.build()),
            5,
            PayoffMatrix::default(),
        );
        game.play().unwrap();

        let cooperator = InteractionStatistics::from_match(&game, 0);
        assert_eq!(cooperator.score, 0.0);
        assert_eq!(cooperator.score_difference, -25.0);
        assert_eq!(cooperator.turns, 5);
        assert_eq!(cooperator.score_difference_per_turn, -5.0);
        assert_eq!(cooperator.win, 0);
        assert_eq!(cooperator.state_distribution.get(State::AB), 5);

        let defector = InteractionStatistics::from_match(&game, 1);
        assert_eq!(defector.score, 25.0);
        assert_eq!(defector.score_per_turn, 5.0);
        assert_eq!(defector.win, 1);
        assert_eq!(defector.state_distribution.get(State::BA), 5);
    }

    #[test]
    fn test_bad_action_is_reported_with_line() {
        let data = "interaction_index,player_index,opponent_index,repetition,player_name,opponent_name,action_history\n\
                    0,0,0,0,Cooperator,Cooperator,AA\n\
                    1,0,1,0,Cooperator,Defector,AX\n";
        match read_interactions_from(data.as_bytes()) {
            Err(TournamentError::Record { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected a record error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_is_reported() {
        let mut record = sample_row(true).to_record();
        record[9] = "three".to_string();
        let record = StringRecord::from(record);
        let err = InteractionRow::from_record(&record, 2).unwrap_err();
        assert!(err.to_string().contains("turns"));
    }

    #[test]
    fn test_unknown_header_rejected() {
        let data = "a,b,c\n1,2,3\n";
        assert!(matches!(read_interactions_from(data.as_bytes()), Err(TournamentError::Record { line: 1, .. })));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header(false).join(",")).unwrap();
        writeln!(file, "0,0,0,0,Defector,Defector,BBB").unwrap();
        file.flush().unwrap();

        let rows = read_interactions(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_self_interaction());
        assert_eq!(rows[0].actions, vec![B, B, B]);
        assert_eq!(rows[0].statistics, None);
    }

    #[test]
    fn test_csv_sink_rows_reach_file_per_write() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut sink = CsvSink::new(file.reopen().unwrap(), true).unwrap();
        sink.write_interactions(&[sample_row(true)]).unwrap();

        // Readable while the sink is still open
        let rows = read_interactions(file.path()).unwrap();
        assert_eq!(rows, vec![sample_row(true)]);

        sink.write_interactions(&[sample_row(true)]).unwrap();
        assert_eq!(read_interactions(file.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write_interactions(&[sample_row(false)]).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.rows().len(), 1);
        assert_eq!(sink.into_rows()[0].player_index, 1);
    }
}
