//! Trial records and batch summaries.
//!
//! A [`TrialRecord`] is produced once per completed trial and never changes
//! afterwards. A [`PerformanceSummary`] folds many records into aggregate
//! figures. The fold sorts its inputs first, so the summary of a batch does
//! not depend on the order in which worker threads finished.

use pacman_env::{GameTally, TerminationReason};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a single trial from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

impl From<TerminationReason> for Outcome {
    fn from(reason: TerminationReason) -> Self {
        if reason.is_win() {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

/// The immutable result of one completed trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    seed: u64,
    score: u32,
    lives_remaining: u32,
    level_reached: u32,
    outcome: Outcome,
    termination: TerminationReason,
    ticks: u64,
    pellets_eaten: u32,
    adversaries_eaten: u32,
    game_time_secs: f64,
}

impl TrialRecord {
    /// Freezes the final counters of a trial.
    ///
    /// # Arguments
    /// * `seed` - The trial's RNG seed
    /// * `tally` - Engine counters at termination
    /// * `termination` - Why the trial stopped
    /// * `ticks` - Number of engine ticks executed
    /// * `game_time_secs` - Simulated seconds elapsed
    pub fn new(
        seed: u64,
        tally: GameTally,
        termination: TerminationReason,
        ticks: u64,
        game_time_secs: f64,
    ) -> Self {
        Self {
            seed,
            score: tally.score,
            lives_remaining: tally.lives,
            level_reached: tally.level,
            outcome: Outcome::from(termination),
            termination,
            ticks,
            pellets_eaten: tally.pellets_eaten,
            adversaries_eaten: tally.adversaries_eaten,
            game_time_secs,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    /// Zero-based index of the last level played.
    pub fn level_reached(&self) -> u32 {
        self.level_reached
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn termination(&self) -> TerminationReason {
        self.termination
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pellets_eaten(&self) -> u32 {
        self.pellets_eaten
    }

    pub fn adversaries_eaten(&self) -> u32 {
        self.adversaries_eaten
    }

    pub fn game_time_secs(&self) -> f64 {
        self.game_time_secs
    }

    /// Total ordering key used to make aggregation order-independent.
    fn sort_key(&self) -> (u64, u32, u64, TerminationReason, u32, u32) {
        (
            self.seed,
            self.score,
            self.ticks,
            self.termination,
            self.level_reached,
            self.lives_remaining,
        )
    }
}

/// Sorts records into their canonical order.
pub fn sort_records(records: &mut [TrialRecord]) {
    records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Aggregate performance over a batch of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Trials that produced a record.
    pub trials: usize,
    /// Trials aborted by an engine fault, a panic or cancellation.
    pub excluded: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub mean_score: f64,
    pub median_score: f64,
    /// Sample standard deviation; zero below two trials.
    pub score_std_dev: f64,
    pub min_score: u32,
    pub max_score: u32,
    pub mean_level_reached: f64,
    pub mean_ticks: f64,
    pub terminations: BTreeMap<TerminationReason, usize>,
}

impl PerformanceSummary {
    /// Folds completed records into a summary.
    ///
    /// With no records every statistic is zero.
    pub fn from_records(records: &[TrialRecord], excluded: usize) -> Self {
        let mut sorted = records.to_vec();
        sort_records(&mut sorted);

        let n = sorted.len();
        let mut terminations = BTreeMap::new();
        for record in &sorted {
            *terminations.entry(record.termination).or_insert(0) += 1;
        }

        if n == 0 {
            return Self {
                trials: 0,
                excluded,
                wins: 0,
                win_rate: 0.0,
                mean_score: 0.0,
                median_score: 0.0,
                score_std_dev: 0.0,
                min_score: 0,
                max_score: 0,
                mean_level_reached: 0.0,
                mean_ticks: 0.0,
                terminations,
            };
        }

        let mut scores: Vec<u32> = sorted.iter().map(|r| r.score).collect();
        scores.sort_unstable();

        let wins = sorted.iter().filter(|r| r.outcome == Outcome::Win).count();
        let score_sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        let level_sum: u64 = sorted.iter().map(|r| u64::from(r.level_reached)).sum();
        let tick_sum: u128 = sorted.iter().map(|r| u128::from(r.ticks)).sum();

        let mean_score = score_sum as f64 / n as f64;
        let median_score = if n % 2 == 1 {
            f64::from(scores[n / 2])
        } else {
            (f64::from(scores[n / 2 - 1]) + f64::from(scores[n / 2])) / 2.0
        };
        let score_std_dev = if n < 2 {
            0.0
        } else {
            let ss: f64 = scores
                .iter()
                .map(|&s| {
                    let d = f64::from(s) - mean_score;
                    d * d
                })
                .sum();
            (ss / (n - 1) as f64).sqrt()
        };

        Self {
            trials: n,
            excluded,
            wins,
            win_rate: wins as f64 / n as f64,
            mean_score,
            median_score,
            score_std_dev,
            min_score: scores[0],
            max_score: scores[n - 1],
            mean_level_reached: level_sum as f64 / n as f64,
            mean_ticks: tick_sum as f64 / n as f64,
            terminations,
        }
    }
}

impl std::fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Trials:        {} ({} excluded)", self.trials, self.excluded)?;
        writeln!(
            f,
            "Wins:          {} ({:.1}%)",
            self.wins,
            self.win_rate * 100.0
        )?;
        writeln!(
            f,
            "Score:         mean {:.1}, median {:.1}, std dev {:.1}, range {}..{}",
            self.mean_score, self.median_score, self.score_std_dev, self.min_score, self.max_score
        )?;
        writeln!(f, "Mean level:    {:.2}", self.mean_level_reached)?;
        writeln!(f, "Mean ticks:    {:.1}", self.mean_ticks)?;
        write!(f, "Terminations: ")?;
        for (reason, count) in &self.terminations {
            write!(f, " {}={}", reason, count)?;
        }
        Ok(())
    }
}
