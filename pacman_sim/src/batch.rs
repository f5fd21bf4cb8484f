//! Batch runner - many independent trials on a bounded worker pool.
//!
//! # Execution
//!
//! ```text
//!   BatchRunner::run
//!     ├─ validate config, trial_count > 0
//!     ├─ rayon pool (N workers)
//!     │    └─ trial i: seed = base + i, fresh engine, fresh agent
//!     │         ├─ Ok(record)            ─▶ records
//!     │         └─ Engine / panic / cancel ─▶ aborted (excluded)
//!     └─ sort records by seed ─▶ PerformanceSummary
//! ```
//!
//! Records are sorted before aggregation, so the summary does not depend on
//! the order workers finish in.

use crate::config::TrialConfig;
use crate::engine::MazeEngine;
use crate::error::SimError;
use crate::maze::MazeLayout;
use crate::runner::{CancelToken, TrialRunner};

use pacman_core::{sort_records, AgentFactory, PerformanceSummary, TrialRecord};
use pacman_env::GameEngine;
use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A trial that produced no record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbortedTrial {
    pub seed: u64,
    pub reason: String,
}

/// Raw results of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResults {
    /// Completed trials, ordered by seed
    pub records: Vec<TrialRecord>,

    /// Trials excluded from the summary, ordered by seed
    pub aborted: Vec<AbortedTrial>,
}

impl BatchResults {
    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary::from_records(&self.records, self.aborted.len())
    }
}

/// Runs a fixed number of trials with the same configuration.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: TrialConfig,
    trial_count: usize,
    layout: Arc<MazeLayout>,
    threads: usize,
    progress: bool,
    cancel: CancelToken,
}

impl BatchRunner {
    /// Validates the configuration and trial count.
    ///
    /// # Errors
    /// `SimError::InvalidConfiguration` for a bad option or `trial_count == 0`.
    pub fn new(config: TrialConfig, trial_count: usize) -> Result<Self, SimError> {
        config.validate()?;
        if trial_count == 0 {
            return Err(SimError::invalid("trial_count", "must be at least 1"));
        }
        Ok(Self {
            config,
            trial_count,
            layout: Arc::new(MazeLayout::classic()),
            threads: 0,
            progress: false,
            cancel: CancelToken::new(),
        })
    }

    /// Worker count; 0 uses one per available core.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Logs each finished trial at `info`.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_layout(mut self, layout: Arc<MazeLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Overrides the base seed; trial `i` runs with `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    /// Runs every trial on the reference engine and aggregates the results.
    pub fn run<F: AgentFactory>(&self, factory: &F) -> Result<PerformanceSummary, SimError> {
        Ok(self.run_records(factory)?.summary())
    }

    /// Runs every trial on the reference engine and keeps the raw records.
    pub fn run_records<F: AgentFactory>(&self, factory: &F) -> Result<BatchResults, SimError> {
        let layout = &self.layout;
        let config = &self.config;
        self.run_with_engines(
            &|seed: u64| MazeEngine::new(Arc::clone(layout), config, seed),
            factory,
        )
    }

    /// Runs every trial on engines built by `engines`.
    ///
    /// # Arguments
    /// * `engines` - Builds a fresh engine for a trial seed
    /// * `agents` - Builds a fresh agent for a trial seed
    ///
    /// # Returns
    /// Records and aborted trials, both ordered by seed. Errors other than
    /// per-trial aborts fail the whole batch.
    pub fn run_with_engines<E, EF, F>(&self, engines: &EF, agents: &F) -> Result<BatchResults, SimError>
    where
        E: GameEngine,
        EF: Fn(u64) -> E + Sync,
        F: AgentFactory,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| SimError::invalid("threads", e.to_string()))?;

        info!(
            "Running {} trials on {} workers (base seed {})",
            self.trial_count,
            pool.current_num_threads(),
            self.config.seed
        );

        let finished = AtomicUsize::new(0);
        let outcomes: Vec<(u64, Result<TrialRecord, SimError>)> = pool.install(|| {
            (0..self.trial_count)
                .into_par_iter()
                .map(|index| {
                    let seed = self.config.seed.wrapping_add(index as u64);
                    let outcome = self.run_one(seed, engines, agents);

                    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    if self.progress {
                        match &outcome {
                            Ok(record) => info!(
                                "[{}/{}] seed={} {} score={}",
                                done,
                                self.trial_count,
                                seed,
                                record.termination(),
                                record.score()
                            ),
                            Err(e) => info!("[{}/{}] seed={} aborted: {}", done, self.trial_count, seed, e),
                        }
                    }
                    (seed, outcome)
                })
                .collect()
        });

        let mut records = Vec::with_capacity(outcomes.len());
        let mut aborted = Vec::new();
        for (seed, outcome) in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(e) if e.is_trial_abort() => {
                    warn!("trial seed={} excluded: {}", seed, e);
                    aborted.push(AbortedTrial {
                        seed,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        sort_records(&mut records);
        aborted.sort_by_key(|a| a.seed);

        debug!("{} trials completed, {} excluded", records.len(), aborted.len());
        Ok(BatchResults { records, aborted })
    }

    fn run_one<E, EF, F>(&self, seed: u64, engines: &EF, agents: &F) -> Result<TrialRecord, SimError>
    where
        E: GameEngine,
        EF: Fn(u64) -> E + Sync,
        F: AgentFactory,
    {
        if self.cancel.is_cancelled() {
            return Err(SimError::Cancelled);
        }
        let runner = TrialRunner::prepared(
            self.config.clone(),
            Arc::clone(&self.layout),
            self.cancel.clone(),
            seed,
        );

        panic::catch_unwind(AssertUnwindSafe(|| runner.run_with(engines(seed), agents.create(seed))))
            .unwrap_or_else(|payload| Err(SimError::Panicked(panic_message(payload))))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `trial_count` trials on the built-in maze and summarizes them.
///
/// # Errors
/// `SimError::InvalidConfiguration` before any trial starts.
pub fn run_batch<F: AgentFactory>(
    factory: &F,
    trial_count: usize,
    config: &TrialConfig,
) -> Result<PerformanceSummary, SimError> {
    BatchRunner::new(config.clone(), trial_count)?.run(factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fixtures::{FaultyEngine, Forfeiter, Panicker};
    use approx::assert_relative_eq;
    use pacman_core::{Agent, IdleAgent, RandomAgent};
    use pacman_env::TerminationReason;

    fn quick() -> TrialConfig {
        TrialConfig::headless().with_max_ticks(600)
    }

    #[test]
    fn test_surrender_batch() {
        let summary = run_batch(&|_| Forfeiter, 10, &quick()).unwrap();

        assert_eq!(summary.trials, 10);
        assert_eq!(summary.excluded, 0);
        assert_eq!(summary.wins, 0);
        assert_relative_eq!(summary.win_rate, 0.0);
        assert_relative_eq!(summary.mean_score, 0.0);
        assert_eq!(summary.terminations.get(&TerminationReason::Forfeit), Some(&10));
    }

    #[test]
    fn test_invalid_speed_spawns_nothing() {
        let built = AtomicUsize::new(0);
        let factory = |_seed: u64| {
            built.fetch_add(1, Ordering::SeqCst);
            IdleAgent
        };

        let err = run_batch(&factory, 5, &quick().with_speed(0.05)).unwrap_err();

        assert!(matches!(err, SimError::InvalidConfiguration { field: "speed", .. }));
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let err = run_batch(&|_| IdleAgent, 0, &quick()).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfiguration { field: "trial_count", .. }
        ));
    }

    #[test]
    fn test_fresh_agent_per_trial() {
        let built = AtomicUsize::new(0);
        let factory = |_seed: u64| {
            built.fetch_add(1, Ordering::SeqCst);
            Forfeiter
        };

        run_batch(&factory, 7, &quick()).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_seeds_follow_base() {
        let results = BatchRunner::new(quick(), 4)
            .unwrap()
            .with_seed(100)
            .run_records(&|_| Forfeiter)
            .unwrap();

        let seeds: Vec<u64> = results.records.iter().map(|r| r.seed()).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
    }

    #[test]
    fn test_summary_independent_of_worker_count() {
        let runner = BatchRunner::new(quick(), 8).unwrap();

        let serial = runner.clone().with_threads(1).run_records(&RandomAgent::new).unwrap();
        let parallel = runner.with_threads(4).run_records(&RandomAgent::new).unwrap();

        assert_eq!(serial.records, parallel.records);
        assert_eq!(serial.summary(), parallel.summary());
    }

    #[test]
    fn test_panicking_agent_is_excluded() {
        let factory = |seed: u64| -> Box<dyn Agent> {
            if seed % 2 == 1 {
                Box::new(Panicker)
            } else {
                Box::new(Forfeiter)
            }
        };

        let results = BatchRunner::new(quick().with_seed(0), 6)
            .unwrap()
            .with_threads(2)
            .run_records(&factory)
            .unwrap();

        assert_eq!(results.records.len(), 3);
        let aborted: Vec<u64> = results.aborted.iter().map(|a| a.seed).collect();
        assert_eq!(aborted, vec![1, 3, 5]);
        assert!(results.aborted[0].reason.contains("agent failure"));

        let summary = results.summary();
        assert_eq!(summary.trials, 3);
        assert_eq!(summary.excluded, 3);
    }

    #[test]
    fn test_engine_fault_is_excluded() {
        let config = quick().with_seed(0);
        let runner = BatchRunner::new(config.clone(), 6).unwrap();

        let results = runner
            .run_with_engines(
                &|seed| {
                    let fail_at = if seed % 3 == 0 { 5 } else { u64::MAX };
                    FaultyEngine::new(&config, seed, fail_at)
                },
                &|_| IdleAgent,
            )
            .unwrap();

        assert_eq!(results.records.len(), 4);
        assert_eq!(results.aborted.len(), 2);
        assert!(results.aborted.iter().all(|a| a.reason.contains("injected fault")));
    }

    #[test]
    fn test_cancelled_batch_excludes_everything() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let summary = BatchRunner::new(quick(), 3)
            .unwrap()
            .with_cancel_token(cancel)
            .run(&|_| IdleAgent)
            .unwrap();

        assert_eq!(summary.trials, 0);
        assert_eq!(summary.excluded, 3);
    }
}
