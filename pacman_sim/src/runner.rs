//! Trial runner - drives one game from start to termination.
//!
//! # State Machine
//!
//! ```text
//!   Initialized ──first tick──▶ Running ──game over / forfeit / tick cap──▶ Terminated
//!                                  │
//!                                  └── engine fault / cancellation ──▶ Err(SimError)
//! ```
//!
//! Each tick the engine steps first, then the agent looks at a fresh
//! `Observation` and decides, then the runner applies the decision. The
//! observation borrows the engine, so it cannot outlive the tick.

use crate::config::{TrialConfig, FRAME_DT};
use crate::engine::MazeEngine;
use crate::error::SimError;
use crate::maze::MazeLayout;
use crate::render::{FrameRenderer, FRAME_INTERVAL};

use pacman_core::{Agent, AgentFactory, Decision, Observation, TrialRecord};
use pacman_env::{GameEngine, GameStatus, TerminationReason};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared cancellation flag, checked between ticks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every trial holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    /// Engine and agent built, no tick run yet
    Initialized,
    /// At least one tick run, game still going
    Running,
    /// Finished for the given reason
    Terminated(TerminationReason),
}

/// One game in progress.
pub struct Trial<E: GameEngine, A: Agent> {
    engine: E,
    agent: A,
    state: TrialState,
    seed: u64,
    ticks: u64,
    game_time: f64,
    dt: f64,
    pace: Option<Duration>,
    max_ticks: u64,
    renderer: FrameRenderer,
    cancel: CancelToken,
}

impl<E: GameEngine, A: Agent> Trial<E, A> {
    /// Wraps a freshly built engine and agent.
    pub fn new(engine: E, agent: A, config: &TrialConfig, seed: u64, cancel: CancelToken) -> Self {
        let renderer = if config.disable_visuals {
            FrameRenderer::disabled()
        } else {
            FrameRenderer::new(FRAME_INTERVAL)
        };
        let pace = (!config.lock_delta_time).then(|| Duration::from_secs_f64(FRAME_DT));

        Self {
            engine,
            agent,
            state: TrialState::Initialized,
            seed,
            ticks: 0,
            game_time: 0.0,
            dt: config.tick_dt(),
            pace,
            max_ticks: config.max_ticks,
            renderer,
            cancel,
        }
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs one tick.
    ///
    /// # Returns
    /// * `Ok(state)` - State after the tick; a terminated trial is left as is
    /// * `Err(SimError::Engine)` - The engine faulted
    /// * `Err(SimError::Cancelled)` - The token fired
    pub fn tick(&mut self) -> Result<TrialState, SimError> {
        match self.state {
            TrialState::Terminated(_) => return Ok(self.state),
            TrialState::Initialized => {
                debug!("trial seed={} running with agent '{}'", self.seed, self.agent.name());
                self.state = TrialState::Running;
            }
            TrialState::Running => {}
        }

        if self.cancel.is_cancelled() {
            debug!("trial seed={} cancelled after {} ticks", self.seed, self.ticks);
            return Err(SimError::Cancelled);
        }

        if let Err(e) = self.engine.step(self.dt) {
            warn!("trial seed={} aborted at tick {}: {}", self.seed, self.ticks, e);
            return Err(e.into());
        }
        self.ticks += 1;
        self.game_time += self.dt;
        self.renderer.observe(self.ticks, self.engine.as_world());

        let mut reason = match self.engine.status() {
            GameStatus::Over(reason) => Some(reason),
            GameStatus::Running => {
                let observation = Observation::new(self.engine.as_world());
                match self.agent.next_move(&observation) {
                    Decision::Move(direction) => {
                        self.engine.apply_move(direction);
                        None
                    }
                    Decision::Continue => None,
                    Decision::Forfeit => Some(TerminationReason::Forfeit),
                }
            }
        };
        if reason.is_none() && self.max_ticks > 0 && self.ticks >= self.max_ticks {
            reason = Some(TerminationReason::TickLimit);
        }

        if let Some(reason) = reason {
            self.state = TrialState::Terminated(reason);
        } else if let Some(pace) = self.pace {
            std::thread::sleep(pace);
        }
        Ok(self.state)
    }

    /// Ticks until the trial terminates and returns its record.
    pub fn run_to_end(mut self) -> Result<TrialRecord, SimError> {
        loop {
            if let TrialState::Terminated(reason) = self.tick()? {
                let record = TrialRecord::new(
                    self.seed,
                    self.engine.tally(),
                    reason,
                    self.ticks,
                    self.game_time,
                );
                debug!(
                    "trial seed={} terminated: {} after {} ticks, score {}",
                    self.seed,
                    reason,
                    self.ticks,
                    record.score()
                );
                return Ok(record);
            }
        }
    }
}

/// Runs single trials against a validated configuration.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    config: TrialConfig,
    layout: Arc<MazeLayout>,
    cancel: CancelToken,
    seed: u64,
}

impl TrialRunner {
    /// Validates `config` and prepares a runner on the built-in maze.
    ///
    /// # Errors
    /// `SimError::InvalidConfiguration` before anything is constructed.
    pub fn new(config: TrialConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::prepared(
            config.clone(),
            Arc::new(MazeLayout::classic()),
            CancelToken::new(),
            config.seed,
        ))
    }

    /// Builds a runner from parts already checked by the caller.
    pub(crate) fn prepared(
        config: TrialConfig,
        layout: Arc<MazeLayout>,
        cancel: CancelToken,
        seed: u64,
    ) -> Self {
        Self {
            config,
            layout,
            cancel,
            seed,
        }
    }

    pub fn with_layout(mut self, layout: Arc<MazeLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Overrides the trial seed (defaults to the configuration's seed).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs one trial on the reference engine with a fresh agent.
    pub fn run<F: AgentFactory>(&self, factory: &F) -> Result<TrialRecord, SimError> {
        if self.cancel.is_cancelled() {
            return Err(SimError::Cancelled);
        }
        let engine = MazeEngine::new(Arc::clone(&self.layout), &self.config, self.seed);
        let agent = factory.create(self.seed);
        self.run_with(engine, agent)
    }

    /// Runs one trial on any engine.
    pub fn run_with<E: GameEngine, A: Agent>(&self, engine: E, agent: A) -> Result<TrialRecord, SimError> {
        Trial::new(engine, agent, &self.config, self.seed, self.cancel.clone()).run_to_end()
    }
}

/// Runs one trial to completion.
///
/// # Errors
/// * `SimError::InvalidConfiguration` - before any engine or agent exists
/// * `SimError::Engine` - the engine faulted mid-trial
pub fn run_trial<F: AgentFactory>(factory: &F, config: &TrialConfig) -> Result<TrialRecord, SimError> {
    TrialRunner::new(config.clone())?.run(factory)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use approx::assert_relative_eq;
    use pacman_core::{GreedyAgent, IdleAgent, Outcome, RandomAgent};
    use pacman_env::EngineError;
    use std::sync::atomic::AtomicUsize;

    fn quick() -> TrialConfig {
        TrialConfig::headless().with_max_ticks(3_000)
    }

    #[test]
    fn test_invalid_speed_builds_nothing() {
        let built = AtomicUsize::new(0);
        let factory = |_seed: u64| {
            built.fetch_add(1, Ordering::SeqCst);
            IdleAgent
        };

        let err = run_trial(&factory, &quick().with_speed(0.05)).unwrap_err();

        assert!(matches!(err, SimError::InvalidConfiguration { field: "speed", .. }));
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_forfeit_ends_on_first_tick() {
        let record = run_trial(&|_| Forfeiter, &quick()).unwrap();

        assert_eq!(record.termination(), TerminationReason::Forfeit);
        assert_eq!(record.outcome(), Outcome::Loss);
        assert_eq!(record.score(), 0);
        assert_eq!(record.ticks(), 1);
        assert_eq!(record.lives_remaining(), 3);
    }

    #[test]
    fn test_idle_without_ghosts_hits_tick_cap() {
        let config = quick().with_ghosts(false).with_max_ticks(200);
        let record = run_trial(&|_| IdleAgent, &config).unwrap();

        assert_eq!(record.termination(), TerminationReason::TickLimit);
        assert_eq!(record.ticks(), 200);
        assert_relative_eq!(record.game_time_secs(), 200.0 * FRAME_DT, epsilon = 1e-9);
    }

    #[test]
    fn test_idle_with_ghosts_loses_all_lives() {
        let layout = Arc::new(MazeLayout::parse("#######\n#S...G#\n#######").unwrap());
        let runner = TrialRunner::new(quick()).unwrap().with_layout(layout);

        let record = runner.run(&|_| IdleAgent).unwrap();

        assert_eq!(record.termination(), TerminationReason::LivesExhausted);
        assert_eq!(record.lives_remaining(), 0);
    }

    #[test]
    fn test_greedy_clears_small_maze() {
        let layout = Arc::new(MazeLayout::parse("#######\n#S...G#\n#######").unwrap());
        let runner = TrialRunner::new(quick().with_ghosts(false))
            .unwrap()
            .with_layout(layout);

        let record = runner.run(&|_| GreedyAgent).unwrap();

        assert_eq!(record.termination(), TerminationReason::LevelsCleared);
        assert_eq!(record.outcome(), Outcome::Win);
        assert_eq!(record.score(), 30);
        assert_eq!(record.level_reached(), 0);
    }

    #[test]
    fn test_greedy_clears_classic_maze_without_ghosts() {
        let config = quick().with_ghosts(false).with_max_ticks(20_000);
        let record = run_trial(&|_| GreedyAgent, &config).unwrap();

        assert_eq!(record.termination(), TerminationReason::LevelsCleared);
        assert_eq!(record.lives_remaining(), 3);
        assert_eq!(record.level_reached(), 0);
    }

    #[test]
    fn test_greedy_against_live_ghosts_makes_progress() {
        let config = quick().with_max_ticks(40_000);
        let record = run_trial(&|_| GreedyAgent, &config).unwrap();

        assert!(record.score() > 0);
        assert_ne!(record.termination(), TerminationReason::TickLimit);
    }

    #[test]
    fn test_same_seed_same_record() {
        let runner = TrialRunner::new(quick()).unwrap().with_seed(11);
        let a = runner.run(&RandomAgent::new).unwrap();
        let b = runner.run(&RandomAgent::new).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.seed(), 11);
    }

    #[test]
    fn test_engine_fault_aborts_trial() {
        let config = quick();
        let runner = TrialRunner::new(config.clone()).unwrap();

        let err = runner
            .run_with(FaultyEngine::new(&config, 1, 5), IdleAgent)
            .unwrap_err();

        assert!(matches!(err, SimError::Engine(EngineError::CorruptState(_))));
    }

    #[test]
    fn test_cancelled_before_run() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let runner = TrialRunner::new(quick()).unwrap().with_cancel_token(cancel);

        assert!(matches!(runner.run(&|_| IdleAgent), Err(SimError::Cancelled)));
    }

    #[test]
    fn test_cancelled_mid_trial() {
        struct CancelsLater(CancelToken, u32);

        impl Agent for CancelsLater {
            fn name(&self) -> &str {
                "cancels-later"
            }

            fn next_move(&mut self, _observation: &Observation<'_>) -> Decision {
                self.1 += 1;
                if self.1 == 10 {
                    self.0.cancel();
                }
                Decision::Continue
            }
        }

        let cancel = CancelToken::new();
        let runner = TrialRunner::new(quick()).unwrap().with_cancel_token(cancel.clone());
        let result = runner.run(&|_| CancelsLater(cancel.clone(), 0));

        assert!(matches!(result, Err(SimError::Cancelled)));
    }

    #[test]
    fn test_trial_state_transitions() {
        let config = quick();
        let engine = MazeEngine::new(Arc::new(MazeLayout::classic()), &config, 1);
        let mut trial = Trial::new(engine, Forfeiter, &config, 1, CancelToken::new());
        assert_eq!(trial.state(), TrialState::Initialized);

        let state = trial.tick().unwrap();
        assert_eq!(state, TrialState::Terminated(TerminationReason::Forfeit));

        trial.tick().unwrap();
        assert_eq!(trial.ticks(), 1);
    }

    #[test]
    fn test_unlocked_delta_time_scales_game_time() {
        let config = TrialConfig::headless()
            .with_lock_delta_time(false)
            .with_speed(2.0)
            .with_ghosts(false)
            .with_max_ticks(3);
        let record = run_trial(&|_| IdleAgent, &config).unwrap();

        assert_eq!(record.ticks(), 3);
        assert_relative_eq!(record.game_time_secs(), 3.0 * 2.0 * FRAME_DT, epsilon = 1e-9);
    }
}
