//! Trial configuration.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Nominal frame time in seconds (30 Hz).
pub const FRAME_DT: f64 = 1.0 / 30.0;

/// Slowest accepted speed multiplier.
pub const MIN_SPEED: f64 = 0.1;

/// Fastest accepted speed multiplier.
pub const MAX_SPEED: f64 = 5.0;

/// Options for a single trial. A batch applies the same options to every
/// trial it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Game-time multiplier per tick (0.1 ..= 5.0)
    pub speed: f64,

    /// Lives Pac-Man starts with
    pub start_lives: u32,

    /// Zero-based starting level
    pub start_level: u32,

    /// Adversaries move and collide
    pub ghosts_enabled: bool,

    /// Power pellets frighten adversaries
    pub freight_enabled: bool,

    /// Fixed frame time and no real-time pacing
    pub lock_delta_time: bool,

    /// Suppress ASCII frames in the debug log
    pub disable_visuals: bool,

    /// Tick cap (0 = unlimited)
    pub max_ticks: u64,

    /// Levels to clear for a win (0 = play until out of lives)
    pub levels_to_win: u32,

    /// Base seed for trial RNGs
    pub seed: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            start_lives: 3,
            start_level: 0,
            ghosts_enabled: true,
            freight_enabled: true,
            lock_delta_time: false,
            disable_visuals: false,
            max_ticks: 108_000,
            levels_to_win: 1,
            seed: 42,
        }
    }
}

impl TrialConfig {
    /// Settings for unattended batch runs: fixed frame time, no frames.
    pub fn headless() -> Self {
        Self {
            lock_delta_time: true,
            disable_visuals: true,
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.start_lives = lives;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.start_level = level;
        self
    }

    pub fn with_ghosts(mut self, enabled: bool) -> Self {
        self.ghosts_enabled = enabled;
        self
    }

    pub fn with_freight(mut self, enabled: bool) -> Self {
        self.freight_enabled = enabled;
        self
    }

    pub fn with_lock_delta_time(mut self, locked: bool) -> Self {
        self.lock_delta_time = locked;
        self
    }

    pub fn with_visuals(mut self, enabled: bool) -> Self {
        self.disable_visuals = !enabled;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_levels_to_win(mut self, levels: u32) -> Self {
        self.levels_to_win = levels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every option before anything is built.
    ///
    /// # Errors
    /// `SimError::InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        // NaN fails both comparisons, so test for containment.
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(SimError::invalid(
                "speed",
                format!(
                    "({}) must be between {} and {} (inclusive)",
                    self.speed, MIN_SPEED, MAX_SPEED
                ),
            ));
        }
        if self.start_lives == 0 {
            return Err(SimError::invalid("start_lives", "must be at least 1"));
        }
        Ok(())
    }

    /// Game time advanced per tick.
    pub fn tick_dt(&self) -> f64 {
        if self.lock_delta_time {
            FRAME_DT
        } else {
            FRAME_DT * self.speed
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        let config: TrialConfig = serde_json::from_str(&text)?;
        Ok(config)
    }
}
