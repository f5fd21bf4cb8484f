//! Engine mutation seam used by the trial runner.

use crate::error::EngineError;
use crate::types::{Direction, GameStatus, GameTally};
use crate::world::WorldSnapshot;

/// A game engine the runner can drive.
///
/// Only the runner holds `&mut` access. Agents see the engine exclusively
/// through [`WorldSnapshot`].
///
/// # Tick Flow
///
/// ```text
/// Runner                      Engine                     Agent
///   |-- step(dt) -------------->|                          |
///   |-- &dyn WorldSnapshot -----|------------------------->|
///   |<---------------------------------------- decision ---|
///   |-- apply_move(dir) ------->|                          |
/// ```
pub trait GameEngine: WorldSnapshot {
    /// Advances the game by `dt` seconds of game time.
    ///
    /// # Returns
    /// * `Ok(())` - The tick completed (the game may now be over)
    /// * `Err(EngineError)` - Internal fault; the trial must be aborted
    fn step(&mut self, dt: f64) -> Result<(), EngineError>;

    /// Registers the direction Pac-Man should take at the next opportunity.
    fn apply_move(&mut self, direction: Direction);

    /// Returns whether the game is still running.
    fn status(&self) -> GameStatus;

    /// Returns the running counters.
    fn tally(&self) -> GameTally;

    /// Upcasts to the read-only view.
    fn as_world(&self) -> &dyn WorldSnapshot;
}
