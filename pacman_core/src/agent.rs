//! Agent contract.
//!
//! An agent is consulted once per tick with a fresh [`Observation`] and
//! answers with a [`Decision`]. Agents keep whatever private state they like
//! between ticks, but they never see the engine itself.

use crate::observation::Observation;
use pacman_env::Direction;

/// What an agent wants Pac-Man to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request a direction. Applied at the next opportunity.
    Move(Direction),
    /// Keep the current heading.
    Continue,
    /// Give up. The runner ends the trial immediately.
    Forfeit,
}

/// A decision-maker controlling Pac-Man.
pub trait Agent {
    /// Human-readable name, used in logs and exports.
    fn name(&self) -> &str;

    /// Chooses the next action.
    ///
    /// # Arguments
    /// * `observation` - Read-only view of the game after this tick's step
    ///
    /// # Returns
    /// The decision the runner applies before the next tick.
    fn next_move(&mut self, observation: &Observation<'_>) -> Decision;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn next_move(&mut self, observation: &Observation<'_>) -> Decision {
        (**self).next_move(observation)
    }
}

/// Builds one fresh agent per trial.
///
/// Shared across worker threads, so it must be `Sync`. The seed passed in is
/// the trial's own seed; stochastic agents should derive their RNG from it so
/// a batch is reproducible.
pub trait AgentFactory: Sync {
    type Agent: Agent;

    /// Creates an agent for the trial seeded with `seed`.
    fn create(&self, seed: u64) -> Self::Agent;
}

impl<F, A> AgentFactory for F
where
    F: Fn(u64) -> A + Sync,
    A: Agent,
{
    type Agent = A;

    fn create(&self, seed: u64) -> A {
        self(seed)
    }
}
