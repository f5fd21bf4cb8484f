//! Error types for the Pac-Man world abstraction.

use thiserror::Error;

/// Errors raised by world queries.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The identifier does not name one of the four adversaries.
    #[error("Unknown adversary: {0}")]
    UnknownAdversary(String),

    /// A maze layout could not be turned into a graph.
    #[error("Invalid layout: {0}")]
    Layout(String),
}

impl EnvError {
    /// Creates an unknown-adversary error.
    pub fn unknown_adversary(id: impl std::fmt::Display) -> Self {
        Self::UnknownAdversary(id.to_string())
    }

    /// Creates a layout error.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }
}

/// Faults raised by an engine while advancing a tick.
///
/// These abort the current trial only.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The tick length was zero, negative or not finite.
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f64),

    /// The engine's internal state no longer holds together.
    #[error("Corrupt engine state: {0}")]
    CorruptState(String),

    /// World query failure surfaced during a tick.
    #[error(transparent)]
    Env(#[from] EnvError),
}

impl EngineError {
    /// Creates a corrupt-state error.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptState(msg.into())
    }
}
