//! Error type for trial execution.

use pacman_env::{EngineError, EnvError};
use thiserror::Error;

/// Everything that can stop a trial or a batch from producing results.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of range. Raised before any engine or
    /// agent is constructed.
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    /// The engine faulted during a tick. Aborts the current trial only.
    #[error("Engine fault: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Env(#[from] EnvError),

    /// The agent or engine panicked mid-trial.
    #[error("Trial panicked: {0}")]
    Panicked(String),

    /// The cancellation token fired before the trial finished.
    #[error("Trial cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Creates an invalid-configuration error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true for errors that abort a single trial but leave the batch
    /// intact.
    pub fn is_trial_abort(&self) -> bool {
        matches!(
            self,
            SimError::Engine(_) | SimError::Panicked(_) | SimError::Cancelled
        )
    }
}
