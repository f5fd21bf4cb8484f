//! Pac-Man Core - Observation, Agents and Trial Statistics
//!
//! This library sits between a game engine and a decision-making agent:
//! 1. **Observation**: derived facts over a borrowed `WorldSnapshot`
//! 2. **Agent Contract**: one decision per tick, one fresh agent per trial
//! 3. **Statistics**: immutable trial records folded into a batch summary

pub mod agent;
pub mod agents;
pub mod observation;
pub mod stats;

// Re-export key types for convenience
pub use agent::{Agent, AgentFactory, Decision};
pub use agents::{AgentKind, GreedyAgent, IdleAgent, RandomAgent};
pub use observation::Observation;
pub use stats::{sort_records, Outcome, PerformanceSummary, TrialRecord};
