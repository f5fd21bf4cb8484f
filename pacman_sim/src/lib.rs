//! Pac-Man Trial Harness
//!
//! This crate runs agents against a headless maze engine and measures them.
//!
//! # Core Principle: Isolated Trials
//!
//! Every trial owns its own engine and agent, built fresh from the trial
//! seed. Nothing is shared between trials except the immutable maze layout:
//! - **Engine**: deterministic for a given seed and configuration
//! - **Agent**: built by an `AgentFactory` inside the worker that runs it
//! - **Results**: immutable `TrialRecord`s, sorted before aggregation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        BatchRunner                          │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ rayon::ThreadPool (bounded workers)                  │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │                        │                            │
//! │  ┌────▼────────┐          ┌────▼────────┐                   │
//! │  │ TrialRunner │          │ TrialRunner │     ...           │
//! │  │  engine     │          │  engine     │                   │
//! │  │  agent      │          │  agent      │                   │
//! │  └─────────────┘          └─────────────┘                   │
//! │       │                        │                            │
//! │  ┌────▼────────────────────────▼────┐                       │
//! │  │        PerformanceSummary        │                       │
//! │  └──────────────────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pacman_core::GreedyAgent;
//! use pacman_sim::{run_batch, TrialConfig};
//!
//! let config = TrialConfig::headless().with_seed(7);
//! let summary = run_batch(&|_seed| GreedyAgent, 100, &config)?;
//! println!("{}", summary);
//! ```

mod batch;
mod config;
mod engine;
mod error;
mod exporter;
mod ghost;
mod maze;
mod render;
mod runner;

pub use batch::{run_batch, AbortedTrial, BatchResults, BatchRunner};
pub use config::{TrialConfig, FRAME_DT, MAX_SPEED, MIN_SPEED};
pub use engine::MazeEngine;
pub use error::SimError;
pub use exporter::BatchExport;
pub use ghost::{ModeTimer, CHASE_SECS, FREIGHT_SECS, SCATTER_SECS};
pub use maze::{MazeLayout, TILE};
pub use render::{render_frame, FrameRenderer, FRAME_INTERVAL};
pub use runner::{run_trial, CancelToken, Trial, TrialRunner, TrialState};
