//! Pac-Man World Abstraction Layer
//!
//! This crate defines the read-only view of a maze-chase game that agents
//! reason over, and the narrow mutation seam a trial runner drives.
//!
//! # Core Concept: Explicit State Handles
//!
//! Agents never reach into engine internals or global state. Each tick the
//! runner lends the engine out as `&dyn WorldSnapshot`:
//! - **Reads**: positions, graph topology, pellets, adversaries
//! - **Writes**: only through [`GameEngine`], which only the runner holds
//!
//! # Example
//!
//! ```ignore
//! use pacman_env::{GameEngine, WorldSnapshot};
//!
//! fn tick<E: GameEngine>(engine: &mut E, dt: f64) -> Result<(), EngineError> {
//!     engine.step(dt)?;
//!     let world: &dyn WorldSnapshot = engine.as_world();
//!     println!("pacman at {}", world.pacman().position);
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod static_world;
mod types;
mod world;

pub use engine::GameEngine;
pub use error::{EngineError, EnvError};
pub use static_world::StaticWorld;
pub use types::{
    Adversary, AdversaryId, Direction, GameStatus, GameTally, Mode, Node, NodeId, PacmanState,
    Pellet, PelletKind, Position, TerminationReason,
};
pub use world::{has_overshot, WorldSnapshot};
