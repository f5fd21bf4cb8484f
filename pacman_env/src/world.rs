//! Read-only world snapshot trait.

use crate::types::{Adversary, AdversaryId, Node, NodeId, PacmanState, Pellet, Position};

/// The read-only view of a live game.
///
/// An engine hands `&dyn WorldSnapshot` to the observation layer each tick.
/// Nothing reachable through this trait can mutate the game.
///
/// # Implementations
///
/// - **Live**: the simulation engine, borrowed between ticks
/// - **Frozen**: [`StaticWorld`](crate::StaticWorld), an owned copy
pub trait WorldSnapshot {
    /// Returns Pac-Man's kinematic state.
    fn pacman(&self) -> &PacmanState;

    /// Returns true when Pac-Man's continuous position has moved past its
    /// target node during the current tick and has not been snapped yet.
    ///
    /// A stationary Pac-Man resting on a node also reports true, because
    /// origin, target and position coincide.
    fn pacman_overshot_target(&self) -> bool;

    /// Returns every node of the maze graph, indexed by `NodeId`.
    fn nodes(&self) -> &[Node];

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// When `id` was not produced by this world's graph.
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes()[id.index()]
    }

    /// Exact-match lookup of a node by integer coordinates.
    fn node_at_cell(&self, x: i64, y: i64) -> Option<&Node>;

    /// Returns all pellets, eaten ones included, in snapshot order.
    fn pellets(&self) -> &[Pellet];

    /// Returns one adversary.
    fn adversary(&self, id: AdversaryId) -> &Adversary;
}

/// Overshoot test shared by engines and snapshots.
///
/// An entity travelling from `origin` toward `target` has overshot once its
/// distance from `origin` is at least the length of the edge.
pub fn has_overshot(origin: Position, target: Position, position: Position) -> bool {
    let edge = origin.distance_squared(&target);
    let travelled = origin.distance_squared(&position);
    travelled >= edge
}
