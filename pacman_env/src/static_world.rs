//! Owned, frozen implementation of `WorldSnapshot`.

use crate::types::{Adversary, AdversaryId, Node, NodeId, PacmanState, Pellet};
use crate::world::{has_overshot, WorldSnapshot};
use std::collections::HashMap;

/// A plain-data world snapshot.
///
/// Holds its own copy of the graph and every entity. Useful for keeping a past
/// state around after the engine has moved on, and for building fixtures.
#[derive(Debug, Clone)]
pub struct StaticWorld {
    nodes: Vec<Node>,
    lookup: HashMap<(i64, i64), NodeId>,
    pacman: PacmanState,
    overshot: bool,
    pellets: Vec<Pellet>,
    adversaries: [Adversary; 4],
}

impl StaticWorld {
    /// Creates a snapshot over `nodes`.
    ///
    /// Every adversary starts on `home`. The overshoot flag is derived from
    /// Pac-Man's origin, target and position.
    pub fn new(nodes: Vec<Node>, pacman: PacmanState, home: NodeId) -> Self {
        let lookup = nodes.iter().map(|n| (n.cell(), n.id)).collect();
        let home_pos = nodes[home.index()].position;
        let adversaries = AdversaryId::ALL.map(|id| Adversary::resting(id, home, home_pos));

        let mut world = Self {
            nodes,
            lookup,
            pacman,
            overshot: false,
            pellets: Vec::new(),
            adversaries,
        };
        world.overshot = world.derive_overshoot();
        world
    }

    /// Copies the current state of any world.
    pub fn capture(world: &dyn WorldSnapshot) -> Self {
        let nodes = world.nodes().to_vec();
        let lookup = nodes.iter().map(|n| (n.cell(), n.id)).collect();

        Self {
            nodes,
            lookup,
            pacman: world.pacman().clone(),
            overshot: world.pacman_overshot_target(),
            pellets: world.pellets().to_vec(),
            adversaries: AdversaryId::ALL.map(|id| world.adversary(id).clone()),
        }
    }

    /// Replaces the pellet list.
    pub fn with_pellets(mut self, pellets: Vec<Pellet>) -> Self {
        self.pellets = pellets;
        self
    }

    /// Moves Pac-Man and re-derives the overshoot flag.
    pub fn set_pacman(&mut self, pacman: PacmanState) {
        self.pacman = pacman;
        self.overshot = self.derive_overshoot();
    }

    /// Forces the overshoot flag, for engines that report it differently.
    pub fn set_overshoot(&mut self, overshot: bool) {
        self.overshot = overshot;
    }

    /// Mutable access to one adversary.
    pub fn adversary_mut(&mut self, id: AdversaryId) -> &mut Adversary {
        &mut self.adversaries[id.slot()]
    }

    /// Mutable access to the pellet list.
    pub fn pellets_mut(&mut self) -> &mut Vec<Pellet> {
        &mut self.pellets
    }

    fn derive_overshoot(&self) -> bool {
        let origin = self.nodes[self.pacman.origin.index()].position;
        let target = self.nodes[self.pacman.target.index()].position;
        has_overshot(origin, target, self.pacman.position)
    }
}

impl WorldSnapshot for StaticWorld {
    fn pacman(&self) -> &PacmanState {
        &self.pacman
    }

    fn pacman_overshot_target(&self) -> bool {
        self.overshot
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn node_at_cell(&self, x: i64, y: i64) -> Option<&Node> {
        self.lookup.get(&(x, y)).map(|id| &self.nodes[id.index()])
    }

    fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    fn adversary(&self, id: AdversaryId) -> &Adversary {
        &self.adversaries[id.slot()]
    }
}
