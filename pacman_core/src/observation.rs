//! Observation - the agent's window onto a live game.
//!
//! An `Observation` borrows one `&dyn WorldSnapshot` and derives every fact
//! from it on demand. It holds no copies, so a query always reflects the
//! state the engine had when the observation was created. Because the borrow
//! is shared, the engine cannot tick while an observation is alive.
//!
//! # Legal Moves
//!
//! ```text
//!   on node (position == target)     -> every direction with a neighbour
//!   x differs from target            -> [Left, Right]
//!   else y differs from target       -> [Up, Down]
//!   position == target, no node      -> []   (boundary, kept as is)
//! ```

use pacman_env::{
    Adversary, AdversaryId, Direction, EnvError, Mode, Node, PelletKind, Position, WorldSnapshot,
};

/// Read-only accessor bound to one game's live state.
#[derive(Clone, Copy)]
pub struct Observation<'a> {
    world: &'a dyn WorldSnapshot,
}

impl<'a> Observation<'a> {
    /// Binds an observation to a world.
    pub fn new(world: &'a dyn WorldSnapshot) -> Self {
        Self { world }
    }

    /// Returns the underlying snapshot.
    pub fn world(&self) -> &'a dyn WorldSnapshot {
        self.world
    }

    /// Returns the moves available to Pac-Man right now, in enumeration order.
    pub fn legal_moves(&self) -> Vec<Direction> {
        let position = self.pacman_position();
        let target = self.pacman_target_position();
        let mut moves = Vec::with_capacity(4);

        if position == target {
            if let Some(node) = self.node_at(position) {
                moves.extend(node.neighbors().map(|(dir, _)| dir));
            }
        }

        if position.x != target.x {
            moves.extend([Direction::Left, Direction::Right]);
        } else if position.y != target.y {
            moves.extend([Direction::Up, Direction::Down]);
        }

        moves
    }

    // ------------------------------------------------------------------
    // Pac-Man
    // ------------------------------------------------------------------

    /// Pac-Man's position.
    ///
    /// When the engine reports an overshoot this is the target node's
    /// position, since the engine is about to snap Pac-Man there. Otherwise
    /// it is the continuous position truncated to whole pixels.
    pub fn pacman_position(&self) -> Position {
        if self.world.pacman_overshot_target() {
            return self.pacman_target_position();
        }
        self.world.pacman().position.truncated()
    }

    /// Position of the node Pac-Man is moving toward.
    pub fn pacman_target_position(&self) -> Position {
        self.world.node(self.world.pacman().target).position
    }

    /// Pac-Man's current heading.
    pub fn pacman_direction(&self) -> Direction {
        self.world.pacman().direction
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Every node of the level.
    pub fn node_list(&self) -> Vec<&'a Node> {
        self.world.nodes().iter().collect()
    }

    /// The node at `position`, looked up by truncated integer coordinates.
    pub fn node_at(&self, position: Position) -> Option<&'a Node> {
        let (x, y) = position.cell();
        self.world.node_at_cell(x, y)
    }

    /// Existing neighbours of `node`, ordered up, down, left, right.
    pub fn neighbors_of(&self, node: &Node) -> Vec<&'a Node> {
        node.neighbors()
            .map(|(_, id)| self.world.node(id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Pellets
    // ------------------------------------------------------------------

    /// Positions of the regular pellets not yet eaten.
    pub fn pellet_positions(&self) -> Vec<Position> {
        self.uneaten(PelletKind::Regular)
    }

    /// Positions of the power pellets not yet eaten.
    pub fn power_pellet_positions(&self) -> Vec<Position> {
        self.uneaten(PelletKind::Power)
    }

    fn uneaten(&self, kind: PelletKind) -> Vec<Position> {
        self.world
            .pellets()
            .iter()
            .filter(|p| !p.eaten && p.kind == kind)
            .map(|p| p.position)
            .collect()
    }

    // ------------------------------------------------------------------
    // Adversaries
    // ------------------------------------------------------------------

    /// All four adversaries in enumeration order.
    pub fn adversaries(&self) -> [&'a Adversary; 4] {
        AdversaryId::ALL.map(|id| self.world.adversary(id))
    }

    /// One adversary by typed identifier.
    pub fn adversary(&self, id: AdversaryId) -> &'a Adversary {
        self.world.adversary(id)
    }

    /// One adversary by raw identifier.
    ///
    /// # Errors
    /// `EnvError::UnknownAdversary` when `raw` names none of the four.
    pub fn adversary_by_identifier(&self, raw: i64) -> Result<&'a Adversary, EnvError> {
        let id = AdversaryId::try_from(raw)?;
        Ok(self.world.adversary(id))
    }

    /// Current mode of every adversary, in enumeration order.
    pub fn adversary_modes(&self) -> Vec<Mode> {
        self.adversaries().iter().map(|a| a.mode).collect()
    }

    /// The mode held by the most adversaries.
    ///
    /// Ties go to the mode encountered first in enumeration order.
    pub fn common_adversary_mode(&self) -> Mode {
        let modes = self.adversary_modes();
        let mut counts: Vec<(Mode, usize)> = Vec::with_capacity(modes.len());

        for mode in modes {
            match counts.iter_mut().find(|(m, _)| *m == mode) {
                Some((_, count)) => *count += 1,
                None => counts.push((mode, 1)),
            }
        }

        let mut best = counts[0];
        for &(mode, count) in &counts[1..] {
            if count > best.1 {
                best = (mode, count);
            }
        }
        best.0
    }

    /// Adversary positions rounded to the nearest whole pixel.
    pub fn adversary_positions(&self) -> Vec<Position> {
        self.adversaries()
            .iter()
            .map(|a| a.position.rounded())
            .collect()
    }
}

impl std::fmt::Debug for Observation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observation")
            .field("pacman", &self.pacman_position())
            .field("target", &self.pacman_target_position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacman_env::{NodeId, PacmanState, Pellet, StaticWorld};
    use proptest::prelude::*;

    /// A plus-shaped graph:
    ///
    /// ```text
    ///         1 (48,16)
    ///         |
    /// 3 ---- 0 (48,48) ---- 4
    ///         |
    ///         2 (48,80)
    /// ```
    fn plus_graph() -> Vec<Node> {
        vec![
            Node::new(NodeId(0), Position::new(48.0, 48.0))
                .with_neighbor(Direction::Up, NodeId(1))
                .with_neighbor(Direction::Down, NodeId(2))
                .with_neighbor(Direction::Left, NodeId(3))
                .with_neighbor(Direction::Right, NodeId(4)),
            Node::new(NodeId(1), Position::new(48.0, 16.0))
                .with_neighbor(Direction::Down, NodeId(0)),
            Node::new(NodeId(2), Position::new(48.0, 80.0))
                .with_neighbor(Direction::Up, NodeId(0)),
            Node::new(NodeId(3), Position::new(16.0, 48.0))
                .with_neighbor(Direction::Right, NodeId(0)),
            Node::new(NodeId(4), Position::new(80.0, 48.0))
                .with_neighbor(Direction::Left, NodeId(0)),
        ]
    }

    fn world_at(pacman: PacmanState) -> StaticWorld {
        StaticWorld::new(plus_graph(), pacman, NodeId(0))
    }

    fn moving(position: Position, origin: usize, target: usize, direction: Direction) -> PacmanState {
        PacmanState {
            position,
            origin: NodeId(origin),
            target: NodeId(target),
            direction,
        }
    }

    #[test]
    fn test_legal_moves_on_junction() {
        let world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
        let obs = Observation::new(&world);

        assert_eq!(
            obs.legal_moves(),
            vec![Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        );
    }

    #[test]
    fn test_legal_moves_on_vertical_only_node() {
        let nodes = vec![
            Node::new(NodeId(0), Position::new(16.0, 48.0))
                .with_neighbor(Direction::Up, NodeId(1))
                .with_neighbor(Direction::Down, NodeId(2)),
            Node::new(NodeId(1), Position::new(16.0, 16.0)),
            Node::new(NodeId(2), Position::new(16.0, 80.0)),
        ];
        let world = StaticWorld::new(
            nodes,
            PacmanState::resting(NodeId(0), Position::new(16.0, 48.0)),
            NodeId(1),
        );

        assert_eq!(
            Observation::new(&world).legal_moves(),
            vec![Direction::Up, Direction::Down]
        );
    }

    #[test]
    fn test_legal_moves_mid_horizontal_corridor() {
        let world = world_at(moving(Position::new(60.3, 48.0), 0, 4, Direction::Right));
        assert_eq!(
            Observation::new(&world).legal_moves(),
            vec![Direction::Left, Direction::Right]
        );
    }

    #[test]
    fn test_legal_moves_mid_vertical_corridor() {
        let world = world_at(moving(Position::new(48.0, 30.2), 0, 1, Direction::Up));
        assert_eq!(
            Observation::new(&world).legal_moves(),
            vec![Direction::Up, Direction::Down]
        );
    }

    /// Delegates to a `StaticWorld` but has no node lookup table.
    struct Unindexed(StaticWorld);

    impl WorldSnapshot for Unindexed {
        fn pacman(&self) -> &PacmanState {
            self.0.pacman()
        }
        fn pacman_overshot_target(&self) -> bool {
            self.0.pacman_overshot_target()
        }
        fn nodes(&self) -> &[Node] {
            self.0.nodes()
        }
        fn node_at_cell(&self, _x: i64, _y: i64) -> Option<&Node> {
            None
        }
        fn pellets(&self) -> &[pacman_env::Pellet] {
            self.0.pellets()
        }
        fn adversary(&self, id: AdversaryId) -> &Adversary {
            self.0.adversary(id)
        }
    }

    #[test]
    fn test_legal_moves_empty_when_no_node_under_target() {
        let world = Unindexed(world_at(moving(
            Position::new(81.2, 48.0),
            0,
            4,
            Direction::Right,
        )));

        // Snapped onto the target, but the lookup finds nothing there, so
        // neither branch contributes a move.
        let obs = Observation::new(&world);
        assert_eq!(obs.pacman_position(), obs.pacman_target_position());
        assert!(obs.legal_moves().is_empty());
    }

    #[test]
    fn test_pacman_position_truncates() {
        let world = world_at(moving(Position::new(60.9, 48.0), 0, 4, Direction::Right));
        let obs = Observation::new(&world);

        assert_eq!(obs.pacman_position(), Position::new(60.0, 48.0));
        assert_eq!(obs.pacman_target_position(), Position::new(80.0, 48.0));
    }

    #[test]
    fn test_pacman_position_snaps_on_overshoot() {
        let world = world_at(moving(Position::new(82.4, 48.0), 0, 4, Direction::Right));
        let obs = Observation::new(&world);

        assert!(world.pacman_overshot_target());
        assert_eq!(obs.pacman_position(), Position::new(80.0, 48.0));
    }

    #[test]
    fn test_node_at_exact_and_missing() {
        let world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
        let obs = Observation::new(&world);

        assert_eq!(obs.node_at(Position::new(16.7, 48.2)).map(|n| n.id), Some(NodeId(3)));
        assert!(obs.node_at(Position::new(17.0, 48.0)).is_none());
        assert_eq!(obs.node_list().len(), 5);
    }

    #[test]
    fn test_neighbors_of_in_enumeration_order() {
        let world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
        let obs = Observation::new(&world);
        let center = world.node(NodeId(0));

        let ids: Vec<_> = obs.neighbors_of(center).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);

        let leaf = world.node(NodeId(3));
        assert_eq!(obs.neighbors_of(leaf).len(), 1);
    }

    #[test]
    fn test_pellet_queries_skip_eaten() {
        let mut eaten = Pellet::new(Position::new(32.0, 48.0), PelletKind::Regular);
        eaten.eaten = true;
        let world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)))
            .with_pellets(vec![
                Pellet::new(Position::new(16.0, 48.0), PelletKind::Regular),
                eaten,
                Pellet::new(Position::new(48.0, 16.0), PelletKind::Power),
                Pellet::new(Position::new(64.0, 48.0), PelletKind::Regular),
            ]);
        let obs = Observation::new(&world);

        assert_eq!(
            obs.pellet_positions(),
            vec![Position::new(16.0, 48.0), Position::new(64.0, 48.0)]
        );
        assert_eq!(obs.power_pellet_positions(), vec![Position::new(48.0, 16.0)]);
    }

    fn with_modes(modes: [Mode; 4]) -> StaticWorld {
        let mut world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
        for (id, mode) in AdversaryId::ALL.into_iter().zip(modes) {
            world.adversary_mut(id).mode = mode;
        }
        world
    }

    #[test]
    fn test_common_mode_tie_goes_to_first_encountered() {
        let world = with_modes([Mode::Chase, Mode::Chase, Mode::Scatter, Mode::Scatter]);
        assert_eq!(Observation::new(&world).common_adversary_mode(), Mode::Chase);

        let world = with_modes([Mode::Scatter, Mode::Chase, Mode::Chase, Mode::Scatter]);
        assert_eq!(Observation::new(&world).common_adversary_mode(), Mode::Scatter);
    }

    #[test]
    fn test_common_mode_plurality() {
        let world = with_modes([Mode::Freight, Mode::Spawn, Mode::Chase, Mode::Chase]);
        let obs = Observation::new(&world);

        assert_eq!(obs.common_adversary_mode(), Mode::Chase);
        assert_eq!(
            obs.adversary_modes(),
            vec![Mode::Freight, Mode::Spawn, Mode::Chase, Mode::Chase]
        );
    }

    #[test]
    fn test_adversary_positions_rounded() {
        let mut world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
        world.adversary_mut(AdversaryId::Inky).position = Position::new(20.6, 47.5);
        let obs = Observation::new(&world);

        assert_eq!(obs.adversary_positions()[2], Position::new(21.0, 48.0));
        assert_eq!(obs.adversary_positions()[0], Position::new(48.0, 48.0));
    }

    #[test]
    fn test_adversary_by_identifier() {
        let world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
        let obs = Observation::new(&world);

        let pinky = obs.adversary_by_identifier(5).unwrap();
        assert_eq!(pinky.id, AdversaryId::Pinky);

        let err = obs.adversary_by_identifier(9).unwrap_err();
        assert!(matches!(err, EnvError::UnknownAdversary(_)));
    }

    proptest! {
        #[test]
        fn prop_x_mismatch_means_horizontal(x in -500i64..500, y in -500i64..500) {
            prop_assume!(x != 80);
            let mut world = world_at(moving(Position::new(x as f64, y as f64), 0, 4, Direction::Right));
            world.set_overshoot(false);

            prop_assert_eq!(
                Observation::new(&world).legal_moves(),
                vec![Direction::Left, Direction::Right]
            );
        }

        #[test]
        fn prop_overshoot_reports_target(x in -500.0f64..500.0, y in -500.0f64..500.0) {
            let mut world = world_at(moving(Position::new(x, y), 0, 1, Direction::Up));
            world.set_overshoot(true);

            prop_assert_eq!(
                Observation::new(&world).pacman_position(),
                Position::new(48.0, 16.0)
            );
        }

        #[test]
        fn prop_node_at_absent_off_grid(x in -200.0f64..200.0, y in -200.0f64..200.0) {
            let world = world_at(PacmanState::resting(NodeId(0), Position::new(48.0, 48.0)));
            let cell = Position::new(x, y).cell();
            let is_node = world.nodes().iter().any(|n| n.cell() == cell);

            prop_assert_eq!(Observation::new(&world).node_at(Position::new(x, y)).is_some(), is_node);
        }
    }
}
