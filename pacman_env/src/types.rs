//! Common types for the Pac-Man world abstraction.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// A point in maze pixel space.
///
/// Entities move continuously, so coordinates are fractional. Nodes always
/// sit on whole-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Drops the fractional part of both coordinates (toward zero).
    pub fn truncated(&self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }

    /// Rounds both coordinates to the nearest integer, ties to even.
    pub fn rounded(&self) -> Self {
        Self::new(self.x.round_ties_even(), self.y.round_ties_even())
    }

    /// Integer lookup key for this position (truncated toward zero).
    pub fn cell(&self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }

    /// Returns the position `distance` pixels away in `direction`.
    pub fn offset(&self, direction: Direction, distance: f64) -> Self {
        let (dx, dy) = direction.unit();
        Self::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// Squared euclidean distance to another position.
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement direction.
///
/// The declaration order of the four cardinal variants is the enumeration
/// order used by every ordered query (up, down, left, right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Not moving.
    Stop,
}

impl Direction {
    /// The four moves, in enumeration order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the reverse direction. `Stop` is its own opposite.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Unit vector in screen coordinates (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Stop => (0.0, 0.0),
        }
    }

    /// Slot in a node's neighbour table, `None` for `Stop`.
    pub fn index(self) -> Option<usize> {
        match self {
            Direction::Up => Some(0),
            Direction::Down => Some(1),
            Direction::Left => Some(2),
            Direction::Right => Some(3),
            Direction::Stop => None,
        }
    }

    /// Returns true for horizontal moves.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// Index of a node inside a maze graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Returns the arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vertex of the maze graph.
///
/// Nodes sit on corners and junctions. Each cardinal direction maps to at
/// most one neighbouring node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    neighbors: [Option<NodeId>; 4],
}

impl Node {
    /// Creates an isolated node.
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            neighbors: [None; 4],
        }
    }

    /// Builder-style neighbour assignment.
    pub fn with_neighbor(mut self, direction: Direction, neighbor: NodeId) -> Self {
        self.set_neighbor(direction, Some(neighbor));
        self
    }

    /// Sets or clears the neighbour in `direction`. `Stop` is ignored.
    pub fn set_neighbor(&mut self, direction: Direction, neighbor: Option<NodeId>) {
        if let Some(slot) = direction.index() {
            self.neighbors[slot] = neighbor;
        }
    }

    /// Returns the neighbour in `direction`, if any.
    pub fn neighbor(&self, direction: Direction) -> Option<NodeId> {
        direction.index().and_then(|slot| self.neighbors[slot])
    }

    /// Iterates the existing neighbours in enumeration order.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
        Direction::CARDINAL
            .into_iter()
            .filter_map(move |dir| self.neighbor(dir).map(|id| (dir, id)))
    }

    /// Integer lookup key of this node.
    pub fn cell(&self) -> (i64, i64) {
        self.position.cell()
    }
}

/// Behaviour mode of an adversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Heading for a home corner.
    Scatter,
    /// Pursuing Pac-Man.
    Chase,
    /// Frightened by a power pellet.
    Freight,
    /// Eaten, returning to the spawn node.
    Spawn,
    /// Out of play: adversaries are disabled for this game.
    Inactive,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Scatter => "scatter",
            Mode::Chase => "chase",
            Mode::Freight => "freight",
            Mode::Spawn => "spawn",
            Mode::Inactive => "inactive",
        };
        f.write_str(name)
    }
}

/// Identifier of one of the four adversaries.
///
/// The declaration order is the stable enumeration order used by every
/// "all adversaries" query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdversaryId {
    /// Primary chaser: targets Pac-Man directly.
    Blinky,
    /// Ambusher: targets four tiles ahead of Pac-Man.
    Pinky,
    /// Erratic: mirrors Blinky around a point ahead of Pac-Man.
    Inky,
    /// Coordinated: chases from afar, retreats when close.
    Clyde,
}

impl AdversaryId {
    /// All adversaries in enumeration order.
    pub const ALL: [AdversaryId; 4] = [
        AdversaryId::Blinky,
        AdversaryId::Pinky,
        AdversaryId::Inky,
        AdversaryId::Clyde,
    ];

    /// Raw numeric identifier.
    pub fn raw(self) -> i64 {
        match self {
            AdversaryId::Blinky => 4,
            AdversaryId::Pinky => 5,
            AdversaryId::Inky => 6,
            AdversaryId::Clyde => 7,
        }
    }

    /// Position in the enumeration order.
    pub fn slot(self) -> usize {
        match self {
            AdversaryId::Blinky => 0,
            AdversaryId::Pinky => 1,
            AdversaryId::Inky => 2,
            AdversaryId::Clyde => 3,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            AdversaryId::Blinky => "blinky",
            AdversaryId::Pinky => "pinky",
            AdversaryId::Inky => "inky",
            AdversaryId::Clyde => "clyde",
        }
    }
}

impl TryFrom<i64> for AdversaryId {
    type Error = EnvError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        AdversaryId::ALL
            .into_iter()
            .find(|id| id.raw() == raw)
            .ok_or_else(|| EnvError::unknown_adversary(raw))
    }
}

impl std::str::FromStr for AdversaryId {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blinky" => Ok(AdversaryId::Blinky),
            "pinky" => Ok(AdversaryId::Pinky),
            "inky" => Ok(AdversaryId::Inky),
            "clyde" => Ok(AdversaryId::Clyde),
            _ => Err(EnvError::unknown_adversary(s)),
        }
    }
}

impl std::fmt::Display for AdversaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pellet variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PelletKind {
    Regular,
    /// Frightens the adversaries when eaten.
    Power,
}

/// A pellet lying in the maze.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pellet {
    pub position: Position,
    pub kind: PelletKind,
    pub eaten: bool,
}

impl Pellet {
    /// Creates an uneaten pellet.
    pub fn new(position: Position, kind: PelletKind) -> Self {
        Self {
            position,
            kind,
            eaten: false,
        }
    }

    /// Points awarded for eating this pellet.
    pub fn points(&self) -> u32 {
        match self.kind {
            PelletKind::Regular => 10,
            PelletKind::Power => 50,
        }
    }
}

/// Pac-Man's kinematic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacmanState {
    /// Continuous position.
    pub position: Position,
    /// Node the current edge starts from.
    pub origin: NodeId,
    /// Node Pac-Man is moving toward.
    pub target: NodeId,
    pub direction: Direction,
}

impl PacmanState {
    /// Pac-Man resting on `node` at `position`.
    pub fn resting(node: NodeId, position: Position) -> Self {
        Self {
            position,
            origin: node,
            target: node,
            direction: Direction::Stop,
        }
    }
}

/// One adversary's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adversary {
    pub id: AdversaryId,
    pub position: Position,
    pub origin: NodeId,
    pub target: NodeId,
    pub direction: Direction,
    pub mode: Mode,
}

impl Adversary {
    /// An adversary resting on `node` in scatter mode.
    pub fn resting(id: AdversaryId, node: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            origin: node,
            target: node,
            direction: Direction::Stop,
            mode: Mode::Scatter,
        }
    }

    /// Returns true when touching this adversary costs Pac-Man a life.
    pub fn is_dangerous(&self) -> bool {
        matches!(self.mode, Mode::Scatter | Mode::Chase)
    }
}

/// Why a trial stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Pac-Man ran out of lives.
    LivesExhausted,
    /// The required number of levels was cleared.
    LevelsCleared,
    /// The safety tick cap was reached.
    TickLimit,
    /// The agent resigned.
    Forfeit,
}

impl TerminationReason {
    /// Returns true when this reason counts as a win.
    pub fn is_win(&self) -> bool {
        matches!(self, TerminationReason::LevelsCleared)
    }

    /// Returns the reason name.
    pub fn name(&self) -> &'static str {
        match self {
            TerminationReason::LivesExhausted => "lives_exhausted",
            TerminationReason::LevelsCleared => "levels_cleared",
            TerminationReason::TickLimit => "tick_limit",
            TerminationReason::Forfeit => "forfeit",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine-reported game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over(TerminationReason),
}

impl GameStatus {
    /// Returns true once the game has ended.
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over(_))
    }
}

/// Running counters kept by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameTally {
    pub score: u32,
    pub lives: u32,
    /// Zero-based index of the level being played.
    pub level: u32,
    pub pellets_eaten: u32,
    pub adversaries_eaten: u32,
}
