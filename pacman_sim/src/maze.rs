//! Maze layouts.
//!
//! A layout is a plain-text grid that becomes a node graph plus an initial
//! pellet set. The parsed layout is immutable and shared by every trial of a
//! batch through an `Arc`.
//!
//! # Format
//!
//! ```text
//!   #   wall                      .   path with pellet
//!   +   node with pellet          p   path with power pellet
//!   P   node with power pellet    -   path, no pellet
//!   n   node, no pellet           |   path, no pellet
//!   S   Pac-Man start node        G   adversary home node
//! ```
//!
//! Nodes link to the next node in each cardinal direction when only path
//! tiles lie between them. Every path tile must sit on such a link.

use pacman_env::{Direction, EnvError, Node, NodeId, Pellet, PelletKind, Position};
use std::collections::HashMap;

/// Tile edge length in pixels.
pub const TILE: f64 = 16.0;

const CLASSIC: &str = "\
###################
#P...+...+...+...P#
#.###.###.###.###.#
#.###.###.###.###.#
#+...+...+...+...+#
#.###.#######.###.#
#+...+...G...+...+#
#.###.#######.###.#
#+...+...S...+...+#
#.###.###.###.###.#
#.###.###.###.###.#
#P...+...+...+...P#
###################";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Node(Option<PelletKind>),
    Path(Option<PelletKind>),
}

impl Tile {
    fn is_path(self) -> bool {
        matches!(self, Tile::Path(_))
    }
}

/// A parsed maze: node graph, pellets, start and home nodes.
#[derive(Debug, Clone)]
pub struct MazeLayout {
    nodes: Vec<Node>,
    lookup: HashMap<(i64, i64), NodeId>,
    pellets: Vec<Pellet>,
    start: NodeId,
    home: NodeId,
    columns: usize,
    rows: usize,
}

impl MazeLayout {
    /// The built-in maze.
    pub fn classic() -> Self {
        Self::parse(CLASSIC).expect("built-in layout parses")
    }

    /// Parses a layout from text.
    ///
    /// # Errors
    /// `EnvError::Layout` for unknown characters, a blank row inside the grid,
    /// a missing or repeated start or home node, or a path tile that no link
    /// covers. Blank lines before and after the grid are ignored.
    pub fn parse(text: &str) -> Result<Self, EnvError> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        let first = lines.iter().position(|l| !l.trim().is_empty());
        let last = lines.iter().rposition(|l| !l.trim().is_empty());
        let lines = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => return Err(EnvError::layout("layout is empty")),
        };
        if let Some(row) = lines.iter().position(|l| l.trim().is_empty()) {
            return Err(EnvError::layout(format!(
                "blank line at row {} inside the layout",
                row
            )));
        }

        let rows = lines.len();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut grid = vec![vec![Tile::Wall; columns]; rows];
        let mut start = None;
        let mut home = None;

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                grid[row][col] = match ch {
                    '#' | ' ' => Tile::Wall,
                    '+' => Tile::Node(Some(PelletKind::Regular)),
                    'P' => Tile::Node(Some(PelletKind::Power)),
                    'n' => Tile::Node(None),
                    'S' => {
                        if start.replace((row, col)).is_some() {
                            return Err(EnvError::layout("more than one start node 'S'"));
                        }
                        Tile::Node(None)
                    }
                    'G' => {
                        if home.replace((row, col)).is_some() {
                            return Err(EnvError::layout("more than one home node 'G'"));
                        }
                        Tile::Node(None)
                    }
                    '.' => Tile::Path(Some(PelletKind::Regular)),
                    'p' => Tile::Path(Some(PelletKind::Power)),
                    '-' | '|' => Tile::Path(None),
                    other => {
                        return Err(EnvError::layout(format!(
                            "unknown tile '{}' at row {}, column {}",
                            other, row, col
                        )))
                    }
                };
            }
        }

        let start = start.ok_or_else(|| EnvError::layout("missing start node 'S'"))?;
        let home = home.ok_or_else(|| EnvError::layout("missing home node 'G'"))?;

        // Nodes in reading order.
        let mut ids: HashMap<(usize, usize), NodeId> = HashMap::new();
        let mut nodes = Vec::new();
        for (row, line) in grid.iter().enumerate() {
            for (col, tile) in line.iter().enumerate() {
                if let Tile::Node(_) = tile {
                    let id = NodeId(nodes.len());
                    ids.insert((row, col), id);
                    nodes.push(Node::new(id, tile_position(row, col)));
                }
            }
        }

        // Link right and down; mirror the link left and up.
        let mut covered = vec![vec![false; columns]; rows];
        for (&(row, col), &id) in &ids {
            for (dir, dr, dc) in [(Direction::Right, 0usize, 1usize), (Direction::Down, 1, 0)] {
                let (mut r, mut c) = (row + dr, col + dc);
                let mut corridor = Vec::new();
                while r < rows && c < columns && grid[r][c].is_path() {
                    corridor.push((r, c));
                    r += dr;
                    c += dc;
                }
                if r < rows && c < columns {
                    if let Some(&other) = ids.get(&(r, c)) {
                        nodes[id.index()].set_neighbor(dir, Some(other));
                        nodes[other.index()].set_neighbor(dir.opposite(), Some(id));
                        for (pr, pc) in corridor {
                            covered[pr][pc] = true;
                        }
                    }
                }
            }
        }

        let mut pellets = Vec::new();
        for (row, line) in grid.iter().enumerate() {
            for (col, tile) in line.iter().enumerate() {
                match *tile {
                    Tile::Path(_) if !covered[row][col] => {
                        return Err(EnvError::layout(format!(
                            "path tile at row {}, column {} is not between two nodes",
                            row, col
                        )))
                    }
                    Tile::Node(Some(kind)) | Tile::Path(Some(kind)) => {
                        pellets.push(Pellet::new(tile_position(row, col), kind));
                    }
                    _ => {}
                }
            }
        }

        let lookup = nodes.iter().map(|n| (n.cell(), n.id)).collect();

        Ok(Self {
            nodes,
            lookup,
            pellets,
            start: ids[&start],
            home: ids[&home],
            columns,
            rows,
        })
    }

    /// Reads and parses a layout file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::SimError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Exact-match node lookup by integer pixel coordinates.
    pub fn node_at_cell(&self, x: i64, y: i64) -> Option<&Node> {
        self.lookup.get(&(x, y)).map(|id| &self.nodes[id.index()])
    }

    /// The full pellet set at the start of a level.
    pub fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Where adversaries start and return to when eaten.
    pub fn home(&self) -> NodeId {
        self.home
    }

    /// Maze size in pixels.
    pub fn extent(&self) -> (f64, f64) {
        (self.columns as f64 * TILE, self.rows as f64 * TILE)
    }
}

fn tile_position(row: usize, col: usize) -> Position {
    Position::new(col as f64 * TILE, row as f64 * TILE)
}
