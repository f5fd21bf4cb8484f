//! ASCII frames for the debug log.
//!
//! Frames are drawn from any `WorldSnapshot`, so they work for every engine.
//! Walls are whatever the node graph does not cover.
//!
//! # Glyphs
//!
//! - `#` wall, ` ` corridor, `.` pellet, `o` power pellet
//! - `C` Pac-Man
//! - `B` `P` `I` `K` adversaries; `f` frightened, `e` returning home
//!
//! Inactive adversaries are not drawn.

use crate::maze::TILE;
use pacman_env::{AdversaryId, Direction, Mode, PelletKind, Position, WorldSnapshot};
use tracing::debug;

/// Ticks between frames (one second of game time at 30 Hz).
pub const FRAME_INTERVAL: u64 = 30;

/// Emits ASCII frames at a fixed tick interval.
pub struct FrameRenderer {
    /// Whether frames are drawn at all
    enabled: bool,

    /// Ticks between frames
    interval: u64,
}

impl FrameRenderer {
    /// Creates a renderer that never draws.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            interval: FRAME_INTERVAL,
        }
    }

    /// Creates a renderer that draws every `interval` ticks.
    pub fn new(interval: u64) -> Self {
        Self {
            enabled: true,
            interval: interval.max(1),
        }
    }

    /// Returns whether frames are drawn.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a frame at `debug` when `tick` falls on the interval.
    pub fn observe(&self, tick: u64, world: &dyn WorldSnapshot) {
        if self.enabled && tick % self.interval == 0 {
            debug!("tick {}\n{}", tick, render_frame(world));
        }
    }
}

fn cell(p: Position) -> (i64, i64) {
    ((p.x / TILE).round() as i64, (p.y / TILE).round() as i64)
}

/// Draws the world as a grid of tiles.
pub fn render_frame(world: &dyn WorldSnapshot) -> String {
    let nodes = world.nodes();
    let (cols, rows) = nodes.iter().fold((0i64, 0i64), |(c, r), n| {
        let (x, y) = cell(n.position);
        (c.max(x + 2), r.max(y + 2))
    });
    let mut grid = vec![vec!['#'; cols.max(0) as usize]; rows.max(0) as usize];
    let mut put = |(x, y): (i64, i64), glyph: char| {
        if x >= 0 && y >= 0 && (y as usize) < grid.len() && (x as usize) < grid[y as usize].len() {
            grid[y as usize][x as usize] = glyph;
        }
    };

    for node in nodes {
        let from = cell(node.position);
        put(from, ' ');
        for (dir, id) in node.neighbors() {
            if !matches!(dir, Direction::Right | Direction::Down) {
                continue;
            }
            let to = cell(world.node(id).position);
            let (mut x, mut y) = from;
            while (x, y) != to && (x - from.0).abs() <= cols && (y - from.1).abs() <= rows {
                put((x, y), ' ');
                if dir == Direction::Right {
                    x += 1;
                } else {
                    y += 1;
                }
            }
            put(to, ' ');
        }
    }

    for pellet in world.pellets().iter().filter(|p| !p.eaten) {
        let glyph = match pellet.kind {
            PelletKind::Regular => '.',
            PelletKind::Power => 'o',
        };
        put(cell(pellet.position), glyph);
    }

    for id in AdversaryId::ALL {
        let adversary = world.adversary(id);
        if adversary.mode == Mode::Inactive {
            continue;
        }
        let glyph = match (adversary.mode, id) {
            (Mode::Freight, _) => 'f',
            (Mode::Spawn, _) => 'e',
            (_, AdversaryId::Blinky) => 'B',
            (_, AdversaryId::Pinky) => 'P',
            (_, AdversaryId::Inky) => 'I',
            (_, AdversaryId::Clyde) => 'K',
        };
        put(cell(adversary.position), glyph);
    }
    put(cell(world.pacman().position), 'C');

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
