//! Adversary behaviour: the scatter/chase schedule and per-adversary goals.
//!
//! # Goals
//!
//! ```text
//!   Blinky   Pac-Man's position
//!   Pinky    four tiles ahead of Pac-Man
//!   Inky     Blinky mirrored through the point two tiles ahead of Pac-Man
//!   Clyde    Pac-Man when more than eight tiles away, else its corner
//!   Scatter  the adversary's own maze corner
//!   Spawn    the home node
//! ```
//!
//! At each node an adversary takes the exit whose first step lands closest
//! to its goal and never reverses by choice. Frightened adversaries pick a
//! random exit instead.

use crate::maze::TILE;
use nalgebra::Vector2;
use pacman_env::{AdversaryId, Direction, Mode, Node, Position};
use rand::seq::SliceRandom;
use rand::Rng;

/// Seconds spent in each scatter phase.
pub const SCATTER_SECS: f64 = 7.0;

/// Seconds spent in each chase phase.
pub const CHASE_SECS: f64 = 20.0;

/// Seconds a power pellet keeps adversaries frightened.
pub const FREIGHT_SECS: f64 = 7.0;

/// Seconds after a (re)start before each adversary leaves home.
pub const RELEASE_SECS: [f64; 4] = [0.0, 2.0, 4.0, 6.0];

pub(crate) fn vec2(p: Position) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

pub(crate) fn position(v: Vector2<f64>) -> Position {
    Position::new(v.x, v.y)
}

pub(crate) fn heading(direction: Direction) -> Vector2<f64> {
    let (x, y) = direction.unit();
    Vector2::new(x, y)
}

/// Alternating scatter/chase schedule shared by all adversaries.
#[derive(Debug, Clone)]
pub struct ModeTimer {
    mode: Mode,
    remaining: f64,
}

impl Default for ModeTimer {
    fn default() -> Self {
        Self {
            mode: Mode::Scatter,
            remaining: SCATTER_SECS,
        }
    }
}

impl ModeTimer {
    /// The current global mode, `Scatter` or `Chase`.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Advances the schedule; returns true when the mode flipped.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return false;
        }
        let (mode, secs) = match self.mode {
            Mode::Scatter => (Mode::Chase, CHASE_SECS),
            _ => (Mode::Scatter, SCATTER_SECS),
        };
        self.mode = mode;
        self.remaining += secs;
        true
    }
}

/// Corner an adversary heads for while scattering.
pub fn scatter_corner(id: AdversaryId, extent: (f64, f64)) -> Vector2<f64> {
    let (w, h) = extent;
    match id {
        AdversaryId::Blinky => Vector2::new(w, 0.0),
        AdversaryId::Pinky => Vector2::new(0.0, 0.0),
        AdversaryId::Inky => Vector2::new(w, h),
        AdversaryId::Clyde => Vector2::new(0.0, h),
    }
}

/// Chase goal for one adversary.
///
/// # Arguments
/// * `id` - Which adversary
/// * `me` - The adversary's own position
/// * `pacman` - Pac-Man's position
/// * `pacman_dir` - Pac-Man's heading (`Stop` contributes no look-ahead)
/// * `blinky` - Blinky's position, used by Inky
/// * `corner` - The adversary's scatter corner, used by Clyde
pub fn chase_goal(
    id: AdversaryId,
    me: Vector2<f64>,
    pacman: Vector2<f64>,
    pacman_dir: Direction,
    blinky: Vector2<f64>,
    corner: Vector2<f64>,
) -> Vector2<f64> {
    let ahead = heading(pacman_dir);
    match id {
        AdversaryId::Blinky => pacman,
        AdversaryId::Pinky => pacman + ahead * (4.0 * TILE),
        AdversaryId::Inky => {
            let pivot = pacman + ahead * (2.0 * TILE);
            blinky + (pivot - blinky) * 2.0
        }
        AdversaryId::Clyde => {
            if (pacman - me).norm() > 8.0 * TILE {
                pacman
            } else {
                corner
            }
        }
    }
}

/// Exits an adversary may take at `node` when arriving with `arriving`.
///
/// Reversal is excluded unless it is the only way out.
pub fn exits(node: &Node, arriving: Direction) -> Vec<Direction> {
    let back = arriving.opposite();
    let forward: Vec<Direction> = node
        .neighbors()
        .map(|(dir, _)| dir)
        .filter(|&dir| arriving == Direction::Stop || dir != back)
        .collect();
    if forward.is_empty() && node.neighbor(back).is_some() {
        vec![back]
    } else {
        forward
    }
}

/// The exit whose first tile lies closest to `goal`. Ties keep enumeration
/// order.
pub fn steer(node: &Node, arriving: Direction, goal: Vector2<f64>) -> Direction {
    let origin = vec2(node.position);
    exits(node, arriving)
        .into_iter()
        .map(|dir| (dir, (origin + heading(dir) * TILE - goal).norm_squared()))
        .fold(None, |best: Option<(Direction, f64)>, (dir, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((dir, d)),
        })
        .map_or(Direction::Stop, |(dir, _)| dir)
}

/// A random exit, for frightened adversaries.
pub fn wander<R: Rng>(node: &Node, arriving: Direction, rng: &mut R) -> Direction {
    exits(node, arriving)
        .choose(rng)
        .copied()
        .unwrap_or(Direction::Stop)
}

/// Movement speed in pixels per second for a mode.
pub fn speed(mode: Mode) -> f64 {
    match mode {
        Mode::Scatter | Mode::Chase => 90.0,
        Mode::Freight => 50.0,
        Mode::Spawn => 150.0,
        Mode::Inactive => 0.0,
    }
}
