//! Sample agents.
//!
//! Three small policies used by the command line and by tests:
//!
//! | Agent    | Behaviour                                                   |
//! |----------|-------------------------------------------------------------|
//! | `idle`   | Never steers. Pac-Man stays wherever the engine leaves it.  |
//! | `random` | Picks a random legal move at every node.                    |
//! | `greedy` | Shortest graph path to the nearest pellet, avoiding threats |

use crate::agent::{Agent, Decision};
use crate::observation::Observation;
use pacman_env::{Direction, Node, Position};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Squared distance within which a dangerous adversary blocks a node.
const THREAT_RADIUS_SQ: f64 = 32.0 * 32.0;

/// Always continues.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleAgent;

impl Agent for IdleAgent {
    fn name(&self) -> &str {
        "idle"
    }

    fn next_move(&mut self, _observation: &Observation<'_>) -> Decision {
        Decision::Continue
    }
}

/// Picks a uniformly random legal move whenever Pac-Man sits on a node.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn next_move(&mut self, observation: &Observation<'_>) -> Decision {
        if observation.pacman_position() != observation.pacman_target_position() {
            return Decision::Continue;
        }

        match observation.legal_moves().choose(&mut self.rng) {
            Some(&direction) => Decision::Move(direction),
            None => Decision::Continue,
        }
    }
}

/// Heads for the nearest remaining pellet.
///
/// The agent runs a shortest-path search over the maze graph, skipping nodes
/// within two tiles of a dangerous adversary, and requests the first step of
/// the cheapest route to any pellet. At rest it plans from the node it sits
/// on. Between nodes it plans from the node ahead without turning back, so
/// the request is waiting when Pac-Man arrives there. It only turns back
/// mid-edge when the node ahead is threatened and the one behind is not.
/// With every route blocked it steps toward the safest open neighbour, or
/// holds still when there is none.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAgent;

impl GreedyAgent {
    /// First step of the cheapest safe route from `start` to a pellet.
    ///
    /// `banned` is never taken as the first step.
    fn route(
        &self,
        observation: &Observation<'_>,
        start: &Node,
        banned: Option<Direction>,
        threats: &[Position],
    ) -> Option<Direction> {
        let world = observation.world();
        let nodes = world.nodes();

        let mut pellets = observation.pellet_positions();
        pellets.extend(observation.power_pellet_positions());
        if pellets.is_empty() {
            return None;
        }

        let mut settled = vec![false; nodes.len()];
        settled[start.id.index()] = true;
        let mut frontier = BinaryHeap::new();
        let mut best: Option<(i64, Direction)> = None;

        let offer = |cost: i64, dir: Direction, best: &mut Option<(i64, Direction)>| {
            if best.map_or(true, |(c, _)| cost < c) {
                *best = Some((cost, dir));
            }
        };

        for (dir, id) in start.neighbors() {
            let next = world.node(id);
            if Some(dir) == banned || blocked(threats, next.position) {
                continue;
            }
            if let Some(offset) = nearest_on_segment(start.position, next.position, &pellets) {
                offer(offset, dir, &mut best);
            }
            frontier.push(Reverse((manhattan(start.position, next.position), id.index(), dir)));
        }

        while let Some(Reverse((cost, index, first))) = frontier.pop() {
            if settled[index] {
                continue;
            }
            settled[index] = true;
            if best.map_or(false, |(c, _)| cost >= c) {
                break;
            }

            let node = &nodes[index];
            for (_, id) in node.neighbors() {
                let next = world.node(id);
                if blocked(threats, next.position) {
                    continue;
                }
                if let Some(offset) = nearest_on_segment(node.position, next.position, &pellets) {
                    offer(cost + offset, first, &mut best);
                }
                if !settled[id.index()] {
                    let step = manhattan(node.position, next.position);
                    frontier.push(Reverse((cost + step, id.index(), first)));
                }
            }
        }

        best.map(|(_, dir)| dir)
    }

    fn at_node(&self, observation: &Observation<'_>, start: &Node, threats: &[Position]) -> Decision {
        match self.route(observation, start, None, threats) {
            Some(dir) => Decision::Move(dir),
            None => self.flee(start, observation, threats),
        }
    }

    /// Steps to the open neighbour furthest from every threat. Holds still
    /// when all neighbours are threatened or no threat exists.
    fn flee(&self, start: &Node, observation: &Observation<'_>, threats: &[Position]) -> Decision {
        if threats.is_empty() {
            return Decision::Move(Direction::Stop);
        }
        let world = observation.world();
        let clearance = |p: Position| {
            threats
                .iter()
                .map(|t| t.distance_squared(&p))
                .fold(f64::INFINITY, f64::min)
        };

        start
            .neighbors()
            .map(|(dir, id)| (dir, world.node(id).position))
            .filter(|&(_, p)| !blocked(threats, p))
            .map(|(dir, p)| (dir, clearance(p)))
            .fold(None, |best: Option<(Direction, f64)>, (dir, c)| match best {
                Some((_, bc)) if bc >= c => best,
                _ => Some((dir, c)),
            })
            .map_or(Decision::Move(Direction::Stop), |(dir, _)| Decision::Move(dir))
    }

    fn on_edge(&self, observation: &Observation<'_>, threats: &[Position]) -> Decision {
        let world = observation.world();
        let pacman = world.pacman();
        if pacman.direction == Direction::Stop {
            return Decision::Continue;
        }

        let ahead = world.node(pacman.target);
        let behind = world.node(pacman.origin).position;
        if blocked(threats, ahead.position) && !blocked(threats, behind) {
            return Decision::Move(pacman.direction.opposite());
        }

        let back = pacman.direction.opposite();
        let next = self
            .route(observation, ahead, Some(back), threats)
            .unwrap_or(pacman.direction);
        Decision::Move(next)
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        "greedy"
    }

    fn next_move(&mut self, observation: &Observation<'_>) -> Decision {
        let threats: Vec<Position> = observation
            .adversaries()
            .iter()
            .filter(|a| a.is_dangerous())
            .map(|a| a.position)
            .collect();

        let here = observation.pacman_position();
        if here != observation.pacman_target_position() {
            return self.on_edge(observation, &threats);
        }

        match observation.node_at(here) {
            Some(node) => self.at_node(observation, node, &threats),
            None => Decision::Continue,
        }
    }
}

fn blocked(threats: &[Position], p: Position) -> bool {
    threats.iter().any(|t| t.distance_squared(&p) < THREAT_RADIUS_SQ)
}

fn manhattan(a: Position, b: Position) -> i64 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()).round() as i64
}

/// Distance from `a` to the closest pellet lying on the axis-aligned segment `a..b`.
fn nearest_on_segment(a: Position, b: Position, pellets: &[Position]) -> Option<i64> {
    let on_segment = |p: &Position| {
        if (a.x - b.x).abs() < 0.5 {
            (p.x - a.x).abs() < 0.5 && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
        } else if (a.y - b.y).abs() < 0.5 {
            (p.y - a.y).abs() < 0.5 && p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x)
        } else {
            false
        }
    };

    pellets
        .iter()
        .filter(|p| on_segment(p))
        .map(|p| manhattan(a, *p))
        .min()
}

/// Named agent policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Idle,
    Random,
    Greedy,
}

impl AgentKind {
    /// Builds a fresh boxed agent for a trial seeded with `seed`.
    pub fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Idle => Box::new(IdleAgent),
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::Greedy => Box::new(GreedyAgent),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Idle => "idle",
            AgentKind::Random => "random",
            AgentKind::Greedy => "greedy",
        }
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(AgentKind::Idle),
            "random" => Ok(AgentKind::Random),
            "greedy" => Ok(AgentKind::Greedy),
            other => Err(format!("unknown agent '{}' (expected idle, random or greedy)", other)),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
