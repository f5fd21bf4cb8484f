//! Reference maze engine.
//!
//! A headless, deterministic implementation of [`GameEngine`] over a shared
//! [`MazeLayout`]. Every entity moves along graph edges; arriving at a node
//! snaps the entity onto it before the next edge is chosen.
//!
//! # Tick Structure
//!
//! ```text
//! step(dt)
//!   └─ split into strides of at most MAX_STRIDE pixels
//!        ├─ mode schedule / freight countdown
//!        ├─ Pac-Man moves, eats pellets  ── level cleared? ─▶ next level / win
//!        ├─ adversaries move
//!        └─ collisions ── frightened: eaten ─▶ spawn
//!                       └ dangerous: life lost ─▶ reset / game over
//! ```

use crate::config::TrialConfig;
use crate::ghost::{
    chase_goal, heading, position, scatter_corner, speed, steer, vec2, wander, ModeTimer,
    FREIGHT_SECS, RELEASE_SECS,
};
use crate::maze::MazeLayout;

use pacman_env::{
    has_overshot, Adversary, AdversaryId, Direction, EngineError, GameEngine, GameStatus,
    GameTally, Mode, Node, NodeId, PacmanState, Pellet, PelletKind, TerminationReason,
    WorldSnapshot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::debug;

/// Pac-Man's speed in pixels per second.
const PACMAN_SPEED: f64 = 100.0;

/// Fastest any entity moves, used to size strides.
const TOP_SPEED: f64 = 150.0 * 1.5;

/// Longest distance an entity covers in one stride.
const MAX_STRIDE: f64 = 4.0;

/// Longest tick the engine accepts, in seconds.
const MAX_DT: f64 = 1.0;

/// Pac-Man and an adversary touch within this squared distance.
const CATCH_RADIUS_SQ: f64 = 10.0 * 10.0;

/// Pac-Man eats a pellet within this squared distance.
const EAT_RADIUS_SQ: f64 = 7.0 * 7.0;

/// Points for consecutive adversaries eaten during one freight period.
const ADVERSARY_POINTS: [u32; 4] = [200, 400, 800, 1600];

/// Headless maze engine.
pub struct MazeEngine {
    layout: Arc<MazeLayout>,
    ghosts_enabled: bool,
    freight_enabled: bool,
    levels_to_win: u32,

    pacman: PacmanState,
    desired: Direction,
    pellets: Vec<Pellet>,
    adversaries: [Adversary; 4],
    released: [bool; 4],

    timer: ModeTimer,
    freight_left: f64,
    combo: usize,
    since_reset: f64,
    levels_cleared: u32,

    rng: ChaCha8Rng,
    tally: GameTally,
    status: GameStatus,
}

impl MazeEngine {
    /// Creates an engine at the start of a game.
    ///
    /// # Arguments
    /// * `layout` - Shared maze
    /// * `config` - Lives, level, and feature toggles
    /// * `seed` - Seeds frightened-adversary movement
    pub fn new(layout: Arc<MazeLayout>, config: &TrialConfig, seed: u64) -> Self {
        let start = layout.start();
        let pacman = PacmanState::resting(start, layout.node(start).position);
        let adversaries = home_adversaries(&layout, config.ghosts_enabled);
        let pellets = layout.pellets().to_vec();

        Self {
            ghosts_enabled: config.ghosts_enabled,
            freight_enabled: config.freight_enabled,
            levels_to_win: config.levels_to_win,
            pacman,
            desired: Direction::Stop,
            pellets,
            adversaries,
            released: [false; 4],
            timer: ModeTimer::default(),
            freight_left: 0.0,
            combo: 0,
            since_reset: 0.0,
            levels_cleared: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tally: GameTally {
                score: 0,
                lives: config.start_lives,
                level: config.start_level,
                pellets_eaten: 0,
                adversaries_eaten: 0,
            },
            status: GameStatus::Running,
            layout,
        }
    }

    /// The layout this engine plays on.
    pub fn layout(&self) -> &Arc<MazeLayout> {
        &self.layout
    }

    /// The direction Pac-Man will take at the next opportunity.
    pub fn desired_direction(&self) -> Direction {
        self.desired
    }

    fn advance(&mut self, dt: f64) {
        self.since_reset += dt;
        self.update_modes(dt);

        self.move_pacman(dt);
        self.eat_pellets();
        if self.status.is_over() {
            return;
        }

        if self.ghosts_enabled {
            self.move_adversaries(dt);
            self.resolve_collisions();
        }
    }

    fn update_modes(&mut self, dt: f64) {
        if self.freight_left > 0.0 {
            self.freight_left -= dt;
            if self.freight_left <= 0.0 {
                self.freight_left = 0.0;
                let mode = self.timer.mode();
                for ghost in self.adversaries.iter_mut().filter(|g| g.mode == Mode::Freight) {
                    ghost.mode = mode;
                }
            }
        } else if self.timer.advance(dt) {
            let mode = self.timer.mode();
            debug!("adversaries switch to {}", mode);
            for ghost in self.adversaries.iter_mut() {
                if matches!(ghost.mode, Mode::Scatter | Mode::Chase) {
                    ghost.mode = mode;
                    reverse(ghost);
                }
            }
        }
    }

    fn move_pacman(&mut self, dt: f64) {
        let desired = self.desired;
        let p = &mut self.pacman;

        if p.direction != Direction::Stop && desired == p.direction.opposite() {
            std::mem::swap(&mut p.origin, &mut p.target);
            p.direction = desired;
        }

        let mut walker = Walker {
            position: &mut p.position,
            origin: &mut p.origin,
            target: &mut p.target,
            direction: &mut p.direction,
        };
        walker.travel(self.layout.nodes(), PACMAN_SPEED * dt, |node, heading| {
            if node.neighbor(desired).is_some() {
                desired
            } else {
                heading
            }
        });
    }

    fn eat_pellets(&mut self) {
        let at = self.pacman.position;
        let mut powered = false;

        for pellet in self.pellets.iter_mut().filter(|p| !p.eaten) {
            if pellet.position.distance_squared(&at) <= EAT_RADIUS_SQ {
                pellet.eaten = true;
                self.tally.score += pellet.points();
                self.tally.pellets_eaten += 1;
                powered |= pellet.kind == PelletKind::Power;
            }
        }

        if powered && self.freight_enabled {
            self.frighten();
        }
        if self.pellets.iter().all(|p| p.eaten) {
            self.clear_level();
        }
    }

    fn frighten(&mut self) {
        self.freight_left = FREIGHT_SECS;
        self.combo = 0;
        for ghost in self
            .adversaries
            .iter_mut()
            .filter(|g| !matches!(g.mode, Mode::Spawn | Mode::Inactive))
        {
            if ghost.mode != Mode::Freight {
                reverse(ghost);
            }
            ghost.mode = Mode::Freight;
        }
    }

    fn clear_level(&mut self) {
        self.levels_cleared += 1;
        debug!(
            "level {} cleared ({} of {})",
            self.tally.level, self.levels_cleared, self.levels_to_win
        );

        if self.levels_to_win > 0 && self.levels_cleared >= self.levels_to_win {
            self.status = GameStatus::Over(TerminationReason::LevelsCleared);
            return;
        }
        self.tally.level += 1;
        self.pellets = self.layout.pellets().to_vec();
        self.reset_positions();
    }

    fn move_adversaries(&mut self, dt: f64) {
        let layout = Arc::clone(&self.layout);
        let home = layout.home();
        let home_pos = vec2(layout.node(home).position);
        let extent = layout.extent();
        let pacman = vec2(self.pacman.position);
        let pacman_dir = self.pacman.direction;
        let blinky = vec2(self.adversaries[AdversaryId::Blinky.slot()].position);
        let global = self.timer.mode();
        let pace = 1.0 + 0.05 * f64::from(self.tally.level.min(10));

        for (slot, ghost) in self.adversaries.iter_mut().enumerate() {
            if !self.released[slot] {
                if self.since_reset < RELEASE_SECS[slot] {
                    continue;
                }
                self.released[slot] = true;
            }

            let corner = scatter_corner(ghost.id, extent);
            let mode = ghost.mode;
            let goal = match mode {
                Mode::Scatter => corner,
                Mode::Chase => {
                    chase_goal(ghost.id, vec2(ghost.position), pacman, pacman_dir, blinky, corner)
                }
                Mode::Freight | Mode::Spawn | Mode::Inactive => home_pos,
            };

            let rng = &mut self.rng;
            let mut home_again = false;
            let mut walker = Walker {
                position: &mut ghost.position,
                origin: &mut ghost.origin,
                target: &mut ghost.target,
                direction: &mut ghost.direction,
            };
            walker.travel(layout.nodes(), speed(mode) * pace * dt, |node, heading| {
                if mode == Mode::Spawn && node.id == home {
                    home_again = true;
                }
                match mode {
                    Mode::Freight => wander(node, heading, rng),
                    _ => steer(node, heading, goal),
                }
            });

            if home_again {
                ghost.mode = global;
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let at = self.pacman.position;
        for slot in 0..self.adversaries.len() {
            let ghost = &mut self.adversaries[slot];
            if ghost.position.distance_squared(&at) >= CATCH_RADIUS_SQ {
                continue;
            }
            match ghost.mode {
                Mode::Freight => {
                    let points = ADVERSARY_POINTS[self.combo.min(ADVERSARY_POINTS.len() - 1)];
                    self.combo += 1;
                    self.tally.score += points;
                    self.tally.adversaries_eaten += 1;
                    ghost.mode = Mode::Spawn;
                    debug!("{} eaten for {} points", ghost.id, points);
                }
                Mode::Spawn | Mode::Inactive => {}
                Mode::Scatter | Mode::Chase => {
                    debug!("caught by {}", ghost.id);
                    self.lose_life();
                    return;
                }
            }
        }
    }

    fn lose_life(&mut self) {
        self.tally.lives = self.tally.lives.saturating_sub(1);
        if self.tally.lives == 0 {
            self.status = GameStatus::Over(TerminationReason::LivesExhausted);
        } else {
            self.reset_positions();
        }
    }

    fn reset_positions(&mut self) {
        let start = self.layout.start();

        self.pacman = PacmanState::resting(start, self.layout.node(start).position);
        self.desired = Direction::Stop;
        self.adversaries = home_adversaries(&self.layout, self.ghosts_enabled);
        self.released = [false; 4];
        self.timer = ModeTimer::default();
        self.freight_left = 0.0;
        self.combo = 0;
        self.since_reset = 0.0;
    }

    fn check_integrity(&self) -> Result<(), EngineError> {
        let count = self.layout.nodes().len();
        let p = &self.pacman;
        if p.origin.index() >= count || p.target.index() >= count {
            return Err(EngineError::corrupt("pacman references a missing node"));
        }
        if !(p.position.x.is_finite() && p.position.y.is_finite()) {
            return Err(EngineError::corrupt(format!(
                "pacman position is not finite: {}",
                p.position
            )));
        }
        Ok(())
    }
}

/// Mutable kinematic state of one entity, borrowed for a move.
struct Walker<'a> {
    position: &'a mut pacman_env::Position,
    origin: &'a mut NodeId,
    target: &'a mut NodeId,
    direction: &'a mut Direction,
}

impl Walker<'_> {
    /// Moves `distance` pixels along the graph.
    ///
    /// `choose` is asked for a direction whenever the entity sits on a node:
    /// at rest, or after snapping onto the node it overshot. A direction with
    /// no neighbour leaves the entity resting there.
    fn travel(
        &mut self,
        nodes: &[Node],
        mut distance: f64,
        mut choose: impl FnMut(&Node, Direction) -> Direction,
    ) {
        if *self.direction == Direction::Stop && !self.depart(nodes, &mut choose) {
            return;
        }

        while distance > 0.0 {
            let goal = vec2(nodes[self.target.index()].position);
            let here = vec2(*self.position);
            let to_go = (goal - here).norm();

            if distance < to_go {
                *self.position = position(here + heading(*self.direction) * distance);
                return;
            }

            distance -= to_go;
            *self.position = position(goal);
            *self.origin = *self.target;

            let node = &nodes[self.target.index()];
            let next = choose(node, *self.direction);
            match node.neighbor(next) {
                Some(id) => {
                    *self.target = id;
                    *self.direction = next;
                }
                None => {
                    *self.direction = Direction::Stop;
                    return;
                }
            }
        }
    }

    fn depart(
        &mut self,
        nodes: &[Node],
        choose: &mut impl FnMut(&Node, Direction) -> Direction,
    ) -> bool {
        let node = &nodes[self.origin.index()];
        let next = choose(node, Direction::Stop);
        match node.neighbor(next) {
            Some(id) => {
                *self.target = id;
                *self.direction = next;
                true
            }
            None => false,
        }
    }
}

/// All four adversaries resting on the home node; inactive when disabled.
fn home_adversaries(layout: &MazeLayout, enabled: bool) -> [Adversary; 4] {
    let home = layout.home();
    let position = layout.node(home).position;
    AdversaryId::ALL.map(|id| {
        let mut ghost = Adversary::resting(id, home, position);
        if !enabled {
            ghost.mode = Mode::Inactive;
        }
        ghost
    })
}

fn reverse(ghost: &mut Adversary) {
    if ghost.direction != Direction::Stop {
        std::mem::swap(&mut ghost.origin, &mut ghost.target);
        ghost.direction = ghost.direction.opposite();
    }
}

impl WorldSnapshot for MazeEngine {
    fn pacman(&self) -> &PacmanState {
        &self.pacman
    }

    fn pacman_overshot_target(&self) -> bool {
        let origin = self.layout.node(self.pacman.origin).position;
        let target = self.layout.node(self.pacman.target).position;
        has_overshot(origin, target, self.pacman.position)
    }

    fn nodes(&self) -> &[Node] {
        self.layout.nodes()
    }

    fn node_at_cell(&self, x: i64, y: i64) -> Option<&Node> {
        self.layout.node_at_cell(x, y)
    }

    fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    fn adversary(&self, id: AdversaryId) -> &Adversary {
        &self.adversaries[id.slot()]
    }
}

impl GameEngine for MazeEngine {
    fn step(&mut self, dt: f64) -> Result<(), EngineError> {
        if !dt.is_finite() || dt <= 0.0 || dt > MAX_DT {
            return Err(EngineError::InvalidTimeStep(dt));
        }
        if self.status.is_over() {
            return Ok(());
        }

        let strides = (TOP_SPEED * dt / MAX_STRIDE).ceil().max(1.0) as usize;
        let stride_dt = dt / strides as f64;
        for _ in 0..strides {
            self.advance(stride_dt);
            if self.status.is_over() {
                break;
            }
        }

        self.check_integrity()
    }

    fn apply_move(&mut self, direction: Direction) {
        self.desired = direction;
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn tally(&self) -> GameTally {
        self.tally
    }

    fn as_world(&self) -> &dyn WorldSnapshot {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FRAME_DT;
    use pacman_core::Observation;
    use pacman_env::Position;

    fn engine(text: &str, config: &TrialConfig) -> MazeEngine {
        let layout = Arc::new(MazeLayout::parse(text).unwrap());
        MazeEngine::new(layout, config, 7)
    }

    fn classic(config: &TrialConfig) -> MazeEngine {
        MazeEngine::new(Arc::new(MazeLayout::classic()), config, 7)
    }

    #[test]
    fn test_new_engine_state() {
        let config = TrialConfig::headless().with_lives(2).with_level(3);
        let e = classic(&config);

        assert!(e.pacman_overshot_target());
        assert_eq!(e.pellets().len(), e.layout().pellets().len());
        assert_eq!(e.status(), GameStatus::Running);
        assert_eq!(e.tally().lives, 2);
        assert_eq!(e.tally().level, 3);
        assert_eq!(e.adversary(AdversaryId::Inky).position, e.layout().node(e.layout().home()).position);
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let mut e = classic(&TrialConfig::headless());
        for dt in [0.0, -FRAME_DT, f64::NAN, f64::INFINITY, 2.0] {
            assert!(matches!(e.step(dt), Err(EngineError::InvalidTimeStep(_))));
        }
    }

    #[test]
    fn test_pacman_moves_and_eats() {
        let config = TrialConfig::headless().with_ghosts(false);
        let mut e = classic(&config);
        let start = e.pacman().position;

        e.apply_move(Direction::Right);
        for _ in 0..15 {
            e.step(FRAME_DT).unwrap();
        }

        let p = e.pacman();
        assert_eq!(p.direction, Direction::Right);
        assert!((p.position.x - start.x - 50.0).abs() < 1e-6);
        assert!(e.tally().pellets_eaten >= 3);
        assert_eq!(e.tally().score, e.tally().pellets_eaten * 10);
        assert!(!e.pacman_overshot_target());
    }

    #[test]
    fn test_pacman_stops_at_wall() {
        let mut e = engine("#######\n#S...G#\n#######", &TrialConfig::headless().with_ghosts(false));
        e.apply_move(Direction::Left);
        e.step(FRAME_DT).unwrap();

        assert_eq!(e.pacman().direction, Direction::Stop);
        assert_eq!(e.pacman().position, Position::new(16.0, 16.0));
    }

    #[test]
    fn test_mid_edge_reversal() {
        let config = TrialConfig::headless().with_ghosts(false);
        let mut e = classic(&config);
        e.apply_move(Direction::Right);
        for _ in 0..3 {
            e.step(FRAME_DT).unwrap();
        }
        let origin = e.pacman().origin;
        let target = e.pacman().target;

        e.apply_move(Direction::Left);
        e.step(FRAME_DT).unwrap();

        assert_eq!(e.pacman().direction, Direction::Left);
        assert_eq!(e.pacman().origin, target);
        assert_eq!(e.pacman().target, origin);
    }

    #[test]
    fn test_ghosts_disabled_stay_home() {
        let mut e = classic(&TrialConfig::headless().with_ghosts(false));
        let home = e.layout().node(e.layout().home()).position;
        for _ in 0..300 {
            e.step(FRAME_DT).unwrap();
        }
        for id in AdversaryId::ALL {
            assert_eq!(e.adversary(id).position, home);
            assert_eq!(e.adversary(id).mode, Mode::Inactive);
            assert!(!e.adversary(id).is_dangerous());
        }
    }

    #[test]
    fn test_adversaries_leave_home() {
        let mut e = classic(&TrialConfig::headless());
        let home = e.layout().node(e.layout().home()).position;
        for _ in 0..30 {
            e.step(FRAME_DT).unwrap();
        }
        assert_ne!(e.adversary(AdversaryId::Blinky).position, home);
        assert_eq!(e.adversary(AdversaryId::Clyde).position, home);
    }

    #[test]
    fn test_clearing_last_pellet_wins() {
        let config = TrialConfig::headless().with_ghosts(false);
        let mut e = engine("#####\n#S.G#\n#####", &config);

        e.apply_move(Direction::Right);
        for _ in 0..10 {
            e.step(FRAME_DT).unwrap();
        }

        assert_eq!(e.status(), GameStatus::Over(TerminationReason::LevelsCleared));
        assert_eq!(e.tally().score, 10);
        assert_eq!(e.tally().level, 0);
    }

    #[test]
    fn test_winning_keeps_level_played() {
        let config = TrialConfig::headless().with_ghosts(false).with_level(2);
        let mut e = engine("#####\n#S.G#\n#####", &config);

        e.apply_move(Direction::Right);
        for _ in 0..10 {
            e.step(FRAME_DT).unwrap();
        }

        assert_eq!(e.status(), GameStatus::Over(TerminationReason::LevelsCleared));
        assert_eq!(e.tally().level, 2);
    }

    #[test]
    fn test_observed_legal_moves_at_rest_and_mid_edge() {
        let mut e = classic(&TrialConfig::headless().with_ghosts(false));
        let start = e.layout().node(e.layout().start()).position;

        let obs = Observation::new(e.as_world());
        assert_eq!(obs.pacman_position(), start);
        assert_eq!(
            obs.legal_moves(),
            vec![Direction::Down, Direction::Left, Direction::Right]
        );

        e.apply_move(Direction::Right);
        e.step(FRAME_DT).unwrap();
        let obs = Observation::new(e.as_world());
        assert_eq!(obs.legal_moves(), vec![Direction::Left, Direction::Right]);
        assert_eq!(obs.pacman_position(), Position::new(start.x + 3.0, start.y));
        assert_eq!(obs.pacman_target_position(), Position::new(13.0 * 16.0, start.y));
        assert_eq!(obs.pacman_direction(), Direction::Right);
    }

    #[test]
    fn test_observed_vertical_edge() {
        let mut e = classic(&TrialConfig::headless().with_ghosts(false));
        e.apply_move(Direction::Down);
        e.step(FRAME_DT).unwrap();

        let obs = Observation::new(e.as_world());
        assert_eq!(obs.legal_moves(), vec![Direction::Up, Direction::Down]);
    }

    #[test]
    fn test_observed_disabled_adversaries() {
        let mut e = engine("#######\n#S...G#\n#######", &TrialConfig::headless().with_ghosts(false));
        for _ in 0..40 {
            e.step(FRAME_DT).unwrap();
            let obs = Observation::new(e.as_world());
            assert_eq!(obs.common_adversary_mode(), Mode::Inactive);
            assert!(obs.adversaries().iter().all(|a| !a.is_dangerous()));
        }
    }

    #[test]
    fn test_observed_live_adversaries() {
        let mut e = classic(&TrialConfig::headless());
        for _ in 0..30 {
            e.step(FRAME_DT).unwrap();
        }

        let obs = Observation::new(e.as_world());
        assert_eq!(obs.adversary_modes(), vec![Mode::Scatter; 4]);
        assert_eq!(obs.adversary_by_identifier(4).unwrap().id, AdversaryId::Blinky);
        assert_ne!(obs.adversary_positions()[0], obs.adversary_positions()[3]);
    }

    #[test]
    fn test_endless_mode_refills_pellets() {
        let config = TrialConfig::headless().with_ghosts(false).with_levels_to_win(0);
        let mut e = engine("#####\n#S.G#\n#####", &config);

        e.apply_move(Direction::Right);
        for _ in 0..10 {
            e.step(FRAME_DT).unwrap();
        }

        assert_eq!(e.status(), GameStatus::Running);
        assert_eq!(e.tally().level, 1);
        assert!(e.pellets().iter().all(|p| !p.eaten));
        assert_eq!(e.pacman().position, Position::new(16.0, 16.0));
    }

    #[test]
    fn test_caught_by_adversary_costs_life() {
        let mut e = engine("#######\n#S...G#\n#######", &TrialConfig::headless().with_lives(2));

        let mut ticks = 0;
        while e.tally().lives == 2 && ticks < 120 {
            e.step(FRAME_DT).unwrap();
            ticks += 1;
        }
        assert_eq!(e.tally().lives, 1);
        assert_eq!(e.status(), GameStatus::Running);
        assert_eq!(e.pacman().position, Position::new(16.0, 16.0));

        while !e.status().is_over() && ticks < 240 {
            e.step(FRAME_DT).unwrap();
            ticks += 1;
        }
        assert_eq!(e.status(), GameStatus::Over(TerminationReason::LivesExhausted));
    }

    #[test]
    fn test_frightened_adversary_is_eaten() {
        let mut e = classic(&TrialConfig::headless());
        e.frighten();
        let at = e.pacman().position;
        e.adversaries[AdversaryId::Pinky.slot()].position = at;
        e.adversaries[AdversaryId::Inky.slot()].position = at;

        e.resolve_collisions();

        assert_eq!(e.tally().score, 200 + 400);
        assert_eq!(e.tally().adversaries_eaten, 2);
        assert_eq!(e.adversary(AdversaryId::Pinky).mode, Mode::Spawn);
        assert_eq!(e.adversary(AdversaryId::Blinky).mode, Mode::Freight);
    }

    #[test]
    fn test_power_pellet_without_freight() {
        let config = TrialConfig::headless().with_ghosts(false).with_freight(false);
        let mut e = engine("#######\n#S-p.G#\n#######", &config);

        e.apply_move(Direction::Right);
        for _ in 0..12 {
            e.step(FRAME_DT).unwrap();
        }
        assert!(e.tally().score >= 50);
        assert_eq!(e.freight_left, 0.0);
        assert_eq!(e.adversary(AdversaryId::Blinky).mode, Mode::Inactive);
    }

    #[test]
    fn test_same_seed_same_game() {
        let config = TrialConfig::headless();
        let mut a = classic(&config);
        let mut b = classic(&config);
        for tick in 0..600 {
            let dir = Direction::CARDINAL[(tick / 40) % 4];
            a.apply_move(dir);
            b.apply_move(dir);
            a.step(FRAME_DT).unwrap();
            b.step(FRAME_DT).unwrap();
        }
        assert_eq!(a.pacman(), b.pacman());
        assert_eq!(a.tally(), b.tally());
        for id in AdversaryId::ALL {
            assert_eq!(a.adversary(id), b.adversary(id));
        }
    }
}
