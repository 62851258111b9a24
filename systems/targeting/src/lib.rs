#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes per-ghost target cells from world snapshots.
//!
//! Each ghost identity owns one chase strategy and one four-waypoint scatter
//! patrol. The system reacts to `GhostCycleElapsed`, reads immutable views,
//! and emits `RetargetGhost` commands (plus `AdvancePatrol` when a patrolling
//! ghost reaches its waypoint). Frightened ghosts are skipped; their steps are
//! randomized by the movement system instead.

use maze_chase_core::{
    Command, Event, GhostKind, GhostMode, GhostSnapshot, GhostView, MazeView, PlayerSnapshot,
    Position, TrailView,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tuning knobs for the targeting strategies.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Seed for the evasion jitter stream.
    pub rng_seed: u64,
    /// Cells of lead the ambusher projects along the player's heading.
    pub ambush_lead: i32,
    /// Distance below which the skittish ghost breaks off and flees.
    pub flee_threshold: f32,
    /// Probability per cycle that the skittish ghost feints sideways.
    pub jitter_probability: f64,
    /// Trail length the flanker needs before trusting the oldest entry.
    pub trail_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            ambush_lead: 4,
            flee_threshold: 8.0,
            jitter_probability: 0.1,
            trail_threshold: 5,
        }
    }
}

/// Targeting system holding the tuning configuration and its jitter stream.
#[derive(Debug)]
pub struct Targeting {
    config: Config,
    rng: ChaCha8Rng,
}

impl Targeting {
    /// Creates a targeting system from the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    /// Consumes world events and immutable views to emit targeting commands.
    ///
    /// Every `GhostCycleElapsed` in the batch gets its own targeting pass.
    /// Patrol indices are tracked locally across the passes so one waypoint
    /// arrival advances the loop exactly once.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &MazeView<'_>,
        ghosts: &GhostView,
        player: &PlayerSnapshot,
        trail: &TrailView,
        out: &mut Vec<Command>,
    ) {
        let cycles = events
            .iter()
            .filter(|event| matches!(event, Event::GhostCycleElapsed))
            .count();
        if cycles == 0 {
            return;
        }

        let mut projected: Vec<GhostSnapshot> = ghosts.iter().copied().collect();
        for _ in 0..cycles {
            for ghost in &mut projected {
                match ghost.mode {
                    GhostMode::Frightened => {}
                    GhostMode::Scatter => self.retarget_patrol(maze, ghost, out),
                    GhostMode::Chase => {
                        let target = self.chase_target(maze, ghost, player, trail);
                        out.push(Command::RetargetGhost {
                            ghost: ghost.kind,
                            target,
                        });
                    }
                }
            }
        }
    }

    /// Steers a scattering ghost around its home-corner loop, advancing the
    /// waypoint index once the current waypoint is reached.
    fn retarget_patrol(
        &self,
        maze: &MazeView<'_>,
        ghost: &mut GhostSnapshot,
        out: &mut Vec<Command>,
    ) {
        let mut waypoint =
            patrol_waypoint(ghost.kind, ghost.patrol_index, maze.width(), maze.height());
        if ghost.position.distance_to(waypoint) < 1.0 {
            out.push(Command::AdvancePatrol { ghost: ghost.kind });
            ghost.patrol_index = (ghost.patrol_index + 1) % PATROL_WAYPOINTS;
            waypoint = patrol_waypoint(ghost.kind, ghost.patrol_index, maze.width(), maze.height());
        }
        out.push(Command::RetargetGhost {
            ghost: ghost.kind,
            target: waypoint,
        });
    }

    fn chase_target(
        &mut self,
        maze: &MazeView<'_>,
        ghost: &GhostSnapshot,
        player: &PlayerSnapshot,
        trail: &TrailView,
    ) -> Position {
        match ghost.kind {
            GhostKind::Pursuer => player.position,
            GhostKind::Ambusher => match player.direction {
                Some(direction) => {
                    let (dx, dy) = direction.vector();
                    // Deliberately unwrapped: the lead point may fall outside
                    // the maze, and the resolver only measures distance to it.
                    player
                        .position
                        .offset(dx * self.config.ambush_lead, dy * self.config.ambush_lead)
                }
                None => player.position,
            },
            GhostKind::Flanker => {
                if trail.len() >= self.config.trail_threshold {
                    trail.oldest().unwrap_or(player.position)
                } else {
                    patrol_waypoint(ghost.kind, 0, maze.width(), maze.height())
                }
            }
            GhostKind::Skittish => {
                if ghost.position.distance_to(player.position) < self.config.flee_threshold {
                    return Position::new(0, maze.height() - 1);
                }
                if self.rng.gen_bool(self.config.jitter_probability) {
                    let options =
                        maze.legal_directions(ghost.position, Some(ghost.direction.opposite()));
                    if !options.is_empty() {
                        let pick = options[self.rng.gen_range(0..options.len())];
                        return maze.step(ghost.position, pick);
                    }
                }
                player.position
            }
        }
    }
}

/// Number of waypoints in every patrol loop.
const PATROL_WAYPOINTS: usize = 4;

/// Waypoint `index` of the ghost's home-corner patrol loop.
///
/// Each loop is a small square two cells in from the ghost's corner of the
/// board. Waypoints may land on walls; the greedy resolver only ever steers
/// toward them.
#[must_use]
pub fn patrol_waypoint(kind: GhostKind, index: usize, width: i32, height: i32) -> Position {
    let loop_points: [Position; PATROL_WAYPOINTS] = match kind {
        GhostKind::Pursuer => [
            Position::new(2, 2),
            Position::new(4, 2),
            Position::new(4, 4),
            Position::new(2, 4),
        ],
        GhostKind::Ambusher => [
            Position::new(width - 4, 2),
            Position::new(width - 2, 2),
            Position::new(width - 2, 4),
            Position::new(width - 4, 4),
        ],
        GhostKind::Flanker => [
            Position::new(2, height - 4),
            Position::new(4, height - 4),
            Position::new(4, height - 2),
            Position::new(2, height - 2),
        ],
        GhostKind::Skittish => [
            Position::new(width - 4, height - 4),
            Position::new(width - 2, height - 4),
            Position::new(width - 2, height - 2),
            Position::new(width - 4, height - 2),
        ],
    };
    loop_points[index % PATROL_WAYPOINTS]
}
