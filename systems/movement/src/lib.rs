#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that proposes one ghost step per cycle.
//!
//! Targeted ghosts steer greedily: among the legal non-reversing directions,
//! pick the one whose destination lies closest to the ghost's recorded target
//! by straight-line distance. Frightened ghosts step uniformly at random
//! within the same legal non-reversing set, drawn from a seeded stream so
//! identical scripts replay identically.

use maze_chase_core::{
    Command, Direction, Event, GhostMode, GhostSnapshot, GhostView, MazeView, Position,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tuning knobs for the movement system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Seed for the frightened-step stream.
    pub rng_seed: u64,
}

/// Pure system that reacts to ghost cycles and emits step commands.
#[derive(Debug)]
pub struct Movement {
    rng: ChaCha8Rng,
}

impl Movement {
    /// Creates a movement system from the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and immutable views to emit step commands.
    ///
    /// Every `GhostCycleElapsed` in the batch yields one `StepGhost` per
    /// ghost. The views capture the state before any step resolves, so
    /// cycles after the first plan from locally projected positions and
    /// headings.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &MazeView<'_>,
        ghosts: &GhostView,
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
                let direction = if ghost.mode == GhostMode::Frightened {
                    self.frightened_direction(maze, ghost)
                } else {
                    best_direction(maze, ghost.position, ghost.target, ghost.direction)
                };
                out.push(Command::StepGhost {
                    ghost: ghost.kind,
                    direction,
                });
                if maze.is_legal_move(ghost.position, direction) {
                    ghost.position = maze.step(ghost.position, direction);
                }
                ghost.direction = direction;
            }
        }
    }

    fn frightened_direction(&mut self, maze: &MazeView<'_>, ghost: &GhostSnapshot) -> Direction {
        let options = maze.legal_directions(ghost.position, Some(ghost.direction.opposite()));
        if options.is_empty() {
            return best_direction(maze, ghost.position, ghost.target, ghost.direction);
        }
        options[self.rng.gen_range(0..options.len())]
    }
}

/// Greedy step choice toward a target cell.
///
/// Candidates are the legal directions excluding the reverse of `current`.
/// With no candidate the ghost keeps its heading and stalls in place. Ties
/// on destination distance resolve to the earliest candidate in
/// [`Direction::ALL`] order.
#[must_use]
pub fn best_direction(
    maze: &MazeView<'_>,
    position: Position,
    target: Position,
    current: Direction,
) -> Direction {
    let candidates = maze.legal_directions(position, Some(current.opposite()));

    let mut best: Option<(Direction, f32)> = None;
    for candidate in candidates {
        let distance = maze.step(position, candidate).distance_to(target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map_or(current, |(direction, _)| direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{CellKind, GhostKind};

    const W: i32 = 5;
    const H: i32 = 5;

    // 5x5 box: outer walls, open interior, pillar in the middle.
    fn box_cells() -> Vec<CellKind> {
        let mut cells = vec![CellKind::Open; (W * H) as usize];
        for x in 0..W {
            cells[x as usize] = CellKind::Wall;
            cells[(4 * W + x) as usize] = CellKind::Wall;
        }
        for y in 0..H {
            cells[(y * W) as usize] = CellKind::Wall;
            cells[(y * W + 4) as usize] = CellKind::Wall;
        }
        cells[(2 * W + 2) as usize] = CellKind::Wall;
        cells
    }

    fn snapshot(position: Position, direction: Direction, mode: GhostMode) -> GhostSnapshot {
        GhostSnapshot {
            kind: GhostKind::Pursuer,
            position,
            direction,
            mode,
            target: Position::new(1, 1),
            patrol_index: 0,
            frightened_until: None,
        }
    }

    #[test]
    fn greedy_choice_minimizes_distance_to_target() {
        let cells = box_cells();
        let maze = MazeView::new(&cells, W, H);

        // From (3,3) heading Up, stepping Up lands strictly closer to (3,1)
        // than stepping Left does.
        let direction = best_direction(&maze, Position::new(3, 3), Position::new(3, 1), Direction::Up);
        assert_eq!(direction, Direction::Up);
    }

    #[test]
    fn ties_resolve_in_canonical_order() {
        let cells = vec![CellKind::Open; (W * H) as usize];
        let maze = MazeView::new(&cells, W, H);

        // From (2,2) toward (2,2): every candidate is one cell away, so the
        // first candidate in ALL order wins.
        let direction = best_direction(&maze, Position::new(2, 2), Position::new(2, 2), Direction::Up);
        assert_eq!(direction, Direction::Up);
    }

    #[test]
    fn reverse_is_never_chosen_even_when_shortest() {
        let cells = box_cells();
        let maze = MazeView::new(&cells, W, H);

        // Heading Right at (2,1); the target sits behind at (1,1), but the
        // reverse candidate is excluded, so the ghost continues to (3,1).
        let direction = best_direction(&maze, Position::new(2, 1), Position::new(1, 1), Direction::Right);
        assert_ne!(direction, Direction::Left);
        assert_eq!(direction, Direction::Right);
    }

    #[test]
    fn dead_end_keeps_the_current_heading() {
        // One open pocket surrounded by walls on three sides.
        let cells = vec![
            CellKind::Wall,
            CellKind::Wall,
            CellKind::Wall,
            CellKind::Open,
            CellKind::Open,
            CellKind::Wall,
            CellKind::Wall,
            CellKind::Wall,
            CellKind::Wall,
        ];
        let maze = MazeView::new(&cells, 3, 3);

        // At (1,1) heading Right, only the reverse (Left) is legal.
        let direction = best_direction(&maze, Position::new(1, 1), Position::new(0, 0), Direction::Right);
        assert_eq!(direction, Direction::Right);
    }

    #[test]
    fn planned_step_is_emitted_per_cycle() {
        let cells = box_cells();
        let maze = MazeView::new(&cells, W, H);
        let ghosts = GhostView::from_snapshots(vec![snapshot(
            Position::new(3, 3),
            Direction::Up,
            GhostMode::Chase,
        )]);
        let mut movement = Movement::new(Config::default());

        let mut out = Vec::new();
        movement.handle(&[Event::GhostCycleElapsed], &maze, &ghosts, &mut out);
        assert_eq!(
            out,
            vec![Command::StepGhost {
                ghost: GhostKind::Pursuer,
                direction: Direction::Up,
            }]
        );

        out.clear();
        movement.handle(
            &[Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(175),
            }],
            &maze,
            &ghosts,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn every_elapsed_cycle_yields_a_step() {
        let cells = box_cells();
        let maze = MazeView::new(&cells, W, H);
        let mut ghost = snapshot(Position::new(1, 3), Direction::Up, GhostMode::Chase);
        ghost.target = Position::new(3, 1);
        let ghosts = GhostView::from_snapshots(vec![ghost]);
        let mut movement = Movement::new(Config::default());

        // Three cycles in one batch: the first two climb the left corridor,
        // the third turns right from the projected corner cell.
        let mut out = Vec::new();
        movement.handle(
            &[
                Event::GhostCycleElapsed,
                Event::GhostCycleElapsed,
                Event::GhostCycleElapsed,
            ],
            &maze,
            &ghosts,
            &mut out,
        );

        let directions: Vec<Direction> = out
            .iter()
            .map(|command| match command {
                Command::StepGhost { direction, .. } => *direction,
                other => panic!("unexpected command {other:?}"),
            })
            .collect();
        assert_eq!(
            directions,
            vec![Direction::Up, Direction::Up, Direction::Right]
        );
    }

    #[test]
    fn frightened_steps_stay_legal_and_never_reverse() {
        let cells = box_cells();
        let maze = MazeView::new(&cells, W, H);
        let ghosts = GhostView::from_snapshots(vec![snapshot(
            Position::new(3, 3),
            Direction::Up,
            GhostMode::Frightened,
        )]);
        let mut movement = Movement::new(Config::default());

        for _ in 0..64 {
            let mut out = Vec::new();
            movement.handle(&[Event::GhostCycleElapsed], &maze, &ghosts, &mut out);
            let [Command::StepGhost { direction, .. }] = out[..] else {
                panic!("expected exactly one step command");
            };
            assert_ne!(direction, Direction::Down);
            assert!(maze.is_legal_move(Position::new(3, 3), direction));
        }
    }

    #[test]
    fn identical_seeds_replay_identical_frightened_steps() {
        let cells = box_cells();
        let maze = MazeView::new(&cells, W, H);
        let ghosts = GhostView::from_snapshots(vec![snapshot(
            Position::new(3, 3),
            Direction::Up,
            GhostMode::Frightened,
        )]);

        let mut runs: [Vec<Command>; 2] = [Vec::new(), Vec::new()];
        for run in &mut runs {
            let mut movement = Movement::new(Config { rng_seed: 7 });
            for _ in 0..32 {
                movement.handle(&[Event::GhostCycleElapsed], &maze, &ghosts, run);
            }
        }

        assert_eq!(runs[0], runs[1]);
    }
}
