#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The world owns the maze grid, the player, the four ghosts and the session
//! bookkeeping. All mutation flows through [`apply`]; systems and adapters
//! read state exclusively through [`query`] views. Movement cycles are
//! simulation-clock accumulators advanced by `Command::Tick`, so identical
//! command scripts always replay to identical state.

use std::{collections::VecDeque, time::Duration};

use maze_chase_core::{
    Command, Direction, Event, GhostKind, GhostMode, PelletKind, Position, SessionPhase,
    CAPTURE_INTERLUDE, FRIGHTENED_DURATION, GHOST_CAPTURE_SCORE, GHOST_STEP_PERIOD,
    PLAYER_STEP_PERIOD, STARTING_LIVES, TRAIL_CAPACITY,
};

mod maze;

pub use maze::LayoutError;
use maze::Maze;

/// Number of waypoints in each ghost's cyclic scatter patrol.
pub const PATROL_LOOP_LEN: usize = 4;

/// Standard 19x22 board with a wraparound tunnel row.
const STANDARD_LAYOUT: [&str; 22] = [
    "###################",
    "#........#........#",
    "#o##.###.#.###.##o#",
    "#.##.###.#.###.##.#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.### # ###.####",
    "#  #.#       #.#  #",
    "####.# ##-## #.####",
    "    .  #---#  .    ",
    "####.# ##### #.####",
    "#  #.#       #.#  #",
    "####.# ##### #.####",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#o.#..... .....#.o#",
    "##.#.#.#####.#.#.##",
    "#....#...#...#....#",
    "#.######.#.######.#",
    "#.................#",
    "###################",
];

const STANDARD_PLAYER_SPAWN: Position = Position::new(9, 16);

const STANDARD_GHOST_SPAWNS: [Position; 4] = [
    Position::new(9, 9),
    Position::new(9, 10),
    Position::new(8, 10),
    Position::new(10, 10),
];

/// Board layout and spawn coordinates used to build a world.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    layout: Vec<String>,
    player_spawn: Position,
    ghost_spawns: [Position; 4],
}

impl WorldConfig {
    /// Configuration for the standard board.
    #[must_use]
    pub fn standard() -> Self {
        Self::custom(&STANDARD_LAYOUT, STANDARD_PLAYER_SPAWN, STANDARD_GHOST_SPAWNS)
    }

    /// Configuration for an arbitrary board.
    ///
    /// `ghost_spawns` follows [`GhostKind::ALL`] order.
    #[must_use]
    pub fn custom(layout: &[&str], player_spawn: Position, ghost_spawns: [Position; 4]) -> Self {
        Self {
            layout: layout.iter().map(|row| (*row).to_owned()).collect(),
            player_spawn,
            ghost_spawns,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Position,
    direction: Option<Direction>,
    queued: Option<Direction>,
    moving: bool,
}

impl Player {
    fn at_spawn(spawn: Position) -> Self {
        Self {
            position: spawn,
            direction: None,
            queued: None,
            moving: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Ghost {
    kind: GhostKind,
    spawn: Position,
    spawn_direction: Direction,
    position: Position,
    direction: Direction,
    mode: GhostMode,
    target: Position,
    patrol_index: usize,
    frightened_until: Option<Duration>,
}

impl Ghost {
    fn at_spawn(kind: GhostKind, spawn: Position, home_corner: Position) -> Self {
        Self {
            kind,
            spawn,
            spawn_direction: spawn_direction(kind),
            position: spawn,
            direction: spawn_direction(kind),
            mode: GhostMode::Scatter,
            target: home_corner,
            patrol_index: 0,
            frightened_until: None,
        }
    }

    /// Restores spawn state while preserving the patrol index, which survives
    /// respawns the way the per-ghost counters always have.
    fn respawn(&mut self, home_corner: Position) {
        self.position = self.spawn;
        self.direction = self.spawn_direction;
        self.mode = GhostMode::Scatter;
        self.target = home_corner;
        self.frightened_until = None;
    }
}

fn spawn_direction(kind: GhostKind) -> Direction {
    match kind {
        GhostKind::Pursuer => Direction::Left,
        GhostKind::Ambusher | GhostKind::Flanker | GhostKind::Skittish => Direction::Up,
    }
}

/// Fixed corner each ghost initially targets, diagonal to its home patrol.
fn home_corner(kind: GhostKind, width: i32, height: i32) -> Position {
    match kind {
        GhostKind::Pursuer => Position::new(width - 1, 0),
        GhostKind::Ambusher => Position::new(0, 0),
        GhostKind::Flanker => Position::new(0, height - 1),
        GhostKind::Skittish => Position::new(width - 1, height - 1),
    }
}

/// Represents the authoritative Maze Chase session state.
#[derive(Clone, Debug)]
pub struct World {
    maze: Maze,
    spawn_maze: Maze,
    player_spawn: Position,
    player: Player,
    ghosts: [Ghost; 4],
    trail: VecDeque<Position>,
    score: u32,
    lives: u32,
    level: u32,
    high_score: u32,
    phase: SessionPhase,
    clock: Duration,
    player_accumulator: Duration,
    ghost_accumulator: Duration,
    interlude: Option<Duration>,
}

impl World {
    /// Creates a world on the standard board.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(WorldConfig::standard()).expect("standard board layout is valid")
    }

    /// Creates a world from an arbitrary configuration.
    pub fn from_config(config: WorldConfig) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = config.layout.iter().map(String::as_str).collect();
        let maze = Maze::parse(&rows)?;

        ensure_spawn_open(&maze, config.player_spawn)?;
        for spawn in config.ghost_spawns {
            ensure_spawn_open(&maze, spawn)?;
        }

        let width = maze.width();
        let height = maze.height();
        let ghosts = std::array::from_fn(|index| {
            let kind = GhostKind::ALL[index];
            Ghost::at_spawn(
                kind,
                config.ghost_spawns[index],
                home_corner(kind, width, height),
            )
        });

        Ok(Self {
            spawn_maze: maze.clone(),
            maze,
            player_spawn: config.player_spawn,
            player: Player::at_spawn(config.player_spawn),
            ghosts,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY),
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            high_score: 0,
            phase: SessionPhase::Ready,
            clock: Duration::ZERO,
            player_accumulator: Duration::ZERO,
            ghost_accumulator: Duration::ZERO,
            interlude: None,
        })
    }

    fn ghost(&self, kind: GhostKind) -> &Ghost {
        self.ghosts
            .iter()
            .find(|ghost| ghost.kind == kind)
            .expect("all four ghosts always exist")
    }

    fn ghost_mut(&mut self, kind: GhostKind) -> &mut Ghost {
        self.ghosts
            .iter_mut()
            .find(|ghost| ghost.kind == kind)
            .expect("all four ghosts always exist")
    }

    /// Places the player and ghosts back on their spawn cells and clears all
    /// in-flight movement state. Pellets are untouched.
    fn respawn_entities(&mut self) {
        let width = self.maze.width();
        let height = self.maze.height();
        self.player = Player::at_spawn(self.player_spawn);
        for ghost in &mut self.ghosts {
            let corner = home_corner(ghost.kind, width, height);
            ghost.respawn(corner);
        }
        self.trail.clear();
        self.player_accumulator = Duration::ZERO;
        self.ghost_accumulator = Duration::ZERO;
        self.interlude = None;
    }

    /// Full spawn restore including the pellet grid.
    fn restore_board(&mut self) {
        self.maze = self.spawn_maze.clone();
        self.respawn_entities();
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);

        if let Some(remaining) = self.interlude {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.interlude = None;
                out_events.push(Event::SessionResumed);
            } else {
                self.interlude = Some(remaining);
            }
            return;
        }

        self.player_accumulator = self.player_accumulator.saturating_add(dt);
        while self.player_accumulator >= PLAYER_STEP_PERIOD {
            self.player_accumulator -= PLAYER_STEP_PERIOD;
            self.resolve_player_step(out_events);
            if self.phase != SessionPhase::Running || self.interlude.is_some() {
                return;
            }
        }

        self.ghost_accumulator = self.ghost_accumulator.saturating_add(dt);
        while self.ghost_accumulator >= GHOST_STEP_PERIOD {
            self.ghost_accumulator -= GHOST_STEP_PERIOD;
            self.begin_ghost_cycle(out_events);
        }
    }

    fn resolve_player_step(&mut self, out_events: &mut Vec<Event>) {
        if self.player.direction.is_some() {
            self.player.moving = true;

            if let Some(queued) = self.player.queued {
                if self.maze.view().is_legal_move(self.player.position, queued) {
                    self.player.direction = Some(queued);
                    self.player.queued = None;
                    out_events.push(Event::DirectionChanged { direction: queued });
                }
            }

            if let Some(direction) = self.player.direction {
                if self.maze.view().is_legal_move(self.player.position, direction) {
                    let from = self.player.position;
                    let to = self.maze.view().step(from, direction);
                    self.player.position = to;
                    out_events.push(Event::PlayerMoved { from, to });
                    self.consume_pellet_at(to, out_events);
                } else {
                    self.player.moving = false;
                    out_events.push(Event::PlayerBlocked);
                }
            }
        }

        self.record_trail();
        self.check_level_complete(out_events);
    }

    fn consume_pellet_at(&mut self, position: Position, out_events: &mut Vec<Event>) {
        match self.maze.consume_pellet(position) {
            Some(PelletKind::Pellet) => {
                self.score += PelletKind::Pellet.score();
                out_events.push(Event::PelletEaten {
                    position,
                    score: self.score,
                });
            }
            Some(PelletKind::PowerPellet) => {
                self.score += PelletKind::PowerPellet.score();
                out_events.push(Event::PowerPelletEaten {
                    position,
                    score: self.score,
                });
                self.frighten_ghosts(out_events);
            }
            None => {}
        }
    }

    fn frighten_ghosts(&mut self, out_events: &mut Vec<Event>) {
        let until = self.clock.saturating_add(FRIGHTENED_DURATION);
        for ghost in &mut self.ghosts {
            ghost.mode = GhostMode::Frightened;
            ghost.frightened_until = Some(until);
        }
        out_events.push(Event::GhostsFrightened { until });
    }

    fn record_trail(&mut self) {
        if self.trail.len() == TRAIL_CAPACITY {
            let _ = self.trail.pop_front();
        }
        self.trail.push_back(self.player.position);
    }

    fn check_level_complete(&mut self, out_events: &mut Vec<Event>) {
        if self.maze.remaining_pellets() > 0 {
            return;
        }

        self.level += 1;
        self.restore_board();
        self.phase = SessionPhase::Ready;
        out_events.push(Event::LevelCompleted { level: self.level });
    }

    fn begin_ghost_cycle(&mut self, out_events: &mut Vec<Event>) {
        for ghost in &mut self.ghosts {
            if ghost.mode != GhostMode::Frightened {
                continue;
            }
            let Some(until) = ghost.frightened_until else {
                continue;
            };
            if self.clock >= until {
                ghost.mode = GhostMode::Chase;
                ghost.frightened_until = None;
                out_events.push(Event::GhostModeChanged {
                    ghost: ghost.kind,
                    mode: GhostMode::Chase,
                });
            }
        }

        out_events.push(Event::GhostCycleElapsed);
    }

    fn resolve_ghost_step(
        &mut self,
        kind: GhostKind,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        let from = self.ghost(kind).position;
        let legal = self.maze.view().is_legal_move(from, direction);
        let to = self.maze.view().step(from, direction);

        let ghost = self.ghost_mut(kind);
        ghost.direction = direction;
        if legal {
            ghost.position = to;
            out_events.push(Event::GhostMoved {
                ghost: kind,
                from,
                to,
                direction,
            });
        } else {
            out_events.push(Event::GhostStalled { ghost: kind });
        }

        // A freshly spawned ghost scatters for exactly one cycle, then
        // chases until frightened or recaptured.
        if ghost.mode == GhostMode::Scatter {
            ghost.mode = GhostMode::Chase;
            out_events.push(Event::GhostModeChanged {
                ghost: kind,
                mode: GhostMode::Chase,
            });
        }
    }

    fn resolve_collision(&mut self, kind: GhostKind, out_events: &mut Vec<Event>) {
        let player_position = self.player.position;
        let (position, mode) = {
            let ghost = self.ghost(kind);
            (ghost.position, ghost.mode)
        };

        // Stale request: the pair separated before resolution.
        if position != player_position {
            return;
        }

        if mode == GhostMode::Frightened {
            self.score += GHOST_CAPTURE_SCORE;
            let score = self.score;
            let width = self.maze.width();
            let height = self.maze.height();
            let corner = home_corner(kind, width, height);
            self.ghost_mut(kind).respawn(corner);
            out_events.push(Event::GhostEaten { ghost: kind, score });
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = SessionPhase::GameOver;
            let new_record = self.score > self.high_score;
            if new_record {
                self.high_score = self.score;
            }
            out_events.push(Event::PlayerCaught {
                ghost: kind,
                lives: 0,
            });
            out_events.push(Event::GameOver {
                score: self.score,
                new_record,
            });
        } else {
            out_events.push(Event::PlayerCaught {
                ghost: kind,
                lives: self.lives,
            });
            self.respawn_entities();
            self.interlude = Some(CAPTURE_INTERLUDE);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_spawn_open(maze: &Maze, spawn: Position) -> Result<(), LayoutError> {
    let in_bounds = spawn.x() >= 0
        && spawn.x() < maze.width()
        && spawn.y() >= 0
        && spawn.y() < maze.height();
    if !in_bounds || !maze.view().is_passable(spawn) {
        return Err(LayoutError::BlockedSpawn {
            x: spawn.x(),
            y: spawn.y(),
        });
    }
    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => {
            if world.phase == SessionPhase::Ready {
                world.phase = SessionPhase::Running;
                out_events.push(Event::SessionStarted);
            }
        }
        Command::TogglePause => match world.phase {
            SessionPhase::Running => {
                world.phase = SessionPhase::Paused;
                out_events.push(Event::SessionPaused);
            }
            SessionPhase::Paused => {
                world.phase = SessionPhase::Running;
                out_events.push(Event::SessionResumed);
            }
            SessionPhase::Ready | SessionPhase::GameOver => {}
        },
        Command::Reset { full } => {
            world.restore_board();
            world.phase = SessionPhase::Ready;
            if full {
                world.score = 0;
                world.lives = STARTING_LIVES;
                world.level = 1;
            }
            out_events.push(Event::SessionReset { full });
        }
        Command::SetDesiredDirection { direction } => {
            if world.phase == SessionPhase::GameOver {
                return;
            }
            if world.phase == SessionPhase::Ready {
                world.phase = SessionPhase::Running;
                out_events.push(Event::SessionStarted);
            }
            if world
                .maze
                .view()
                .is_legal_move(world.player.position, direction)
            {
                world.player.direction = Some(direction);
                world.player.moving = true;
                out_events.push(Event::DirectionChanged { direction });
            } else {
                world.player.queued = Some(direction);
                out_events.push(Event::DirectionQueued { direction });
            }
        }
        Command::SeedHighScore { value } => {
            world.high_score = value;
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if world.phase == SessionPhase::Running {
                world.advance_clock(dt, out_events);
            }
        }
        Command::RetargetGhost { ghost, target } => {
            world.ghost_mut(ghost).target = target;
            out_events.push(Event::GhostRetargeted { ghost, target });
        }
        Command::AdvancePatrol { ghost } => {
            let state = world.ghost_mut(ghost);
            state.patrol_index = (state.patrol_index + 1) % PATROL_LOOP_LEN;
            let index = state.patrol_index;
            out_events.push(Event::PatrolAdvanced { ghost, index });
        }
        Command::StepGhost { ghost, direction } => {
            if world.phase == SessionPhase::Running && world.interlude.is_none() {
                world.resolve_ghost_step(ghost, direction, out_events);
            }
        }
        Command::ResolveCollision { ghost } => {
            if world.phase == SessionPhase::Running {
                world.resolve_collision(ghost, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use maze_chase_core::{
        GhostSnapshot, GhostView, MazeView, PlayerSnapshot, SessionPhase, TrailView,
    };

    use super::World;

    /// Provides the maze view carrying grid contents and motion primitives.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        world.maze.view()
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            direction: world.player.direction,
            queued: world.player.queued,
            moving: world.player.moving,
        }
    }

    /// Captures a read-only view of all four ghosts in engine order.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        GhostView::from_snapshots(
            world
                .ghosts
                .iter()
                .map(|ghost| GhostSnapshot {
                    kind: ghost.kind,
                    position: ghost.position,
                    direction: ghost.direction,
                    mode: ghost.mode,
                    target: ghost.target,
                    patrol_index: ghost.patrol_index,
                    frightened_until: ghost.frightened_until,
                })
                .collect(),
        )
    }

    /// Captures the player's recent-position trail, oldest first.
    #[must_use]
    pub fn trail_view(world: &World) -> TrailView {
        TrailView::from_positions(world.trail.iter().copied().collect())
    }

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Best score recorded across sessions, including the seeded value.
    #[must_use]
    pub fn high_score(world: &World) -> u32 {
        world.high_score
    }

    /// Count of cells still holding a pellet of either kind.
    #[must_use]
    pub fn remaining_pellets(world: &World) -> usize {
        world.maze.remaining_pellets()
    }

    /// Accumulated simulation time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Remaining capture interlude, when one is pending.
    #[must_use]
    pub fn interlude_remaining(world: &World) -> Option<Duration> {
        world.interlude
    }
}
