#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Points awarded for eating a standard pellet.
pub const PELLET_SCORE: u32 = 10;

/// Points awarded for eating a power pellet.
pub const POWER_PELLET_SCORE: u32 = 50;

/// Points awarded for capturing a frightened ghost.
pub const GHOST_CAPTURE_SCORE: u32 = 200;

/// Lives granted at the start of a fresh session.
pub const STARTING_LIVES: u32 = 3;

/// Simulated time a ghost spends frightened after a power pellet.
pub const FRIGHTENED_DURATION: Duration = Duration::from_millis(8_000);

/// Cadence of the player movement cycle.
pub const PLAYER_STEP_PERIOD: Duration = Duration::from_millis(150);

/// Cadence of the ghost movement cycle.
pub const GHOST_STEP_PERIOD: Duration = Duration::from_millis(175);

/// One-shot delay applied before ticks resume after the player is caught.
pub const CAPTURE_INTERLUDE: Duration = Duration::from_millis(1_500);

/// Maximum number of recent player positions retained in the trail.
pub const TRAIL_CAPACITY: usize = 10;

/// Location of a single maze cell expressed as signed grid coordinates.
///
/// Entity positions always lie inside the maze bounds. Target positions may
/// lie outside them: the ambusher's lead point is never clamped, and the
/// greedy resolver only ever measures straight-line distance toward it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, increasing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, increasing downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position displaced by the provided deltas, without
    /// wrapping.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Computes the Euclidean distance between two positions.
    ///
    /// The engine deliberately uses straight-line distance everywhere a
    /// heuristic is needed; there is no grid-aware path distance.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Cardinal movement directions available to the player and ghosts.
///
/// An idle entity carries `Option<Direction>::None` rather than a dedicated
/// variant, so every `Direction` value maps to a non-zero displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Canonical evaluation order used wherever candidate moves are ranked.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement vector for the direction.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Involutive opposite-direction pairing.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Static classification of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable cell.
    Wall,
    /// Passable cell with nothing to eat.
    Open,
    /// Passable cell holding a standard pellet.
    Pellet,
    /// Passable cell holding a power pellet.
    PowerPellet,
    /// Decorative ghost-house marker; behaves exactly like [`CellKind::Open`].
    GhostHouse,
}

impl CellKind {
    /// Reports whether entities may occupy the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

/// Kind of pellet removed from the maze by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PelletKind {
    /// Standard pellet worth [`PELLET_SCORE`].
    Pellet,
    /// Power pellet worth [`POWER_PELLET_SCORE`]; frightens every ghost.
    PowerPellet,
}

impl PelletKind {
    /// Score delta awarded when a pellet of this kind is eaten.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            PelletKind::Pellet => PELLET_SCORE,
            PelletKind::PowerPellet => POWER_PELLET_SCORE,
        }
    }
}

/// Fixed identity of one of the four ghosts.
///
/// Each identity owns one chase-mode targeting strategy and one home corner
/// with a four-waypoint patrol loop used while scattering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GhostKind {
    /// Targets the player's current cell directly.
    Pursuer,
    /// Targets four cells ahead of the player's heading.
    Ambusher,
    /// Targets the player's trailing position from several steps ago.
    Flanker,
    /// Chases from afar but flees to a far corner when close.
    Skittish,
}

impl GhostKind {
    /// All ghost identities in fixed engine iteration order.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Pursuer,
        GhostKind::Ambusher,
        GhostKind::Flanker,
        GhostKind::Skittish,
    ];
}

/// Behavioral mode a ghost occupies at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostMode {
    /// Patrolling near the home corner; entered at spawn and after capture.
    Scatter,
    /// Pursuing a strategy-computed target.
    Chase,
    /// Moving randomly and vulnerable to capture, on a timer.
    Frightened,
}

/// Lifecycle phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first input; no cycles run.
    Ready,
    /// Ticks advance both movement cycles.
    Running,
    /// Explicitly paused; cycles are frozen until resumed.
    Paused,
    /// Lives exhausted; only a reset is accepted.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Starts a session waiting in [`SessionPhase::Ready`].
    Start,
    /// Toggles between [`SessionPhase::Running`] and [`SessionPhase::Paused`].
    TogglePause,
    /// Restores spawn state; `full` additionally zeroes score, lives and level.
    Reset {
        /// When `true`, score, lives and level reset to their initial values.
        full: bool,
    },
    /// Records a direction intent from the input collaborator.
    SetDesiredDirection {
        /// Direction the player wants to travel next.
        direction: Direction,
    },
    /// Seeds the stored high score read from the persistence collaborator.
    SeedHighScore {
        /// Previously persisted high score, zero when absent.
        value: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates a ghost's target cell as computed by the targeting system.
    RetargetGhost {
        /// Ghost whose target changes.
        ghost: GhostKind,
        /// Cell the ghost should steer toward; may lie outside the maze.
        target: Position,
    },
    /// Advances a ghost's cyclic patrol waypoint index.
    AdvancePatrol {
        /// Ghost whose patrol loop advances.
        ghost: GhostKind,
    },
    /// Requests that a ghost advance one cell in the specified direction.
    StepGhost {
        /// Ghost attempting to move.
        ghost: GhostKind,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests resolution of a detected ghost/player co-location.
    ResolveCollision {
        /// Ghost reported as sharing the player's cell.
        ghost: GhostKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A session left [`SessionPhase::Ready`] and began running.
    SessionStarted,
    /// The session was explicitly paused.
    SessionPaused,
    /// The session resumed, either from a pause or a capture interlude.
    SessionResumed,
    /// Spawn state was restored.
    SessionReset {
        /// Mirrors the `full` flag of the reset command.
        full: bool,
    },
    /// The player's heading changed immediately.
    DirectionChanged {
        /// Newly active travel direction.
        direction: Direction,
    },
    /// The desired turn was illegal and was buffered instead.
    DirectionQueued {
        /// Direction held in the one-slot buffer.
        direction: Direction,
    },
    /// The player completed a step between two cells.
    PlayerMoved {
        /// Cell occupied before the step.
        from: Position,
        /// Cell occupied after the step.
        to: Position,
    },
    /// The player had no legal continuation and stopped moving.
    PlayerBlocked,
    /// A standard pellet was consumed.
    PelletEaten {
        /// Cell the pellet occupied.
        position: Position,
        /// Score total after the award.
        score: u32,
    },
    /// A power pellet was consumed; every ghost becomes frightened.
    PowerPelletEaten {
        /// Cell the pellet occupied.
        position: Position,
        /// Score total after the award.
        score: u32,
    },
    /// All ghosts entered frightened mode.
    GhostsFrightened {
        /// Simulation-clock deadline at which the mode expires.
        until: Duration,
    },
    /// One ghost movement cycle elapsed; ghosts should be retargeted and
    /// stepped from a single consistent snapshot.
    GhostCycleElapsed,
    /// A ghost's target cell was updated.
    GhostRetargeted {
        /// Ghost whose target changed.
        ghost: GhostKind,
        /// Newly recorded target.
        target: Position,
    },
    /// A ghost's patrol loop advanced to the next waypoint.
    PatrolAdvanced {
        /// Ghost whose patrol index changed.
        ghost: GhostKind,
        /// New waypoint index within the four-point loop.
        index: usize,
    },
    /// A ghost completed a step between two cells.
    GhostMoved {
        /// Ghost that advanced.
        ghost: GhostKind,
        /// Cell occupied before the step.
        from: Position,
        /// Cell occupied after the step.
        to: Position,
        /// Heading after the step.
        direction: Direction,
    },
    /// A ghost had no legal step and retained its position for the cycle.
    GhostStalled {
        /// Ghost that stalled in place.
        ghost: GhostKind,
    },
    /// A ghost changed behavioral mode.
    GhostModeChanged {
        /// Ghost whose mode changed.
        ghost: GhostKind,
        /// Mode now in effect.
        mode: GhostMode,
    },
    /// A frightened ghost was captured by the player.
    GhostEaten {
        /// Captured ghost; it has been reset to its spawn cell.
        ghost: GhostKind,
        /// Score total after the award.
        score: u32,
    },
    /// A non-frightened ghost caught the player.
    PlayerCaught {
        /// Ghost that made the capture.
        ghost: GhostKind,
        /// Lives remaining after the capture.
        lives: u32,
    },
    /// Every pellet was cleared; the level incremented and spawn state was
    /// restored without touching score or lives.
    LevelCompleted {
        /// Level now in effect.
        level: u32,
    },
    /// Lives were exhausted and the session ended.
    GameOver {
        /// Final score for the session.
        score: u32,
        /// `true` when the final score exceeded the stored high score.
        new_record: bool,
    },
}

/// Read-only view over the maze grid used by systems and adapters.
///
/// The view wraps a dense row-major cell slice together with its dimensions
/// and carries every motion primitive that depends on maze topology: toroidal
/// wrapping, single-cell stepping and legal-move filtering.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    cells: &'a [CellKind],
    width: i32,
    height: i32,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by the provided cell slice.
    ///
    /// The slice length must equal `width * height`; the world upholds this
    /// when constructing views.
    #[must_use]
    pub fn new(cells: &'a [CellKind], width: i32, height: i32) -> Self {
        debug_assert_eq!(cells.len() as i64, i64::from(width) * i64::from(height));
        Self {
            cells,
            width,
            height,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Wraps both coordinates independently into grid range.
    #[must_use]
    pub fn wrap(&self, position: Position) -> Position {
        Position::new(
            position.x().rem_euclid(self.width),
            position.y().rem_euclid(self.height),
        )
    }

    /// Kind of the cell at the provided position, after wrapping.
    #[must_use]
    pub fn cell(&self, position: Position) -> CellKind {
        let wrapped = self.wrap(position);
        let index = wrapped.y() as usize * self.width as usize + wrapped.x() as usize;
        self.cells.get(index).copied().unwrap_or(CellKind::Wall)
    }

    /// Reports whether the cell at the position can be occupied.
    #[must_use]
    pub fn is_passable(&self, position: Position) -> bool {
        self.cell(position).is_passable()
    }

    /// Advances one cell in the provided direction, wrapping at the edges.
    #[must_use]
    pub fn step(&self, position: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.vector();
        self.wrap(position.offset(dx, dy))
    }

    /// Reports whether stepping from the position in the direction lands on a
    /// passable cell.
    #[must_use]
    pub fn is_legal_move(&self, position: Position, direction: Direction) -> bool {
        self.is_passable(self.step(position, direction))
    }

    /// Collects the legal directions from a position in canonical order,
    /// omitting `exclude` when provided.
    #[must_use]
    pub fn legal_directions(
        &self,
        position: Position,
        exclude: Option<Direction>,
    ) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| Some(*direction) != exclude)
            .filter(|direction| self.is_legal_move(position, *direction))
            .collect()
    }
}

/// Immutable representation of a single ghost's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSnapshot {
    /// Fixed identity of the ghost.
    pub kind: GhostKind,
    /// Cell the ghost currently occupies.
    pub position: Position,
    /// Heading from the ghost's most recent step resolution.
    pub direction: Direction,
    /// Behavioral mode in effect.
    pub mode: GhostMode,
    /// Last target recorded by the targeting system.
    pub target: Position,
    /// Current index into the ghost's four-waypoint patrol loop.
    pub patrol_index: usize,
    /// Simulation-clock deadline for frightened mode, when frightened.
    pub frightened_until: Option<Duration>,
}

/// Read-only snapshot describing all four ghosts.
#[derive(Clone, Debug, Default)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new ghost view from the provided snapshots.
    ///
    /// Snapshots are ordered by identity so iteration matches the engine's
    /// fixed ghost array order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.kind);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot for a specific ghost identity, when present.
    #[must_use]
    pub fn ghost(&self, kind: GhostKind) -> Option<&GhostSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.kind == kind)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<GhostSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Cell the player currently occupies.
    pub position: Position,
    /// Active travel direction; `None` while idle.
    pub direction: Option<Direction>,
    /// Buffered turn applied opportunistically on a later cycle.
    pub queued: Option<Direction>,
    /// Whether the player advanced on its most recent cycle.
    pub moving: bool,
}

/// Bounded history of the player's most recent positions, oldest first.
///
/// The flanker strategy reconstructs its trailing target from this view.
#[derive(Clone, Debug, Default)]
pub struct TrailView {
    positions: Vec<Position>,
}

impl TrailView {
    /// Creates a trail view from positions ordered oldest to newest.
    #[must_use]
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Number of recorded positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether the trail holds no positions yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Oldest retained player position, when any exist.
    #[must_use]
    pub fn oldest(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    /// Iterator over the retained positions, oldest first.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }
}
