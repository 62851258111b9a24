//! Headless demo session wiring the world to its three systems.
//!
//! The session owns the canonical frame order: autopilot input, one `Tick`,
//! targeting from the tick's events, movement from a fresh snapshot, then
//! collision detection. All randomness flows through seeded streams, so two
//! sessions built with the same seed replay identically.

use std::time::Duration;

use maze_chase_core::{Command, Direction, Event, SessionPhase};
use maze_chase_system_collision::Collision;
use maze_chase_system_movement::{Config as MovementConfig, Movement};
use maze_chase_system_targeting::{Config as TargetingConfig, Targeting};
use maze_chase_world::{self as world, query, World};

/// Snapshot of the session's headline numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Report {
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    pub(crate) level: u32,
    pub(crate) lives: u32,
    pub(crate) phase: SessionPhase,
}

pub(crate) struct Session {
    world: World,
    targeting: Targeting,
    movement: Movement,
    collision: Collision,
}

impl Session {
    /// Builds a session on the standard board with every random stream
    /// derived from `seed` and the persisted high score pre-loaded.
    pub(crate) fn new(seed: u64, high_score: u32) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SeedHighScore { value: high_score },
            &mut events,
        );

        Self {
            world,
            targeting: Targeting::new(TargetingConfig {
                rng_seed: seed,
                ..TargetingConfig::default()
            }),
            movement: Movement::new(MovementConfig {
                rng_seed: seed.rotate_left(32),
            }),
            collision: Collision::new(),
        }
    }

    /// Advances the session by one frame and returns everything that
    /// happened, in order.
    pub(crate) fn pump(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(direction) = self.autopilot() {
            world::apply(
                &mut self.world,
                Command::SetDesiredDirection { direction },
                &mut events,
            );
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.targeting.handle(
            &events,
            &query::maze_view(&self.world),
            &query::ghost_view(&self.world),
            &query::player(&self.world),
            &query::trail_view(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut commands = Vec::new();
        self.movement.handle(
            &events,
            &query::maze_view(&self.world),
            &query::ghost_view(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut commands = Vec::new();
        self.collision.handle(
            &events,
            &query::ghost_view(&self.world),
            &query::player(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        events
    }

    /// Simple deterministic stand-in for keyboard input: when the player is
    /// idle or blocked, steer into the first legal corridor, preferring not
    /// to double back.
    fn autopilot(&self) -> Option<Direction> {
        let player = query::player(&self.world);
        if player.moving && player.queued.is_none() {
            return None;
        }

        let maze = query::maze_view(&self.world);
        let preferred = player
            .direction
            .map(Direction::opposite)
            .map_or_else(
                || maze.legal_directions(player.position, None),
                |reverse| maze.legal_directions(player.position, Some(reverse)),
            );
        if let Some(direction) = preferred.first() {
            return Some(*direction);
        }
        maze.legal_directions(player.position, None).first().copied()
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        query::phase(&self.world)
    }

    pub(crate) fn report(&self) -> Report {
        Report {
            score: query::score(&self.world),
            high_score: query::high_score(&self.world),
            level: query::level(&self.world),
            lives: query::lives(&self.world),
            phase: query::phase(&self.world),
        }
    }
}
