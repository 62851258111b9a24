#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reports ghost/player co-locations to the world.
//!
//! Detection is exact cell equality. The system runs whenever a batch of
//! events contains a resolved player or ghost step, walks the ghost view in
//! its fixed order, and emits one `ResolveCollision` per co-located ghost.
//! Two co-located ghosts yield two independent requests. The world re-checks
//! positions on receipt, so requests that raced a respawn are dropped there.

use maze_chase_core::{Command, Event, GhostView, PlayerSnapshot};

/// Collision detection system; stateless between invocations.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and immutable views to emit collision requests.
    pub fn handle(
        &self,
        events: &[Event],
        ghosts: &GhostView,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        let steps_resolved = events.iter().any(|event| {
            matches!(
                event,
                Event::PlayerMoved { .. } | Event::GhostMoved { .. } | Event::GhostStalled { .. }
            )
        });
        if !steps_resolved {
            return;
        }

        for ghost in ghosts.iter() {
            if ghost.position == player.position {
                out.push(Command::ResolveCollision { ghost: ghost.kind });
            }
        }
    }
}
