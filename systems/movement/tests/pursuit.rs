use std::time::Duration;

use maze_chase_core::{Command, Event, GhostKind, GhostMode, Position};
use maze_chase_system_collision::Collision;
use maze_chase_system_movement::{Config as MovementConfig, Movement};
use maze_chase_system_targeting::{Config as TargetingConfig, Targeting};
use maze_chase_world::{self as world, query, World, WorldConfig};

const GHOST_CYCLE: Duration = Duration::from_millis(175);

/// Runs one ghost cycle: tick the world, retarget from the resulting events,
/// plan and apply steps from a fresh snapshot, then resolve collisions.
fn pump_cycle(
    world: &mut World,
    targeting: &mut Targeting,
    movement: &mut Movement,
) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: GHOST_CYCLE }, &mut events);

    let mut commands = Vec::new();
    targeting.handle(
        &events,
        &query::maze_view(world),
        &query::ghost_view(world),
        &query::player(world),
        &query::trail_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }

    let mut commands = Vec::new();
    movement.handle(
        &events,
        &query::maze_view(world),
        &query::ghost_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }

    let mut commands = Vec::new();
    Collision::new().handle(
        &events,
        &query::ghost_view(world),
        &query::player(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }

    events
}

#[test]
fn pursuer_closes_a_corridor_gap_step_by_step() {
    // Player idles at the left end; the pursuer starts five cells away.
    let config = WorldConfig::custom(
        &["#.     #"],
        Position::new(1, 0),
        [Position::new(6, 0); 4],
    );
    let mut world = World::from_config(config).expect("corridor layout is valid");
    let mut targeting = Targeting::new(TargetingConfig::default());
    let mut movement = Movement::new(MovementConfig::default());

    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);

    // Four cycles close the gap monotonically without touching the player.
    let mut distances = Vec::new();
    for _ in 0..4 {
        let events = pump_cycle(&mut world, &mut targeting, &mut movement);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::GhostMoved {
                ghost: GhostKind::Pursuer,
                ..
            }
        )));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PlayerCaught { .. })));

        let view = query::ghost_view(&world);
        let pursuer = view.ghost(GhostKind::Pursuer).expect("pursuer exists");
        assert_eq!(pursuer.mode, GhostMode::Chase);
        distances.push(pursuer.position.distance_to(query::player(&world).position));
    }
    for pair in distances.windows(2) {
        assert!(pair[1] < pair[0]);
    }

    // The fifth cycle lands on the player: one capture, then everyone is
    // back on a spawn cell and the remaining co-location reports are stale.
    let events = pump_cycle(&mut world, &mut targeting, &mut movement);
    let captures = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerCaught { .. }))
        .count();
    assert_eq!(captures, 1);
    assert!(events.contains(&Event::PlayerCaught {
        ghost: GhostKind::Pursuer,
        lives: 2,
    }));
    assert_eq!(query::player(&world).position, Position::new(1, 0));
    let view = query::ghost_view(&world);
    let pursuer = view.ghost(GhostKind::Pursuer).expect("pursuer exists");
    assert_eq!(pursuer.position, Position::new(6, 0));
    assert_eq!(pursuer.mode, GhostMode::Scatter);
}
