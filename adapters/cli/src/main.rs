#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Chase demo session.
//!
//! The binary seeds the world with the persisted high score, pumps frames at
//! a fixed simulated cadence, prints audio-style cues for notable events, and
//! writes the high score back when a session ends on a new record.

use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use maze_chase_core::{Event, SessionPhase};

mod persistence;
mod session;

use session::Session;

#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Headless Maze Chase demo runner")]
struct Args {
    /// Seed for every random stream; drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate before stopping.
    #[arg(long, default_value_t = 4_000)]
    ticks: u64,

    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 25)]
    tick_ms: u64,

    /// Path of the JSON high-score file.
    #[arg(long, default_value = "maze-chase-high-score.json")]
    high_score_file: PathBuf,

    /// Also print a cue for every ordinary pellet.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.tick_ms == 0 {
        anyhow::bail!("--tick-ms must be positive");
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let stored = persistence::load(&args.high_score_file);
    println!("seed {seed}, stored high score {stored}");

    let mut session = Session::new(seed, stored);
    let dt = Duration::from_millis(args.tick_ms);

    let mut new_record = false;
    for _ in 0..args.ticks {
        for event in session.pump(dt) {
            print_cue(&event, args.verbose);
            if let Event::GameOver {
                new_record: record, ..
            } = event
            {
                new_record = record;
            }
        }
        if session.phase() == SessionPhase::GameOver {
            break;
        }
    }

    let report = session.report();
    println!(
        "finished: score {}, level {}, lives {}, high score {}",
        report.score, report.level, report.lives, report.high_score
    );

    if new_record {
        persistence::store(&args.high_score_file, report.high_score)
            .context("persisting new high score")?;
        println!("new record saved to {}", args.high_score_file.display());
    }

    Ok(())
}

fn print_cue(event: &Event, verbose: bool) {
    match event {
        Event::PelletEaten { score, .. } if verbose => println!("pellet (score {score})"),
        Event::PowerPelletEaten { score, .. } => println!("power pellet (score {score})"),
        Event::GhostsFrightened { .. } => println!("ghosts frightened"),
        Event::GhostEaten { ghost, score } => println!("ate {ghost:?} (score {score})"),
        Event::PlayerCaught { ghost, lives } => {
            println!("caught by {ghost:?} ({lives} lives left)");
        }
        Event::LevelCompleted { level } => println!("board cleared, level {level}"),
        Event::GameOver { score, new_record } => {
            let suffix = if *new_record { ", new record" } else { "" };
            println!("game over at {score}{suffix}");
        }
        _ => {}
    }
}
