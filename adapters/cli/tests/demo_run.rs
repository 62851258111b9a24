use std::process::Command;

use tempfile::tempdir;

fn run_demo(seed: u64, ticks: u64, score_file: &std::path::Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_maze-chase"))
        .args([
            "--seed",
            &seed.to_string(),
            "--ticks",
            &ticks.to_string(),
            "--high-score-file",
        ])
        .arg(score_file)
        .output()
        .expect("demo binary runs")
}

#[test]
fn demo_session_runs_to_completion() {
    let dir = tempdir().expect("temp dir");
    let output = run_demo(42, 400, &dir.path().join("scores.json"));

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.contains("seed 42"));
    assert!(stdout.contains("finished:"));
}

/// Stdout lines minus the record-saved line, which names the per-run
/// score file path.
fn transcript(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.starts_with("new record saved to "))
        .map(str::to_owned)
        .collect()
}

#[test]
fn identical_seeds_print_identical_transcripts() {
    let dir = tempdir().expect("temp dir");
    let first = run_demo(7, 600, &dir.path().join("first.json"));
    let second = run_demo(7, 600, &dir.path().join("second.json"));

    assert!(first.status.success());
    assert!(second.status.success());
    assert_eq!(transcript(&first.stdout), transcript(&second.stdout));
}

#[test]
fn rejects_a_zero_length_frame() {
    let dir = tempdir().expect("temp dir");
    let output = Command::new(env!("CARGO_BIN_EXE_maze-chase"))
        .args(["--seed", "1", "--ticks", "10", "--tick-ms", "0", "--high-score-file"])
        .arg(dir.path().join("scores.json"))
        .output()
        .expect("demo binary runs");

    assert!(!output.status.success());
}
