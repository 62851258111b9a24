//! High-score persistence for the command-line adapter.
//!
//! The score lives in a tiny JSON document. A missing or corrupt file reads
//! as zero so a fresh install never fails; writes go through a temp file and
//! rename so a crash never truncates the stored score.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// Reads the stored high score, defaulting to zero when the file is missing
/// or unreadable.
pub(crate) fn load(path: &Path) -> u32 {
    let Ok(contents) = fs::read_to_string(path) else {
        return 0;
    };
    serde_json::from_str::<HighScoreFile>(&contents)
        .map(|file| file.high_score)
        .unwrap_or(0)
}

/// Stores a new high score, replacing the previous file atomically.
pub(crate) fn store(path: &Path, high_score: u32) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating score directory {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(&HighScoreFile { high_score })
        .context("encoding high score")?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .with_context(|| format!("writing temp score file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("replacing score file {}", path.display()))?;
    Ok(())
}
