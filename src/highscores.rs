//! High score persistence
//!
//! A single JSON record, `{ "high_score": N }`. Reading never fails: a
//! missing or malformed file counts as 0. Writing happens only when the score
//! improves.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    high_score: u64,
}

/// Best score, backed by a file
#[derive(Debug, Clone)]
pub struct HighScores {
    path: PathBuf,
    high_score: u64,
}

impl HighScores {
    pub const DEFAULT_FILE: &'static str = "high_score.json";

    /// Load from `path`, defaulting to 0 on any problem
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let high_score = read_record(&path).map_or(0, |r| r.high_score);
        log::info!("High score {} ({})", high_score, path.display());
        Self { path, high_score }
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a score beats the stored one
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.high_score
    }

    /// Record a finished run. Writes the file only on improvement and returns
    /// whether it did.
    pub fn update(&mut self, score: u64) -> Result<bool, StoreError> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        self.high_score = score;
        self.save()?;
        Ok(true)
    }

    /// Overwrite the whole record
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&Record {
            high_score: self.high_score,
        })?;
        fs::write(&self.path, json)?;
        log::info!("High score saved ({})", self.high_score);
        Ok(())
    }
}

fn read_record(path: &Path) -> Option<Record> {
    let json = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&json) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("Ignoring malformed high score file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snake-rush-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_is_zero() {
        let path = temp_path("missing.json");
        let _ = fs::remove_file(&path);
        assert_eq!(HighScores::load(&path).high_score(), 0);
    }

    #[test]
    fn test_corrupt_file_is_zero() {
        let path = temp_path("corrupt.json");
        for bad in ["{ not json", r#"{"high_score": -3}"#, "42"] {
            fs::write(&path, bad).unwrap();
            assert_eq!(HighScores::load(&path).high_score(), 0);
        }
        fs::write(&path, r#"{"other": 1}"#).unwrap();
        assert_eq!(HighScores::load(&path).high_score(), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_reload_round_trip() {
        let path = temp_path("roundtrip.json");
        let _ = fs::remove_file(&path);
        let mut scores = HighScores::load(&path);
        assert!(scores.update(130).unwrap());
        assert_eq!(HighScores::load(&path).high_score(), 130);
        let json = fs::read_to_string(&path).unwrap();
        assert_eq!(json, r#"{"high_score":130}"#);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_only_improvements_are_written() {
        let path = temp_path("improve.json");
        let _ = fs::remove_file(&path);
        let mut scores = HighScores::load(&path);
        assert!(scores.update(50).unwrap());
        assert!(!scores.update(50).unwrap());
        assert!(!scores.update(20).unwrap());
        assert_eq!(HighScores::load(&path).high_score(), 50);
        assert!(scores.update(60).unwrap());
        assert_eq!(HighScores::load(&path).high_score(), 60);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let path = temp_path("zero.json");
        let _ = fs::remove_file(&path);
        let mut scores = HighScores::load(&path);
        assert!(!scores.update(0).unwrap());
        assert!(!path.exists());
    }
}
