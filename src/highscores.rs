//! Best-score persistence
//!
//! Stored as a small JSON file next to the binary's working directory.
//! A missing or corrupt file reads as a best score of zero.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Default file name for the store
    pub const STORAGE_FILE: &'static str = "bomber_quest_highscore.json";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Load from `path`, falling back to zero
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("Failed to read high score {}: {}", path.display(), e);
                return Self::new();
            }
        };

        match serde_json::from_str::<HighScore>(&json) {
            Ok(score) => {
                log::info!("Loaded high score {}", score.best);
                score
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }

    /// Keep `score` if it beats the best; returns true when it does
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}
