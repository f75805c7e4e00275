//! Error types for the outer surfaces (config, persistence, presentation)
//!
//! The simulation itself never fails: rejected placements are booleans and
//! out-of-bounds queries fall back to walls.

use std::path::PathBuf;

use glam::IVec2;
use thiserror::Error;

/// Invalid or unreadable game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small (minimum 5x5)")]
    GridTooSmall { width: i32, height: i32 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("level {level}: wall density {density} must be between 0.0 and 1.0")]
    Density { level: usize, density: f32 },
    #[error("level {level}: goal {goal} is not an interior cell")]
    GoalOutside { level: usize, goal: IVec2 },
    #[error("level {level}: explosive budget must be at least 1")]
    EmptyBudget { level: usize },
    #[error("adversary spawn {cell} is not an interior cell")]
    SpawnOutside { cell: IVec2 },
    #[error("spawn {cell} is on a pillar or outside the safe zone")]
    SpawnBlocked { cell: IVec2 },
    #[error("unknown difficulty '{0}' (easy, medium, hard)")]
    UnknownDifficulty(String),
    #[error("level table is empty")]
    NoLevels,
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best-score store failure
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high score encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// Presentation surface could not be attached
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("render surface unavailable")]
    Unavailable,
    #[error("surface {width}x{height} cannot fit a {columns}x{rows} grid")]
    TooSmall {
        width: usize,
        height: usize,
        columns: usize,
        rows: usize,
    },
}
