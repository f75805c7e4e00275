//! Bomber Quest - A tile-based bomber arcade game
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (maze, explosives, adversaries, rules)
//! - `config`: Immutable game configuration and the level table
//! - `renderer`: Pull-based presentation of simulation snapshots
//! - `platform`: Clock, input and the tick runner
//! - `highscores`: Best-score persistence

pub mod config;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{Difficulty, GameConfig, LevelConfig};
pub use error::{ConfigError, PersistError, SurfaceError};
pub use highscores::HighScore;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per display frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Grid dimensions (640 / 40 = 16x16)
    pub const GRID_WIDTH: i32 = 16;
    pub const GRID_HEIGHT: i32 = 16;
    pub const TILE_SIZE: f32 = 40.0;

    pub const MAX_LIVES: u32 = 3;

    /// Agent defaults
    pub const AGENT_START_X: i32 = 1;
    pub const AGENT_START_Y: i32 = 1;
    pub const AGENT_SPEED: f32 = 2.0; // pixels per tick

    /// Explosive defaults
    pub const FUSE_MS: u64 = 2000;
    pub const BLAST_RADIUS: i32 = 2;
    pub const BLAST_DISPLAY_MS: u64 = 200;

    /// Adversary defaults
    pub const ADVERSARY_SPEED: f32 = 1.5; // pixels per tick
    pub const DECISION_INTERVAL: u32 = 60; // ticks between decisions
    pub const CHASE_DISTANCE: i32 = 6;

    /// Spawn-adjacent cells with x < SAFE_ZONE and y < SAFE_ZONE stay clear
    pub const SAFE_ZONE: i32 = 3;

    /// Scoring
    pub const POINTS_PER_WALL: u64 = 10;
    pub const POINTS_PER_ADVERSARY: u64 = 50;
    pub const LEVEL_BONUS: u64 = 200;
}

/// Cell coordinate to the pixel position of its top-left corner
#[inline]
pub fn cell_to_pixel(cell: IVec2, tile_size: f32) -> Vec2 {
    cell.as_vec2() * tile_size
}

/// Pixel position to the cell it rounds into
#[inline]
pub fn pixel_to_cell(pos: Vec2, tile_size: f32) -> IVec2 {
    (pos / tile_size).round().as_ivec2()
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}
