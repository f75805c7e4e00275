//! Game configuration and the level table
//!
//! A `GameConfig` is built once (default or loaded from JSON) and handed to
//! the session by reference. Nothing reads configuration from globals.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Difficulty tier grouping an ordered run of levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Per-level parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub difficulty: Difficulty,
    /// 1-based number within the tier
    pub number: u32,
    /// Probability that an eligible interior cell becomes a destructible wall
    pub wall_density: f32,
    pub goal: IVec2,
    pub time_limit_secs: u32,
    /// Maximum concurrently armed explosives
    pub explosive_budget: u32,
    pub adversary_count: u32,
}

impl LevelConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_limit_secs))
    }
}

/// Five levels per tier
fn default_levels() -> Vec<LevelConfig> {
    let goal = IVec2::new(GRID_WIDTH - 2, GRID_HEIGHT - 2);
    let mut levels = Vec::with_capacity(15);

    for i in 0..5u32 {
        levels.push(LevelConfig {
            difficulty: Difficulty::Easy,
            number: i + 1,
            wall_density: 0.2 + i as f32 * 0.05,
            goal,
            time_limit_secs: 120 - i * 5,
            explosive_budget: 1,
            adversary_count: 1,
        });
    }
    for i in 0..5u32 {
        levels.push(LevelConfig {
            difficulty: Difficulty::Medium,
            number: i + 1,
            wall_density: 0.35 + i as f32 * 0.05,
            goal,
            time_limit_secs: 100 - i * 5,
            explosive_budget: 1 + i / 2,
            adversary_count: 1 + i,
        });
    }
    for i in 0..5u32 {
        levels.push(LevelConfig {
            difficulty: Difficulty::Hard,
            number: i + 1,
            wall_density: 0.45 + i as f32 * 0.05,
            goal,
            time_limit_secs: 80 - i * 5,
            explosive_budget: 2 + i / 2,
            adversary_count: 2 + i,
        });
    }

    levels
}

/// Complete, immutable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    // === Geometry ===
    pub grid_width: i32,
    pub grid_height: i32,
    /// Pixels per tile (continuous positions are in pixels)
    pub tile_size: f32,
    pub ticks_per_second: u32,

    // === Agent ===
    pub agent_spawn: IVec2,
    pub agent_speed: f32,
    pub max_lives: u32,

    // === Explosives ===
    pub fuse_ms: u64,
    pub blast_radius: i32,
    /// How long a blast stays visible (no gameplay effect)
    pub blast_display_ms: u64,

    // === Adversaries ===
    pub adversary_speed: f32,
    pub decision_interval: u32,
    /// Adversaries chase when the Manhattan distance is below this
    pub chase_distance: i32,
    /// Spawn cells in order; adversaries beyond this list are not spawned
    pub adversary_spawns: Vec<IVec2>,

    // === Maze ===
    pub safe_zone: i32,

    // === Scoring ===
    pub points_per_wall: u64,
    pub points_per_adversary: u64,
    pub level_bonus: u64,

    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let adversary_spawns = (0..6)
            .map(|i| IVec2::new(GRID_WIDTH - 3 - 2 * i, GRID_HEIGHT - 3 - 2 * i))
            .collect();

        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            tile_size: TILE_SIZE,
            ticks_per_second: TICKS_PER_SECOND,

            agent_spawn: IVec2::new(AGENT_START_X, AGENT_START_Y),
            agent_speed: AGENT_SPEED,
            max_lives: MAX_LIVES,

            fuse_ms: FUSE_MS,
            blast_radius: BLAST_RADIUS,
            blast_display_ms: BLAST_DISPLAY_MS,

            adversary_speed: ADVERSARY_SPEED,
            decision_interval: DECISION_INTERVAL,
            chase_distance: CHASE_DISTANCE,
            adversary_spawns,

            safe_zone: SAFE_ZONE,

            points_per_wall: POINTS_PER_WALL,
            points_per_adversary: POINTS_PER_ADVERSARY,
            level_bonus: LEVEL_BONUS,

            levels: default_levels(),
        }
    }
}

impl GameConfig {
    pub fn fuse(&self) -> Duration {
        Duration::from_millis(self.fuse_ms)
    }

    pub fn blast_display(&self) -> Duration {
        Duration::from_millis(self.blast_display_ms)
    }

    /// Duration of one tick at the configured rate
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }

    /// Largest pixel coordinate a body's top-left corner may reach
    pub fn max_pixel(&self) -> glam::Vec2 {
        glam::Vec2::new(
            (self.grid_width - 1) as f32 * self.tile_size,
            (self.grid_height - 1) as f32 * self.tile_size,
        )
    }

    /// Whether a cell lies strictly inside the border ring
    pub fn is_interior(&self, cell: IVec2) -> bool {
        cell.x > 0 && cell.y > 0 && cell.x < self.grid_width - 1 && cell.y < self.grid_height - 1
    }

    /// Interior cell covered by the fixed pillar lattice (even, even)
    pub fn is_pillar(&self, cell: IVec2) -> bool {
        self.is_interior(cell) && cell.x % 2 == 0 && cell.y % 2 == 0
    }

    /// Ordered levels of one difficulty tier
    pub fn levels_for(&self, difficulty: Difficulty) -> Vec<LevelConfig> {
        self.levels
            .iter()
            .filter(|l| l.difficulty == difficulty)
            .cloned()
            .collect()
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 5 || self.grid_height < 5 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let positive = [
            ("tile_size", f64::from(self.tile_size)),
            ("agent_speed", f64::from(self.agent_speed)),
            ("adversary_speed", f64::from(self.adversary_speed)),
            ("ticks_per_second", f64::from(self.ticks_per_second)),
            ("decision_interval", f64::from(self.decision_interval)),
            ("blast_radius", f64::from(self.blast_radius)),
            ("max_lives", f64::from(self.max_lives)),
            ("fuse_ms", self.fuse_ms as f64),
        ];
        for (field, value) in positive {
            // NaN must fail too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !self.is_interior(self.agent_spawn) {
            return Err(ConfigError::SpawnOutside {
                cell: self.agent_spawn,
            });
        }
        // Outside the safe zone the agent could be walled in by generation
        let spawn = self.agent_spawn;
        if self.is_pillar(spawn) || spawn.x >= self.safe_zone || spawn.y >= self.safe_zone {
            return Err(ConfigError::SpawnBlocked { cell: spawn });
        }
        for &cell in &self.adversary_spawns {
            if !self.is_interior(cell) {
                return Err(ConfigError::SpawnOutside { cell });
            }
            if self.is_pillar(cell) {
                return Err(ConfigError::SpawnBlocked { cell });
            }
        }

        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (level, cfg) in self.levels.iter().enumerate() {
            if !(0.0..=1.0).contains(&cfg.wall_density) {
                return Err(ConfigError::Density {
                    level,
                    density: cfg.wall_density,
                });
            }
            if !self.is_interior(cfg.goal) {
                return Err(ConfigError::GoalOutside {
                    level,
                    goal: cfg.goal,
                });
            }
            if cfg.explosive_budget == 0 {
                return Err(ConfigError::EmptyBudget { level });
            }
        }

        Ok(())
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!(
            "Loaded config from {} ({} levels)",
            path.display(),
            config.levels.len()
        );
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.levels.len(), 15);
    }

    #[test]
    fn test_levels_for_tier() {
        let config = GameConfig::default();
        let hard = config.levels_for(Difficulty::Hard);
        assert_eq!(hard.len(), 5);
        assert_eq!(hard[0].explosive_budget, 2);
        assert_eq!(hard[0].adversary_count, 2);
        assert_eq!(hard[4].explosive_budget, 4);
        assert_eq!(hard[4].adversary_count, 6);
        assert_eq!(hard[4].time_limit_secs, 60);

        let medium = config.levels_for(Difficulty::Medium);
        assert_eq!(medium[3].explosive_budget, 2);
        assert!((medium[2].wall_density - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("HARD".parse::<Difficulty>().ok(), Some(Difficulty::Hard));
        assert_eq!("med".parse::<Difficulty>().ok(), Some(Difficulty::Medium));
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_validate_rejects_spawn_on_pillar() {
        let mut config = GameConfig::default();
        config.adversary_spawns[0] = IVec2::new(12, 12);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnBlocked { cell }) if cell == IVec2::new(12, 12)
        ));
    }

    #[test]
    fn test_validate_rejects_agent_outside_safe_zone() {
        let config = GameConfig {
            agent_spawn: IVec2::new(5, 1),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnBlocked { .. })
        ));

        let config = GameConfig {
            agent_spawn: IVec2::new(2, 2),
            safe_zone: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnBlocked { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_density() {
        let mut config = GameConfig::default();
        config.levels[3].wall_density = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Density { level: 3, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_goal_on_border() {
        let mut config = GameConfig::default();
        config.levels[0].goal = IVec2::new(15, 15);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GoalOutside { level: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = GameConfig {
            decision_interval: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "decision_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_save_load_file() {
        let path = std::env::temp_dir().join(format!(
            "bomber_quest_config_{}.json",
            std::process::id()
        ));
        let config = GameConfig {
            fuse_ms: 1500,
            ..GameConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("bomber_quest_definitely_missing.json");
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
