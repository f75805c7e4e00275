//! Level session state
//!
//! One `GameState` lives for a whole playthrough of a difficulty tier. Each
//! level rebuilds the maze, agent, adversaries and explosives; score and
//! lives carry over.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::adversary::{AdversaryRegistry, AiParams};
use super::agent::Agent;
use super::explosive::ExplosiveRegistry;
use super::maze::Maze;
use super::random::RandomSource;
use super::rules::LossReason;
use crate::config::{Difficulty, GameConfig, LevelConfig};
use crate::error::ConfigError;

/// Current phase of a playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ticks are ignored apart from the pause toggle; the clock is frozen
    Paused,
    /// Goal reached, waiting for `advance`
    LevelComplete,
    /// A life was lost, waiting for `advance` to retry the level
    LifeLost(LossReason),
    /// No lives left
    GameOver(LossReason),
    /// Every level of the tier cleared
    Victory,
}

/// Session time built from host clock samples
///
/// Only time spent while running is accumulated, so a pause freezes fuses,
/// blast display and the countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClock {
    last_sample: Option<Duration>,
    elapsed: Duration,
}

impl SessionClock {
    /// Record a host sample and return the session time
    pub fn sample(&mut self, now: Duration, running: bool) -> Duration {
        if let Some(last) = self.last_sample {
            if running {
                self.elapsed += now.saturating_sub(last);
            }
        }
        self.last_sample = Some(now);
        self.elapsed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Forget the last sample; the next interval starts from the next sample
    pub fn rebase(&mut self) {
        self.last_sample = None;
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    pub difficulty: Difficulty,
    /// Ordered levels of the chosen tier
    pub levels: Vec<LevelConfig>,
    /// Index into `levels` (0-based)
    pub level_index: usize,
    pub score: u64,
    pub lives: u32,
    pub phase: GamePhase,
    pub clock: SessionClock,
    /// Session time at which the current level started
    pub level_started_at: Duration,
    pub time_remaining: Duration,
    /// Ticks simulated in the current level
    pub level_ticks: u64,
    pub ai: AiParams,
    pub maze: Maze,
    pub agent: Agent,
    pub adversaries: AdversaryRegistry,
    pub explosives: ExplosiveRegistry,
}

impl GameState {
    /// Start a playthrough of `difficulty` at its first level
    pub fn new(
        config: &GameConfig,
        difficulty: Difficulty,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, ConfigError> {
        let levels = config.levels_for(difficulty);
        let Some(first) = levels.first() else {
            return Err(ConfigError::NoLevels);
        };

        let mut state = Self {
            difficulty,
            level_index: 0,
            score: 0,
            lives: config.max_lives,
            phase: GamePhase::Playing,
            clock: SessionClock::default(),
            level_started_at: Duration::ZERO,
            time_remaining: first.time_limit(),
            level_ticks: 0,
            ai: AiParams {
                speed: config.adversary_speed,
                decision_interval: config.decision_interval,
                chase_distance: config.chase_distance,
            },
            maze: Maze::bordered(config.grid_width, config.grid_height, first.goal),
            agent: Agent::new(
                config.agent_spawn,
                config.tile_size,
                config.agent_speed,
                first.explosive_budget,
            ),
            adversaries: AdversaryRegistry::new(),
            explosives: ExplosiveRegistry::new(
                config.fuse(),
                config.blast_radius,
                config.blast_display(),
            ),
            config: config.clone(),
            levels,
        };
        state.start_level(rng);
        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_level(&self) -> &LevelConfig {
        &self.levels[self.level_index.min(self.levels.len() - 1)]
    }

    /// (Re)build the current level from scratch
    pub fn start_level(&mut self, rng: &mut dyn RandomSource) {
        let level = self.current_level().clone();
        let config = &self.config;

        self.maze = Maze::generate(config, &level, rng);
        self.agent = Agent::new(
            config.agent_spawn,
            config.tile_size,
            config.agent_speed,
            level.explosive_budget,
        );
        let spawns: Vec<_> = config
            .adversary_spawns
            .iter()
            .take(level.adversary_count as usize)
            .copied()
            .collect();
        self.adversaries = AdversaryRegistry::spawn(&spawns, config.tile_size);
        self.explosives.clear();

        // Time spent between levels is not charged to this one
        self.clock.rebase();
        self.level_started_at = self.clock.elapsed();
        self.time_remaining = level.time_limit();
        self.level_ticks = 0;
        self.phase = GamePhase::Playing;

        log::info!(
            "Level {} ({} #{}) started: density {:.2}, {}s, {} explosives, {} adversaries",
            self.level_index + 1,
            level.difficulty.as_str(),
            level.number,
            level.wall_density,
            level.time_limit_secs,
            level.explosive_budget,
            self.adversaries.len()
        );
    }

    /// Record a win: bonus points, wait for `advance`
    pub fn win_level(&mut self) {
        self.score += self.config.level_bonus;
        self.phase = GamePhase::LevelComplete;
        log::info!(
            "Level {} complete, score {}",
            self.level_index + 1,
            self.score
        );
    }

    /// Record a loss: the agent dies and a life is spent
    pub fn lose_life(&mut self, reason: LossReason) {
        if !matches!(self.phase, GamePhase::Playing) {
            return;
        }
        self.agent.die();
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver(reason);
            log::info!("Game over ({}): final score {}", reason.message(), self.score);
        } else {
            self.phase = GamePhase::LifeLost(reason);
            log::info!("{} Lives remaining: {}", reason.message(), self.lives);
        }
    }

    /// Leave an end-of-level phase: next level, retry, or victory
    ///
    /// Returns false if there is nothing to advance from.
    pub fn advance(&mut self, rng: &mut dyn RandomSource) -> bool {
        match self.phase {
            GamePhase::LevelComplete => {
                self.level_index += 1;
                if self.level_index >= self.levels.len() {
                    self.level_index = self.levels.len() - 1;
                    self.phase = GamePhase::Victory;
                    log::info!("All levels complete! Final score {}", self.score);
                } else {
                    self.start_level(rng);
                }
                true
            }
            GamePhase::LifeLost(_) => {
                self.start_level(rng);
                true
            }
            _ => false,
        }
    }

    /// The playthrough has ended (game over or victory)
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_) | GamePhase::Victory)
    }

    /// Session time elapsed in the current level
    pub fn level_elapsed(&self) -> Duration {
        self.clock.elapsed().saturating_sub(self.level_started_at)
    }
}
