//! Simulation tick
//!
//! Order within a tick: agent movement, explosive placement, fuse expiry,
//! blast effects, adversary AI and movement, then the win/lose check.

use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::autopilot;
use super::movement::Arena;
use super::random::RandomSource;
use super::rules::{self, LossReason, Verdict};
use super::state::{GamePhase, GameState};

/// Intent for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// -1, 0 or 1
    pub move_x: i8,
    /// -1, 0 or 1 (positive is down)
    pub move_y: i8,
    /// Edge-triggered: the host clears it after one tick
    pub place_explosive: bool,
    /// Pause toggle
    pub pause: bool,
    /// Attract mode: the autopilot plays
    pub idle_mode: bool,
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ExplosivePlaced { cell: IVec2 },
    Detonated { origin: IVec2, cells: usize },
    WallDestroyed { cell: IVec2 },
    AdversaryKilled { id: u32, cell: IVec2 },
    LevelComplete { level: usize, score: u64 },
    LifeLost { reason: LossReason, lives: u32 },
    GameOver { reason: LossReason, score: u64 },
}

/// Advance the session by one tick
///
/// `now` is the host's monotonic clock sample for this tick.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    now: Duration,
    rng: &mut dyn RandomSource,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // The interval since the last sample counts if we were running during it
    let now = state
        .clock
        .sample(now, state.phase == GamePhase::Playing);

    if input.pause {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    state.level_ticks += 1;
    state.time_remaining = state
        .current_level()
        .time_limit()
        .saturating_sub(state.level_elapsed());

    let mut input = input.clone();
    if input.idle_mode {
        let intent = autopilot::intent(state);
        input.move_x = intent.move_x;
        input.move_y = intent.move_y;
        input.place_explosive = intent.place_explosive;
    }

    let tile_size = state.config().tile_size;
    let max_pixel = state.config().max_pixel();

    // Agent movement
    state.agent.set_intent(input.move_x, input.move_y);
    {
        let arena = Arena {
            maze: &state.maze,
            explosives: &state.explosives,
            tile_size,
            max_pixel,
        };
        state.agent.update(&arena);
    }

    // Placement
    if input.place_explosive {
        let cell = state.agent.cell();
        if rules::can_place_explosive_here(cell, &state.maze, &state.explosives)
            && state
                .explosives
                .place(cell, now, &state.maze, state.agent.can_place_explosive())
        {
            state.agent.place_explosive();
            events.push(GameEvent::ExplosivePlaced { cell });
        }
    }

    // Fuses and blast effects
    let mut agent_hit = false;
    for blast in state.explosives.update(now, &state.maze) {
        state.agent.explosive_resolved();
        let report = rules::apply_blast(
            &blast.cells,
            &mut state.maze,
            &state.agent,
            &mut state.adversaries,
        );
        agent_hit |= report.agent_hit;
        state.score += report.points(
            state.config().points_per_wall,
            state.config().points_per_adversary,
        );

        events.push(GameEvent::Detonated {
            origin: blast.origin,
            cells: blast.cells.len(),
        });
        events.extend(
            report
                .destroyed
                .iter()
                .map(|&cell| GameEvent::WallDestroyed { cell }),
        );
        for &(id, cell) in &report.killed {
            log::debug!("Adversary {} killed at {}", id, cell);
            events.push(GameEvent::AdversaryKilled { id, cell });
        }
    }

    // Adversaries see the post-blast maze
    {
        let arena = Arena {
            maze: &state.maze,
            explosives: &state.explosives,
            tile_size,
            max_pixel,
        };
        state
            .adversaries
            .update(&state.ai, state.agent.cell(), &arena, rng);
    }

    let verdict = rules::evaluate(
        &state.agent,
        &state.maze,
        &state.explosives,
        &state.adversaries,
        agent_hit,
        state.time_remaining,
    );
    match verdict {
        Verdict::Continue => {}
        Verdict::Won => {
            state.win_level();
            events.push(GameEvent::LevelComplete {
                level: state.level_index,
                score: state.score,
            });
        }
        Verdict::Lost(reason) => {
            state.lose_life(reason);
            if state.is_finished() {
                events.push(GameEvent::GameOver {
                    reason,
                    score: state.score,
                });
            } else {
                events.push(GameEvent::LifeLost {
                    reason,
                    lives: state.lives,
                });
            }
        }
    }

    events
}
