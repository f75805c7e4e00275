//! Rules engine: placement checks, blast effects and terminal conditions
//!
//! Pure functions over the current session state. The tick calls them in a
//! fixed order; see `tick::tick`.

use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::adversary::AdversaryRegistry;
use super::agent::Agent;
use super::explosive::ExplosiveRegistry;
use super::maze::{Maze, Tile};

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    CaughtInBlast,
    CaughtByAdversary,
    TimeExpired,
}

impl LossReason {
    pub fn message(&self) -> &'static str {
        match self {
            LossReason::CaughtInBlast => "Caught in explosion!",
            LossReason::CaughtByAdversary => "Hit by enemy!",
            LossReason::TimeExpired => "Time's up!",
        }
    }
}

/// Outcome of the end-of-tick check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Won,
    Lost(LossReason),
}

/// Effects of one blast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlastReport {
    /// Walls turned to floor by this blast
    pub destroyed: Vec<IVec2>,
    pub agent_hit: bool,
    /// (adversary id, cell) of each kill
    pub killed: Vec<(u32, IVec2)>,
}

impl BlastReport {
    pub fn points(&self, per_wall: u64, per_adversary: u64) -> u64 {
        self.destroyed.len() as u64 * per_wall + self.killed.len() as u64 * per_adversary
    }
}

/// Explosives go only on free, walkable cells
pub fn can_place_explosive_here(cell: IVec2, maze: &Maze, explosives: &ExplosiveRegistry) -> bool {
    !explosives.has_explosive_at(cell) && maze.is_walkable(cell)
}

/// Apply a blast to walls, the agent and adversaries
///
/// Wall destruction and hit tests both run over the whole blast set.
pub fn apply_blast(
    cells: &[IVec2],
    maze: &mut Maze,
    agent: &Agent,
    adversaries: &mut AdversaryRegistry,
) -> BlastReport {
    let destroyed = cells
        .iter()
        .copied()
        .filter(|cell| maze.destroy_wall(*cell))
        .collect();

    BlastReport {
        destroyed,
        agent_hit: agent.alive && cells.contains(&agent.cell()),
        killed: adversaries.kill_in(cells),
    }
}

/// Decide whether the level ends this tick
///
/// Every loss condition is checked before the goal, so standing on the goal
/// inside a blast is a loss.
pub fn evaluate(
    agent: &Agent,
    maze: &Maze,
    explosives: &ExplosiveRegistry,
    adversaries: &AdversaryRegistry,
    agent_hit: bool,
    time_remaining: Duration,
) -> Verdict {
    let cell = agent.cell();

    if agent_hit || explosives.is_in_blast(cell) {
        return Verdict::Lost(LossReason::CaughtInBlast);
    }
    if adversaries.occupies(cell) {
        return Verdict::Lost(LossReason::CaughtByAdversary);
    }
    if time_remaining.is_zero() {
        return Verdict::Lost(LossReason::TimeExpired);
    }
    if maze.tile_at(cell) == Tile::Goal {
        return Verdict::Won;
    }
    Verdict::Continue
}
