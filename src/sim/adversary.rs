//! Roaming adversaries and their throttled AI
//!
//! Each adversary re-decides only every `decision_interval` ticks. Close to
//! the agent it chases along the axis with the larger delta; otherwise it
//! picks a random patrol direction (possibly standing still). The chosen
//! velocity is held until the next decision or until a blocked step zeroes it.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::movement::{Arena, Body, MovePolicy, resolve_tentative_move};
use super::random::RandomSource;
use crate::manhattan;

/// Patrol choices; the last one is "stay still"
pub const PATROL_DIRECTIONS: [Vec2; 5] = [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y, Vec2::ZERO];

/// AI tuning shared by all adversaries of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiParams {
    pub speed: f32,
    pub decision_interval: u32,
    /// Chase when the Manhattan distance is strictly below this
    pub chase_distance: i32,
}

/// A single adversary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub id: u32,
    pub body: Body,
    pub alive: bool,
    /// Ticks since the last decision
    pub decision_counter: u32,
}

impl Adversary {
    pub fn new(id: u32, spawn: IVec2, tile_size: f32) -> Self {
        Self {
            id,
            body: Body::at_cell(spawn, tile_size),
            alive: true,
            decision_counter: 0,
        }
    }

    pub fn cell(&self) -> IVec2 {
        self.body.cell
    }

    /// Count the tick, decide if the interval is up, then move
    pub fn update(
        &mut self,
        params: &AiParams,
        agent_cell: IVec2,
        arena: &Arena<'_>,
        rng: &mut dyn RandomSource,
    ) {
        if !self.alive {
            return;
        }

        self.decision_counter += 1;
        if self.decision_counter >= params.decision_interval {
            self.decision_counter = 0;
            self.decide(params, agent_cell, rng);
        }

        resolve_tentative_move(&mut self.body, MovePolicy::ADVERSARY, arena);
    }

    /// Chase if close, otherwise patrol
    pub fn decide(&mut self, params: &AiParams, agent_cell: IVec2, rng: &mut dyn RandomSource) {
        let distance = manhattan(agent_cell, self.cell());
        self.body.vel = if distance < params.chase_distance {
            chase_velocity(self.cell(), agent_cell, params.speed)
        } else {
            PATROL_DIRECTIONS[rng.pick(PATROL_DIRECTIONS.len())] * params.speed
        };
        log::debug!(
            "Adversary {} at {} decided {:?} (distance {})",
            self.id,
            self.cell(),
            self.body.vel,
            distance
        );
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.body.vel = Vec2::ZERO;
    }
}

/// Step toward `target` along the dominant axis
///
/// Horizontal wins only on a strictly larger delta; ties (including a zero
/// delta) move vertically, and a zero vertical delta moves up.
pub fn chase_velocity(from: IVec2, target: IVec2, speed: f32) -> Vec2 {
    let d = target - from;
    if d.x.abs() > d.y.abs() {
        Vec2::new(if d.x > 0 { speed } else { -speed }, 0.0)
    } else {
        Vec2::new(0.0, if d.y > 0 { speed } else { -speed })
    }
}

/// All adversaries of the current level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdversaryRegistry {
    adversaries: Vec<Adversary>,
}

impl AdversaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One adversary per spawn cell, ids from 1
    pub fn spawn(spawns: &[IVec2], tile_size: f32) -> Self {
        Self {
            adversaries: spawns
                .iter()
                .enumerate()
                .map(|(i, cell)| Adversary::new(i as u32 + 1, *cell, tile_size))
                .collect(),
        }
    }

    pub fn update(
        &mut self,
        params: &AiParams,
        agent_cell: IVec2,
        arena: &Arena<'_>,
        rng: &mut dyn RandomSource,
    ) {
        for adversary in self.adversaries.iter_mut().filter(|a| a.alive) {
            adversary.update(params, agent_cell, arena, rng);
        }
    }

    /// Kill every living adversary standing in `cells`; returns the victims
    pub fn kill_in(&mut self, cells: &[IVec2]) -> Vec<(u32, IVec2)> {
        let mut killed = Vec::new();
        for adversary in self.adversaries.iter_mut().filter(|a| a.alive) {
            if cells.contains(&adversary.cell()) {
                adversary.die();
                killed.push((adversary.id, adversary.cell()));
            }
        }
        killed
    }

    /// Whether a living adversary occupies `cell`
    pub fn occupies(&self, cell: IVec2) -> bool {
        self.living().any(|a| a.cell() == cell)
    }

    pub fn living(&self) -> impl Iterator<Item = &Adversary> {
        self.adversaries.iter().filter(|a| a.alive)
    }

    /// Every adversary including the dead (kept for presentation)
    pub fn all(&self) -> &[Adversary] {
        &self.adversaries
    }

    pub fn all_mut(&mut self) -> &mut [Adversary] {
        &mut self.adversaries
    }

    pub fn len(&self) -> usize {
        self.adversaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adversaries.is_empty()
    }
}
