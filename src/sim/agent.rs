//! The player-controlled agent

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::movement::{Arena, Body, MovePolicy, resolve_tentative_move};

/// The player's bomber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub body: Body,
    pub speed: f32,
    pub alive: bool,
    /// Maximum concurrently armed explosives
    pub max_explosives: u32,
    /// Explosives placed and not yet resolved
    pub active_explosives: u32,
}

impl Agent {
    pub fn new(spawn: IVec2, tile_size: f32, speed: f32, max_explosives: u32) -> Self {
        Self {
            body: Body::at_cell(spawn, tile_size),
            speed,
            alive: true,
            max_explosives,
            active_explosives: 0,
        }
    }

    pub fn cell(&self) -> IVec2 {
        self.body.cell
    }

    /// Velocity straight from the intent, recomputed every tick
    pub fn set_intent(&mut self, move_x: i8, move_y: i8) {
        let dir = Vec2::new(f32::from(move_x.signum()), f32::from(move_y.signum()));
        self.body.vel = dir * self.speed;
    }

    /// Move one tick; walls stop the step but not the velocity
    pub fn update(&mut self, arena: &Arena<'_>) {
        if !self.alive {
            return;
        }
        resolve_tentative_move(&mut self.body, MovePolicy::AGENT, arena);
    }

    pub fn can_place_explosive(&self) -> bool {
        self.alive && self.active_explosives < self.max_explosives
    }

    /// Spend one explosive from the budget
    pub fn place_explosive(&mut self) -> bool {
        if self.can_place_explosive() {
            self.active_explosives += 1;
            true
        } else {
            false
        }
    }

    /// One of our explosives went off; its slot is free again
    pub fn explosive_resolved(&mut self) {
        self.active_explosives = self.active_explosives.saturating_sub(1);
    }

    pub fn die(&mut self) {
        if self.alive {
            self.alive = false;
            self.body.vel = Vec2::ZERO;
        }
    }
}
