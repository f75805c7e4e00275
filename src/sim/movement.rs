//! Tentative movement shared by the agent and adversaries
//!
//! Both apply their velocity, derive the new cell by rounding, and undo the
//! step if the destination is blocked. They differ in two policy flags: the
//! agent keeps its velocity and walks over explosives, adversaries lose their
//! velocity and treat armed explosives as walls.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::explosive::ExplosiveRegistry;
use super::maze::Maze;
use crate::{cell_to_pixel, pixel_to_cell};

/// Continuous position plus derived cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub cell: IVec2,
}

impl Body {
    pub fn at_cell(cell: IVec2, tile_size: f32) -> Self {
        Self {
            pos: cell_to_pixel(cell, tile_size),
            vel: Vec2::ZERO,
            cell,
        }
    }
}

/// How a blocked step is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePolicy {
    /// Zero the velocity when the step is undone
    pub reset_velocity_on_block: bool,
    /// Armed explosives block the destination cell
    pub explosives_block: bool,
}

impl MovePolicy {
    pub const AGENT: MovePolicy = MovePolicy {
        reset_velocity_on_block: false,
        explosives_block: false,
    };

    pub const ADVERSARY: MovePolicy = MovePolicy {
        reset_velocity_on_block: true,
        explosives_block: true,
    };
}

/// Grid geometry a move is resolved against
#[derive(Debug, Clone, Copy)]
pub struct Arena<'a> {
    pub maze: &'a Maze,
    pub explosives: &'a ExplosiveRegistry,
    pub tile_size: f32,
    /// Upper clamp for `Body::pos`
    pub max_pixel: Vec2,
}

/// Apply one tick of velocity; returns false if the step was undone
pub fn resolve_tentative_move(body: &mut Body, policy: MovePolicy, arena: &Arena<'_>) -> bool {
    body.pos += body.vel;
    let cell = pixel_to_cell(body.pos, arena.tile_size);

    let blocked = !arena.maze.is_walkable(cell)
        || (policy.explosives_block && arena.explosives.has_explosive_at(cell));

    if blocked {
        body.pos -= body.vel;
        if policy.reset_velocity_on_block {
            body.vel = Vec2::ZERO;
        }
    }

    body.pos = body.pos.clamp(Vec2::ZERO, arena.max_pixel);
    body.cell = pixel_to_cell(body.pos, arena.tile_size);
    !blocked
}
