//! Read-only snapshot for presentation
//!
//! The renderer pulls a `Snapshot` each frame; the simulation never pushes.

use std::time::Duration;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::maze::Tile;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub pos: Vec2,
    pub cell: IVec2,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosiveView {
    pub cell: IVec2,
    pub fuse_remaining: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastView {
    pub cells: Vec<IVec2>,
    pub display_remaining: Duration,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    /// 1-based level number within the playthrough
    pub level: usize,
    pub score: u64,
    pub lives: u32,
    pub time_remaining: Duration,
    pub explosives_left: u32,
    pub phase: GamePhase,
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    pub tile_size: f32,
    /// Row-major tiles
    pub tiles: Vec<Vec<Tile>>,
    pub agent: EntityView,
    pub adversaries: Vec<EntityView>,
    pub explosives: Vec<ExplosiveView>,
    pub blasts: Vec<BlastView>,
    pub hud: Hud,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.clock.elapsed();
        let fuse = state.explosives.fuse();
        let display = state.explosives.display_window();

        Self {
            width: state.maze.width(),
            height: state.maze.height(),
            tile_size: state.config().tile_size,
            tiles: state.maze.rows().map(|row| row.to_vec()).collect(),
            agent: EntityView {
                pos: state.agent.body.pos,
                cell: state.agent.cell(),
                alive: state.agent.alive,
            },
            adversaries: state
                .adversaries
                .all()
                .iter()
                .map(|a| EntityView {
                    pos: a.body.pos,
                    cell: a.cell(),
                    alive: a.alive,
                })
                .collect(),
            explosives: state
                .explosives
                .armed()
                .iter()
                .map(|e| ExplosiveView {
                    cell: e.cell,
                    fuse_remaining: e.remaining(now, fuse),
                })
                .collect(),
            blasts: state
                .explosives
                .blasts()
                .iter()
                .map(|b| BlastView {
                    cells: b.cells.clone(),
                    display_remaining: display.saturating_sub(now.saturating_sub(b.created_at)),
                })
                .collect(),
            hud: Hud {
                level: state.level_index + 1,
                score: state.score,
                lives: state.lives,
                time_remaining: state.time_remaining,
                explosives_left: state
                    .agent
                    .max_explosives
                    .saturating_sub(state.agent.active_explosives),
                phase: state.phase,
            },
        }
    }

    pub fn tile(&self, cell: IVec2) -> Tile {
        usize::try_from(cell.y)
            .ok()
            .zip(usize::try_from(cell.x).ok())
            .and_then(|(y, x)| self.tiles.get(y)?.get(x).copied())
            .unwrap_or(Tile::Indestructible)
    }

    pub fn in_blast(&self, cell: IVec2) -> bool {
        self.blasts.iter().any(|b| b.cells.contains(&cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, GameConfig};
    use crate::sim::random::SeededRandom;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_capture_after_placement() {
        let mut rng = SeededRandom::seeded(31);
        let mut state =
            GameState::new(&GameConfig::default(), Difficulty::Easy, &mut rng).unwrap();
        let place = TickInput {
            place_explosive: true,
            ..Default::default()
        };
        tick(&mut state, &place, Duration::ZERO, &mut rng);
        tick(&mut state, &TickInput::default(), Duration::from_millis(500), &mut rng);

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.tiles.len(), 16);
        assert_eq!(snap.tiles[0].len(), 16);
        assert_eq!(snap.tile(IVec2::new(14, 14)), Tile::Goal);
        assert_eq!(snap.tile(IVec2::new(-1, 0)), Tile::Indestructible);
        assert_eq!(snap.explosives.len(), 1);
        assert_eq!(snap.explosives[0].fuse_remaining, Duration::from_millis(1500));
        assert_eq!(snap.hud.explosives_left, 0);
        assert_eq!(snap.hud.level, 1);
        assert_eq!(snap.adversaries.len(), 1);
        assert!(snap.agent.alive);
    }
}
