//! Tile grid and wall lifecycle
//!
//! The border ring is always indestructible. A destructible wall turns into
//! empty floor only through a blast and never comes back.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::config::{GameConfig, LevelConfig};

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Destructible,
    Indestructible,
    /// Level exit; walkable
    Goal,
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Goal)
    }
}

/// Fixed-size tile grid for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maze {
    width: i32,
    height: i32,
    /// Row-major, `height` rows of `width` tiles
    tiles: Vec<Tile>,
    goal: IVec2,
}

impl Maze {
    /// Border walls only, with the goal placed at `goal`
    pub fn bordered(width: i32, height: i32, goal: IVec2) -> Self {
        let mut maze = Self {
            width,
            height,
            tiles: vec![Tile::Empty; (width.max(0) * height.max(0)) as usize],
            goal,
        };
        for x in 0..width {
            maze.put(IVec2::new(x, 0), Tile::Indestructible);
            maze.put(IVec2::new(x, height - 1), Tile::Indestructible);
        }
        for y in 0..height {
            maze.put(IVec2::new(0, y), Tile::Indestructible);
            maze.put(IVec2::new(width - 1, y), Tile::Indestructible);
        }
        maze.put(goal, Tile::Goal);
        maze
    }

    /// Procedural layout: border, pillar lattice, random destructibles, goal
    pub fn generate(config: &GameConfig, level: &LevelConfig, rng: &mut dyn RandomSource) -> Self {
        let (w, h) = (config.grid_width, config.grid_height);
        let mut maze = Self::bordered(w, h, level.goal);

        for y in (2..h - 1).step_by(2) {
            for x in (2..w - 1).step_by(2) {
                maze.put(IVec2::new(x, y), Tile::Indestructible);
            }
        }

        let spawns: Vec<IVec2> = config
            .adversary_spawns
            .iter()
            .take(level.adversary_count as usize)
            .copied()
            .collect();

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let cell = IVec2::new(x, y);
                if maze.tile_at(cell) != Tile::Empty {
                    continue;
                }
                if x < config.safe_zone && y < config.safe_zone {
                    continue;
                }
                if spawns.contains(&cell) {
                    continue;
                }
                if rng.chance(level.wall_density) {
                    maze.put(cell, Tile::Destructible);
                }
            }
        }

        // Stamped again: the pillar lattice may have covered it
        maze.put(level.goal, Tile::Goal);

        log::debug!(
            "Generated {}x{} maze: {} destructible walls, goal at {}",
            w,
            h,
            maze.count(Tile::Destructible),
            level.goal
        );
        maze
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn goal(&self) -> IVec2 {
        self.goal
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Tile at `cell`; anything outside the grid reads as indestructible
    pub fn tile_at(&self, cell: IVec2) -> Tile {
        self.index(cell)
            .map(|i| self.tiles[i])
            .unwrap_or(Tile::Indestructible)
    }

    pub fn is_walkable(&self, cell: IVec2) -> bool {
        self.tile_at(cell).is_walkable()
    }

    /// Clear a destructible wall; false (and no change) for anything else
    pub fn destroy_wall(&mut self, cell: IVec2) -> bool {
        match self.index(cell) {
            Some(i) if self.tiles[i] == Tile::Destructible => {
                self.tiles[i] = Tile::Empty;
                true
            }
            _ => false,
        }
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Rows top to bottom, for presentation
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }

    /// Cells on the outer ring
    pub fn is_border(&self, cell: IVec2) -> bool {
        self.in_bounds(cell)
            && (cell.x == 0 || cell.y == 0 || cell.x == self.width - 1 || cell.y == self.height - 1)
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    fn put(&mut self, cell: IVec2, tile: Tile) {
        if let Some(i) = self.index(cell) {
            self.tiles[i] = tile;
        }
    }

    /// Overwrite an interior tile (test layouts)
    #[cfg(test)]
    pub(crate) fn set(&mut self, cell: IVec2, tile: Tile) {
        assert!(!self.is_border(cell), "border cells are fixed");
        self.put(cell, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SeededRandom;
    use proptest::prelude::*;

    fn level(density: f32) -> LevelConfig {
        LevelConfig {
            wall_density: density,
            ..GameConfig::default().levels[0].clone()
        }
    }

    #[test]
    fn test_generate_structure() {
        let config = GameConfig::default();
        let mut rng = SeededRandom::seeded(1);
        let maze = Maze::generate(&config, &level(0.5), &mut rng);

        assert_eq!(maze.count(Tile::Goal), 1);
        assert_eq!(maze.tile_at(IVec2::new(14, 14)), Tile::Goal);
        // Pillar lattice
        assert_eq!(maze.tile_at(IVec2::new(2, 2)), Tile::Indestructible);
        assert_eq!(maze.tile_at(IVec2::new(12, 6)), Tile::Indestructible);
        // Safe zone stays open
        for y in 1..3 {
            for x in 1..3 {
                let cell = IVec2::new(x, y);
                if cell != IVec2::new(2, 2) {
                    assert_eq!(maze.tile_at(cell), Tile::Empty, "{cell}");
                }
            }
        }
        // Adversary spawn reserved
        assert_eq!(maze.tile_at(IVec2::new(13, 13)), Tile::Empty);
    }

    #[test]
    fn test_full_density_fills_eligible_cells() {
        let config = GameConfig::default();
        let mut rng = SeededRandom::seeded(3);
        let maze = Maze::generate(&config, &level(1.0), &mut rng);
        assert_eq!(maze.tile_at(IVec2::new(3, 1)), Tile::Destructible);
        assert_eq!(maze.tile_at(IVec2::new(1, 3)), Tile::Destructible);
        assert_eq!(maze.tile_at(IVec2::new(2, 1)), Tile::Empty);
    }

    #[test]
    fn test_zero_density_has_no_destructibles() {
        let config = GameConfig::default();
        let mut rng = SeededRandom::seeded(3);
        let maze = Maze::generate(&config, &level(0.0), &mut rng);
        assert_eq!(maze.count(Tile::Destructible), 0);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let maze = Maze::bordered(8, 8, IVec2::new(6, 6));
        assert_eq!(maze.tile_at(IVec2::new(-1, 3)), Tile::Indestructible);
        assert_eq!(maze.tile_at(IVec2::new(3, 8)), Tile::Indestructible);
        assert!(!maze.is_walkable(IVec2::new(100, 100)));
        assert!(maze.is_walkable(IVec2::new(6, 6)));
        assert!(maze.is_walkable(IVec2::new(3, 3)));
    }

    #[test]
    fn test_destroy_wall_once() {
        let mut maze = Maze::bordered(8, 8, IVec2::new(6, 6));
        let cell = IVec2::new(3, 3);
        maze.set(cell, Tile::Destructible);
        assert!(!maze.is_walkable(cell));

        assert!(maze.destroy_wall(cell));
        assert_eq!(maze.tile_at(cell), Tile::Empty);
        assert!(!maze.destroy_wall(cell));
        assert_eq!(maze.tile_at(cell), Tile::Empty);

        // Goal and indestructible are untouched
        assert!(!maze.destroy_wall(IVec2::new(6, 6)));
        assert_eq!(maze.tile_at(IVec2::new(6, 6)), Tile::Goal);
        assert!(!maze.destroy_wall(IVec2::new(0, 4)));
        assert!(!maze.destroy_wall(IVec2::new(-3, 4)));
    }

    proptest! {
        #[test]
        fn prop_border_always_indestructible(
            width in 5i32..24,
            height in 5i32..24,
            density in 0.0f32..=1.0,
            seed in any::<u64>(),
        ) {
            let config = GameConfig {
                grid_width: width,
                grid_height: height,
                adversary_spawns: Vec::new(),
                ..GameConfig::default()
            };
            let lvl = LevelConfig {
                goal: IVec2::new(width - 2, height - 2),
                ..level(density)
            };
            let mut rng = SeededRandom::seeded(seed);
            let mut maze = Maze::generate(&config, &lvl, &mut rng);

            prop_assert_eq!(maze.count(Tile::Goal), 1);
            for y in 0..height {
                for x in 0..width {
                    let cell = IVec2::new(x, y);
                    if maze.is_border(cell) {
                        prop_assert_eq!(maze.tile_at(cell), Tile::Indestructible);
                        prop_assert!(!maze.destroy_wall(cell));
                        prop_assert_eq!(maze.tile_at(cell), Tile::Indestructible);
                    }
                }
            }
        }
    }
}
