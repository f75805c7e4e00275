//! Explosives, blast geometry and the explosive registry
//!
//! An explosive is armed on placement and explodes exactly once when its fuse
//! elapses. Detonation emits a `BlastEvent`; the rules engine applies the
//! effects in the same tick. Blasts are then kept around for a short display
//! window that has no gameplay effect beyond the blast-contact loss check.

use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::maze::{Maze, Tile};

/// The four blast directions: up, down, left, right
pub const BLAST_DIRECTIONS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::Y, IVec2::NEG_X, IVec2::X];

/// Cells reached by one ray, nearest first
///
/// The ray stops at the grid edge or just before the first indestructible
/// tile. Destructible walls are included and do not stop it.
pub fn blast_ray(maze: &Maze, origin: IVec2, dir: IVec2, radius: i32) -> Vec<IVec2> {
    let mut cells = Vec::with_capacity(radius.max(0) as usize);
    for step in 1..=radius {
        let cell = origin + dir * step;
        if !maze.in_bounds(cell) || maze.tile_at(cell) == Tile::Indestructible {
            break;
        }
        cells.push(cell);
    }
    cells
}

/// Full blast set: the origin followed by each ray in `BLAST_DIRECTIONS` order
pub fn blast_cells(maze: &Maze, origin: IVec2, radius: i32) -> Vec<IVec2> {
    let mut cells = vec![origin];
    for dir in BLAST_DIRECTIONS {
        cells.extend(blast_ray(maze, origin, dir, radius));
    }
    cells
}

/// An armed explosive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosive {
    pub id: u32,
    pub cell: IVec2,
    /// Session time at placement
    pub created_at: Duration,
    pub exploded: bool,
}

impl Explosive {
    pub fn should_explode(&self, now: Duration, fuse: Duration) -> bool {
        !self.exploded && now.saturating_sub(self.created_at) >= fuse
    }

    /// Time left before detonation
    pub fn remaining(&self, now: Duration, fuse: Duration) -> Duration {
        fuse.saturating_sub(now.saturating_sub(self.created_at))
    }
}

/// One detonation's affected cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastEvent {
    /// Explosive that produced this blast
    pub explosive_id: u32,
    pub origin: IVec2,
    pub cells: Vec<IVec2>,
    pub created_at: Duration,
}

impl BlastEvent {
    pub fn contains(&self, cell: IVec2) -> bool {
        self.cells.contains(&cell)
    }
}

/// Armed explosives plus the blasts still on display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosiveRegistry {
    fuse: Duration,
    radius: i32,
    display: Duration,
    armed: Vec<Explosive>,
    blasts: Vec<BlastEvent>,
    next_id: u32,
}

impl ExplosiveRegistry {
    pub fn new(fuse: Duration, radius: i32, display: Duration) -> Self {
        Self {
            fuse,
            radius,
            display,
            armed: Vec::new(),
            blasts: Vec::new(),
            next_id: 1,
        }
    }

    pub fn fuse(&self) -> Duration {
        self.fuse
    }

    pub fn display_window(&self) -> Duration {
        self.display
    }

    /// Arm an explosive at `cell`
    ///
    /// Silently rejected (false, no state change) when the cell already holds
    /// an armed explosive, the cell is not walkable, or the owner has no
    /// budget left.
    pub fn place(&mut self, cell: IVec2, now: Duration, maze: &Maze, has_budget: bool) -> bool {
        if self.has_explosive_at(cell) || !maze.is_walkable(cell) || !has_budget {
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.armed.push(Explosive {
            id,
            cell,
            created_at: now,
            exploded: false,
        });
        true
    }

    /// Detonate every explosive whose fuse has elapsed and purge stale blasts
    ///
    /// Returns the blasts emitted by this call, in placement order. Calling it
    /// again with the same `now` emits nothing.
    pub fn update(&mut self, now: Duration, maze: &Maze) -> Vec<BlastEvent> {
        let mut emitted = Vec::new();

        for explosive in &mut self.armed {
            if explosive.should_explode(now, self.fuse) {
                explosive.exploded = true;
                let blast = BlastEvent {
                    explosive_id: explosive.id,
                    origin: explosive.cell,
                    cells: blast_cells(maze, explosive.cell, self.radius),
                    created_at: now,
                };
                log::debug!(
                    "Explosive {} detonated at {} ({} cells)",
                    explosive.id,
                    explosive.cell,
                    blast.cells.len()
                );
                emitted.push(blast);
            }
        }
        self.armed.retain(|e| !e.exploded);

        self.blasts.extend(emitted.iter().cloned());
        let display = self.display;
        self.blasts
            .retain(|b| now.saturating_sub(b.created_at) < display);

        emitted
    }

    pub fn has_explosive_at(&self, cell: IVec2) -> bool {
        self.armed.iter().any(|e| e.cell == cell)
    }

    /// Whether any blast still on display covers `cell`
    pub fn is_in_blast(&self, cell: IVec2) -> bool {
        self.blasts.iter().any(|b| b.contains(cell))
    }

    pub fn armed(&self) -> &[Explosive] {
        &self.armed
    }

    pub fn blasts(&self) -> &[BlastEvent] {
        &self.blasts
    }

    /// Cells that armed explosives will hit when they go off
    pub fn pending_blast_cells(&self, maze: &Maze) -> Vec<IVec2> {
        self.armed
            .iter()
            .flat_map(|e| blast_cells(maze, e.cell, self.radius))
            .collect()
    }

    pub fn clear(&mut self) {
        self.armed.clear();
        self.blasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FUSE: Duration = Duration::from_millis(2000);
    const DISPLAY: Duration = Duration::from_millis(200);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn registry() -> ExplosiveRegistry {
        ExplosiveRegistry::new(FUSE, 2, DISPLAY)
    }

    #[test]
    fn test_open_blast_has_plus_shape() {
        let maze = Maze::bordered(9, 9, IVec2::new(7, 7));
        let cells = blast_cells(&maze, IVec2::new(4, 4), 2);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], IVec2::new(4, 4));
        for c in [
            IVec2::new(4, 2),
            IVec2::new(4, 3),
            IVec2::new(4, 5),
            IVec2::new(4, 6),
            IVec2::new(2, 4),
            IVec2::new(3, 4),
            IVec2::new(5, 4),
            IVec2::new(6, 4),
        ] {
            assert!(cells.contains(&c), "missing {c}");
        }
    }

    #[test]
    fn test_indestructible_truncates_ray() {
        let mut maze = Maze::bordered(9, 9, IVec2::new(7, 7));
        maze.set(IVec2::new(5, 4), Tile::Indestructible);
        let ray = blast_ray(&maze, IVec2::new(4, 4), IVec2::X, 3);
        assert!(ray.is_empty());

        maze.set(IVec2::new(5, 4), Tile::Empty);
        maze.set(IVec2::new(6, 4), Tile::Indestructible);
        let ray = blast_ray(&maze, IVec2::new(4, 4), IVec2::X, 3);
        assert_eq!(ray, vec![IVec2::new(5, 4)]);
    }

    #[test]
    fn test_destructible_does_not_stop_ray() {
        let mut maze = Maze::bordered(9, 9, IVec2::new(7, 7));
        maze.set(IVec2::new(5, 4), Tile::Destructible);
        let ray = blast_ray(&maze, IVec2::new(4, 4), IVec2::X, 2);
        assert_eq!(ray, vec![IVec2::new(5, 4), IVec2::new(6, 4)]);
    }

    #[test]
    fn test_ray_stops_at_border() {
        let maze = Maze::bordered(16, 16, IVec2::new(14, 14));
        let cells = blast_cells(&maze, IVec2::new(1, 1), 2);
        // up and left hit the border immediately
        assert_eq!(cells.len(), 5);
        assert!(!cells.iter().any(|c| c.x == 0 || c.y == 0));
    }

    #[test]
    fn test_place_rejections() {
        let mut maze = Maze::bordered(9, 9, IVec2::new(7, 7));
        maze.set(IVec2::new(3, 3), Tile::Destructible);
        let mut reg = registry();

        assert!(reg.place(IVec2::new(2, 2), ms(0), &maze, true));
        // occupied
        assert!(!reg.place(IVec2::new(2, 2), ms(10), &maze, true));
        // unwalkable
        assert!(!reg.place(IVec2::new(3, 3), ms(10), &maze, true));
        assert!(!reg.place(IVec2::new(0, 3), ms(10), &maze, true));
        // no budget
        assert!(!reg.place(IVec2::new(4, 4), ms(10), &maze, false));
        assert_eq!(reg.armed().len(), 1);
    }

    #[test]
    fn test_fuse_and_display_window() {
        let maze = Maze::bordered(9, 9, IVec2::new(7, 7));
        let mut reg = registry();
        assert!(reg.place(IVec2::new(4, 4), ms(100), &maze, true));

        assert!(reg.update(ms(2099), &maze).is_empty());
        assert!(reg.has_explosive_at(IVec2::new(4, 4)));

        let blasts = reg.update(ms(2100), &maze);
        assert_eq!(blasts.len(), 1);
        assert!(!reg.has_explosive_at(IVec2::new(4, 4)));
        assert!(reg.is_in_blast(IVec2::new(4, 6)));

        // Same instant again: nothing new
        assert!(reg.update(ms(2100), &maze).is_empty());
        assert_eq!(reg.blasts().len(), 1);

        assert!(reg.update(ms(2299), &maze).is_empty());
        assert!(reg.is_in_blast(IVec2::new(4, 4)));
        reg.update(ms(2300), &maze);
        assert!(reg.blasts().is_empty());
        assert!(!reg.is_in_blast(IVec2::new(4, 4)));
    }

    #[test]
    fn test_simultaneous_expiry() {
        let maze = Maze::bordered(12, 12, IVec2::new(10, 10));
        let mut reg = registry();
        assert!(reg.place(IVec2::new(2, 2), ms(0), &maze, true));
        assert!(reg.place(IVec2::new(8, 8), ms(5), &maze, true));
        assert!(reg.place(IVec2::new(5, 5), ms(500), &maze, true));

        let blasts = reg.update(ms(2010), &maze);
        assert_eq!(blasts.len(), 2);
        assert_eq!(blasts[0].origin, IVec2::new(2, 2));
        assert_eq!(blasts[1].origin, IVec2::new(8, 8));
        assert_eq!(reg.armed().len(), 1);
    }

    #[test]
    fn test_remaining_fuse() {
        let e = Explosive {
            id: 1,
            cell: IVec2::ONE,
            created_at: ms(1000),
            exploded: false,
        };
        assert_eq!(e.remaining(ms(1500), FUSE), ms(1500));
        assert_eq!(e.remaining(ms(9000), FUSE), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_open_blast_size(r in 1i32..6, extra in 0i32..4, ox in 0i32..3, oy in 0i32..3) {
            let size = 2 * r + 3 + extra;
            let maze = Maze::bordered(size, size, IVec2::new(size - 2, size - 2));
            let origin = IVec2::new(r + 1 + ox.min(extra), r + 1 + oy.min(extra));
            let cells = blast_cells(&maze, origin, r);
            prop_assert_eq!(cells.len() as i32, 4 * r + 1);
        }

        #[test]
        fn prop_wall_kind_decides_truncation(r in 2i32..6, k_seed in 0i32..100, destructible in any::<bool>()) {
            let k = 1 + k_seed % (r - 1); // 1..r
            let size = 2 * r + 3;
            let mut maze = Maze::bordered(size, size, IVec2::new(size - 2, size - 2));
            let origin = IVec2::new(r + 1, r + 1);
            let wall = origin + IVec2::X * k;
            let tile = if destructible { Tile::Destructible } else { Tile::Indestructible };
            maze.set(wall, tile);

            let ray = blast_ray(&maze, origin, IVec2::X, r);
            if destructible {
                prop_assert_eq!(ray.len() as i32, r);
                prop_assert!(ray.contains(&wall));
            } else {
                prop_assert_eq!(ray.len() as i32, k - 1);
                prop_assert!(!ray.contains(&wall));
            }
        }
    }
}
