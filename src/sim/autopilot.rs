//! Attract-mode autopilot
//!
//! Plays the agent when `TickInput::idle_mode` is set: flee pending blasts,
//! bomb walls that stand in the way, otherwise walk toward the goal.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::IVec2;

use super::explosive::blast_cells;
use super::maze::Tile;
use super::state::GameState;
use crate::cell_to_pixel;

/// Longest escape route (in cells) worth arming an explosive for
const MAX_ESCAPE_STEPS: usize = 4;

const NEIGHBORS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::Y, IVec2::NEG_X, IVec2::X];

/// Movement and placement chosen by the autopilot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub move_x: i8,
    pub move_y: i8,
    pub place_explosive: bool,
}

/// Decide this tick's intent for the agent
pub fn intent(state: &GameState) -> Intent {
    let maze = &state.maze;
    let here = state.agent.cell();
    let walkable = |c: IVec2| maze.is_walkable(c) && !state.explosives.has_explosive_at(c);

    let mut danger: HashSet<IVec2> = state
        .explosives
        .pending_blast_cells(maze)
        .into_iter()
        .collect();
    for blast in state.explosives.blasts() {
        danger.extend(blast.cells.iter().copied());
    }

    // Get out of harm's way first; our own cell may hold an explosive
    if danger.contains(&here) {
        let path = bfs(
            here,
            |c| c == here || walkable(c),
            |c| !danger.contains(&c),
        );
        return match path {
            Some(path) => step_toward(state, path[0]),
            None => Intent::default(),
        };
    }

    let route = bfs(
        here,
        |c| walkable(c) && !danger.contains(&c),
        |c| c == maze.goal(),
    );
    if let Some(path) = route {
        return step_toward(state, path[0]);
    }

    // No clear route: head for the first wall on a route that breaks through
    let through_walls = bfs(
        here,
        |c| {
            (walkable(c) || maze.tile_at(c) == Tile::Destructible) && !danger.contains(&c)
        },
        |c| c == maze.goal(),
    );
    let Some(path) = through_walls else {
        return Intent::default();
    };

    if maze.tile_at(path[0]) == Tile::Destructible {
        if state.agent.can_place_explosive() && is_centered(state) && can_escape(state, &danger) {
            return Intent {
                place_explosive: true,
                ..Intent::default()
            };
        }
        return Intent::default();
    }
    step_toward(state, path[0])
}

/// Arming here leaves a short walk to a cell outside every blast
fn can_escape(state: &GameState, danger: &HashSet<IVec2>) -> bool {
    let maze = &state.maze;
    let here = state.agent.cell();
    let radius = state.config().blast_radius;

    let mut threatened = danger.clone();
    threatened.extend(blast_cells(maze, here, radius));

    let path = bfs(
        here,
        |c| c == here || (maze.is_walkable(c) && !state.explosives.has_explosive_at(c)),
        |c| !threatened.contains(&c),
    );
    path.is_some_and(|p| p.len() <= MAX_ESCAPE_STEPS)
}

/// Agent position is close enough to its cell's origin
fn is_centered(state: &GameState) -> bool {
    let target = cell_to_pixel(state.agent.cell(), state.config().tile_size);
    (state.agent.body.pos - target).abs().max_element() <= state.agent.speed
}

/// Move toward `next` one axis at a time, aligning the other axis first
fn step_toward(state: &GameState, next: IVec2) -> Intent {
    let tile = state.config().tile_size;
    let pos = state.agent.body.pos;
    let here = state.agent.cell();
    let dead_zone = state.agent.speed * 0.5;

    let target = cell_to_pixel(next, tile);
    let center = cell_to_pixel(here, tile);
    let axis = |delta: f32| -> i8 {
        if delta > dead_zone {
            1
        } else if delta < -dead_zone {
            -1
        } else {
            0
        }
    };

    let mut intent = Intent::default();
    if next.x != here.x {
        intent.move_y = axis(center.y - pos.y);
        if intent.move_y == 0 {
            intent.move_x = axis(target.x - pos.x);
        }
    } else {
        intent.move_x = axis(center.x - pos.x);
        if intent.move_x == 0 {
            intent.move_y = axis(target.y - pos.y);
        }
    }
    intent
}

/// Breadth-first search; returns the path after `start` up to the first target
fn bfs(
    start: IVec2,
    passable: impl Fn(IVec2) -> bool,
    is_target: impl Fn(IVec2) -> bool,
) -> Option<Vec<IVec2>> {
    let mut parents: HashMap<IVec2, IVec2> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    parents.insert(start, start);

    while let Some(cell) = queue.pop_front() {
        if cell != start && is_target(cell) {
            let mut path = vec![cell];
            let mut cur = cell;
            while let Some(&p) = parents.get(&cur) {
                if p == start {
                    break;
                }
                path.push(p);
                cur = p;
            }
            path.reverse();
            return Some(path);
        }
        for n in NEIGHBORS {
            let next = cell + n;
            if !parents.contains_key(&next) && passable(next) {
                parents.insert(next, cell);
                queue.push_back(next);
            }
        }
    }
    None
}
