//! Tick-driven simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded; state is touched only from `tick`
//! - Randomness only through `RandomSource`
//! - Time only through the host's per-tick clock sample
//! - No rendering or platform dependencies

pub mod adversary;
pub mod agent;
pub mod autopilot;
pub mod explosive;
pub mod maze;
pub mod movement;
pub mod random;
pub mod rules;
pub mod state;
pub mod tick;
pub mod view;

pub use adversary::{Adversary, AdversaryRegistry, AiParams};
pub use agent::Agent;
pub use explosive::{BlastEvent, Explosive, ExplosiveRegistry, blast_cells, blast_ray};
pub use maze::{Maze, Tile};
pub use movement::{Arena, Body, MovePolicy, resolve_tentative_move};
pub use random::{RandomSource, SeededRandom};
pub use rules::{BlastReport, LossReason, Verdict};
pub use state::{GamePhase, GameState, SessionClock};
pub use tick::{GameEvent, TickInput, tick};
pub use view::Snapshot;
