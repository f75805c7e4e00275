//! Platform layer
//!
//! Handles the host side of the simulation:
//! - Time sampling (`clock`)
//! - Held keys to per-tick intent (`input`)
//! - The tick/present loop and its shutdown (`runner`)

pub mod clock;
pub mod input;
pub mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use input::{InputState, Key};
pub use runner::Runner;
