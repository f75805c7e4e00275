//! Held-key state to per-tick intent
//!
//! Movement is level-triggered (read every tick from the held keys).
//! Placing an explosive and pausing are edge-triggered: one press yields one
//! tick with the flag set, however long the key is held.

use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PlaceExplosive,
    Pause,
}

impl Key {
    /// Map a host key name (arrows, WASD, space, escape/p)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" => Some(Key::PlaceExplosive),
            "Escape" | "p" | "P" => Some(Key::Pause),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    place_held: bool,
    pause_held: bool,
    place_pending: bool,
    pause_pending: bool,
    /// Let the autopilot play
    pub idle_mode: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::PlaceExplosive => {
                // Auto-repeat while held is not a new press
                if !self.place_held {
                    self.place_pending = true;
                }
                self.place_held = true;
            }
            Key::Pause => {
                if !self.pause_held {
                    self.pause_pending = true;
                }
                self.pause_held = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.up = false,
            Key::Down => self.down = false,
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::PlaceExplosive => self.place_held = false,
            Key::Pause => self.pause_held = false,
        }
    }

    /// Intent for the next tick; consumes pending presses
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            move_x: i8::from(self.right) - i8::from(self.left),
            move_y: i8::from(self.down) - i8::from(self.up),
            place_explosive: self.place_pending,
            pause: self.pause_pending,
            idle_mode: self.idle_mode,
        };
        self.place_pending = false;
        self.pause_pending = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_is_level_triggered() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_down(Key::Up);
        for _ in 0..3 {
            let t = input.take_tick_input();
            assert_eq!((t.move_x, t.move_y), (1, -1));
        }
        input.key_down(Key::Left);
        assert_eq!(input.take_tick_input().move_x, 0);
        input.key_up(Key::Right);
        assert_eq!(input.take_tick_input().move_x, -1);
    }

    #[test]
    fn test_place_is_edge_triggered() {
        let mut input = InputState::new();
        input.key_down(Key::PlaceExplosive);
        // Auto-repeat
        input.key_down(Key::PlaceExplosive);
        assert!(input.take_tick_input().place_explosive);
        assert!(!input.take_tick_input().place_explosive);

        input.key_down(Key::PlaceExplosive);
        assert!(!input.take_tick_input().place_explosive);

        input.key_up(Key::PlaceExplosive);
        input.key_down(Key::PlaceExplosive);
        assert!(input.take_tick_input().place_explosive);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name("d"), Some(Key::Right));
        assert_eq!(Key::from_name(" "), Some(Key::PlaceExplosive));
        assert_eq!(Key::from_name("q"), None);
    }
}
