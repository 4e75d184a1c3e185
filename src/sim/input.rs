//! Held-key input snapshot
//!
//! The host's key handlers press/release keys at any time; the simulation
//! reads the set once per tick. The set is owned by the host and lent to
//! `tick` by shared reference, so no locking is involved.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

/// Physical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Space,
    ShiftLeft,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    ShiftRight,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` to a key we care about
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Key::KeyW),
            "KeyA" => Some(Key::KeyA),
            "KeyS" => Some(Key::KeyS),
            "KeyD" => Some(Key::KeyD),
            "Space" => Some(Key::Space),
            "ShiftLeft" => Some(Key::ShiftLeft),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "Enter" | "NumpadEnter" => Some(Key::Enter),
            "ShiftRight" => Some(Key::ShiftRight),
            _ => None,
        }
    }
}

/// Set of currently held keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop every held key (e.g. when the window loses focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Build an input state with the given keys held
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            held: keys.iter().copied().collect(),
        }
    }
}

/// Fixed per-player key mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub attack: Key,
    pub dash: Key,
}

impl KeyBindings {
    /// Player 1: WASD, Space to fire, left Shift to dash.
    /// Player 2: arrows, Enter to fire, right Shift to dash.
    pub const fn for_player(id: PlayerId) -> Self {
        match id {
            PlayerId::One => Self {
                up: Key::KeyW,
                down: Key::KeyS,
                left: Key::KeyA,
                right: Key::KeyD,
                attack: Key::Space,
                dash: Key::ShiftLeft,
            },
            PlayerId::Two => Self {
                up: Key::ArrowUp,
                down: Key::ArrowDown,
                left: Key::ArrowLeft,
                right: Key::ArrowRight,
                attack: Key::Enter,
                dash: Key::ShiftRight,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut input = InputState::new();
        input.press(Key::Space);
        assert!(input.is_held(Key::Space));
        input.release(Key::Space);
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Key::from_code("KeyW"), Some(Key::KeyW));
        assert_eq!(Key::from_code("ShiftRight"), Some(Key::ShiftRight));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    fn all_keys(id: PlayerId) -> [Key; 6] {
        let b = KeyBindings::for_player(id);
        [b.up, b.down, b.left, b.right, b.attack, b.dash]
    }

    #[test]
    fn test_bindings_are_disjoint() {
        let p1 = all_keys(PlayerId::One);
        let p2 = all_keys(PlayerId::Two);
        for key in p1 {
            assert!(!p2.contains(&key), "{key:?} bound to both players");
        }
    }
}
