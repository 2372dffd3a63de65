//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] accumulates key events between ticks and answers two
//! questions for any physical key: is it currently held, and did it
//! transition to pressed since the last [`clear_transients`](KeyboardState::clear_transients).
//!
//! Physical key codes are used throughout so WASD movement works identically
//! regardless of the user's keyboard layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Minimal description of a key transition, decoupled from winit for tests.
#[derive(Debug, Clone, Copy)]
pub struct KeyPress {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is an OS auto-repeat event.
    pub repeat: bool,
}

/// Tracks held and just-pressed keys between ticks.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
}

impl KeyboardState {
    /// Creates a tracker with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_press(KeyPress {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Processes a [`KeyPress`]. Auto-repeat events are ignored so a held
    /// key registers as just-pressed exactly once.
    pub fn process_press(&mut self, press: KeyPress) {
        if press.repeat {
            return;
        }
        match press.state {
            ElementState::Pressed => {
                self.held.insert(press.key);
                self.just_pressed.insert(press.key);
            }
            ElementState::Released => {
                self.held.remove(&press.key);
            }
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_held(&self, key: PhysicalKey) -> bool {
        self.held.contains(&key)
    }

    /// Returns `true` if the key transitioned to pressed since the last
    /// [`clear_transients`](Self::clear_transients) call.
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Clears the just-pressed set. Call once per tick after sampling.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn press(code: KeyCode) -> KeyPress {
        KeyPress {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    fn release(code: KeyCode) -> KeyPress {
        KeyPress {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }

    #[test]
    fn test_initial_state_nothing_held() {
        let kb = KeyboardState::new();
        assert!(!kb.is_held(PhysicalKey::Code(KeyCode::KeyW)));
        assert!(!kb.just_pressed(PhysicalKey::Code(KeyCode::Space)));
    }

    #[test]
    fn test_press_then_release_round_trip() {
        let mut kb = KeyboardState::new();
        kb.process_press(press(KeyCode::KeyW));
        let w = PhysicalKey::Code(KeyCode::KeyW);
        assert!(kb.is_held(w));
        assert!(kb.just_pressed(w));
        kb.process_press(release(KeyCode::KeyW));
        assert!(!kb.is_held(w));
    }

    #[test]
    fn test_just_pressed_cleared_by_tick_boundary() {
        let mut kb = KeyboardState::new();
        kb.process_press(press(KeyCode::Space));
        let space = PhysicalKey::Code(KeyCode::Space);
        assert!(kb.just_pressed(space));
        kb.clear_transients();
        assert!(!kb.just_pressed(space));
        assert!(kb.is_held(space), "held state survives the tick boundary");
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_press(press(KeyCode::KeyA));
        kb.clear_transients();
        kb.process_press(KeyPress {
            repeat: true,
            ..press(KeyCode::KeyA)
        });
        let a = PhysicalKey::Code(KeyCode::KeyA);
        assert!(kb.is_held(a));
        assert!(!kb.just_pressed(a), "repeat must not re-trigger just_pressed");
    }

    #[test]
    fn test_keys_tracked_independently() {
        let mut kb = KeyboardState::new();
        kb.process_press(press(KeyCode::KeyW));
        kb.process_press(press(KeyCode::KeyD));
        kb.process_press(release(KeyCode::KeyW));
        assert!(!kb.is_held(PhysicalKey::Code(KeyCode::KeyW)));
        assert!(kb.is_held(PhysicalKey::Code(KeyCode::KeyD)));
    }
}
