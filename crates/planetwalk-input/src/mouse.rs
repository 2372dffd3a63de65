//! Pointer-capture-gated mouse look accumulator.
//!
//! Raw device deltas only steer the camera while the pointer is captured
//! (pointer lock); outside capture the cursor belongs to the UI and deltas
//! are discarded. The accumulated delta is taken exactly once per frame so
//! event-callback timing never races the render tick.

use glam::Vec2;

/// Accumulates raw mouse motion while the pointer is captured.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    delta: Vec2,
    captured: bool,
}

impl MouseLook {
    /// Creates an accumulator with the pointer not captured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a raw device motion delta. Ignored unless captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Sets the pointer-capture state. Losing capture discards any delta
    /// accumulated so far this frame.
    pub fn set_captured(&mut self, captured: bool) {
        if self.captured && !captured {
            self.delta = Vec2::ZERO;
        }
        self.captured = captured;
    }

    /// Returns `true` while the pointer is captured.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Returns the delta accumulated since the last take and resets it.
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_ignored_until_captured() {
        let mut mouse = MouseLook::new();
        mouse.on_raw_motion(10.0, 5.0);
        assert_eq!(mouse.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_deltas_accumulate_while_captured() {
        let mut mouse = MouseLook::new();
        mouse.set_captured(true);
        mouse.on_raw_motion(3.0, -2.0);
        mouse.on_raw_motion(1.0, 1.0);
        assert_eq!(mouse.take_delta(), Vec2::new(4.0, -1.0));
    }

    #[test]
    fn test_take_delta_resets() {
        let mut mouse = MouseLook::new();
        mouse.set_captured(true);
        mouse.on_raw_motion(7.0, 7.0);
        let _ = mouse.take_delta();
        assert_eq!(mouse.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_losing_capture_discards_pending_delta() {
        let mut mouse = MouseLook::new();
        mouse.set_captured(true);
        mouse.on_raw_motion(50.0, 50.0);
        mouse.set_captured(false);
        assert_eq!(mouse.take_delta(), Vec2::ZERO);
    }
}
