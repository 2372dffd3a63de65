//! Per-tick input sampling.
//!
//! [`InputSampler`] condenses held movement keys and the current look angles
//! into one [`InputRecord`] per outbound network tick. The caller drives the
//! tick cadence, usually an interval timer at [`DEFAULT_SAMPLE_INTERVAL`], so
//! the outbound message rate stays bounded no matter how fast frames render.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use winit::keyboard::{KeyCode, PhysicalKey};

use planetwalk_orient::LookAngles;

use crate::keyboard::KeyboardState;

/// Default interval between outbound input samples (~30 Hz).
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(33);

/// One sampled input, sent to the server once per sample tick and not
/// retained afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Movement direction in camera-local axes; unit length or zero.
    #[serde(rename = "dir")]
    pub direction: Vec3,
    /// Look angles at sample time.
    #[serde(rename = "rot")]
    pub rotation: LookAngles,
    /// Whether a jump was requested since the previous sample.
    pub jump: bool,
    /// Client wall-clock milliseconds at sample time.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

/// Builds one [`InputRecord`] per sample tick from tracked input state.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    jump_latched: bool,
}

impl InputSampler {
    /// Creates a sampler with no pending jump.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per render frame so a Space tap that falls entirely
    /// between two sample ticks is still reported in the next record.
    pub fn note_frame(&mut self, keyboard: &KeyboardState) {
        if keyboard.just_pressed(PhysicalKey::Code(KeyCode::Space)) {
            self.jump_latched = true;
        }
    }

    /// Samples the current input into a record stamped with `timestamp_ms`.
    ///
    /// Opposed keys cancel per axis, and the combined direction is
    /// normalized only when non-zero so diagonal movement is never faster
    /// than axis-aligned movement.
    pub fn sample(
        &mut self,
        keyboard: &KeyboardState,
        look: LookAngles,
        timestamp_ms: u64,
    ) -> InputRecord {
        let mut direction = Vec3::ZERO;
        if keyboard.is_held(PhysicalKey::Code(KeyCode::KeyW)) {
            direction.z -= 1.0;
        }
        if keyboard.is_held(PhysicalKey::Code(KeyCode::KeyS)) {
            direction.z += 1.0;
        }
        if keyboard.is_held(PhysicalKey::Code(KeyCode::KeyD)) {
            direction.x += 1.0;
        }
        if keyboard.is_held(PhysicalKey::Code(KeyCode::KeyA)) {
            direction.x -= 1.0;
        }
        if direction.length_squared() > 0.0 {
            direction = direction.normalize();
        }

        let jump = self.jump_latched || keyboard.is_held(PhysicalKey::Code(KeyCode::Space));
        self.jump_latched = false;

        InputRecord {
            direction,
            rotation: look,
            jump,
            timestamp_ms,
        }
    }
}
