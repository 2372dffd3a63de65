//! Input state tracking and per-tick input sampling.
//!
//! Raw key/mouse events arrive already decoded (from a winit event loop or a
//! test harness); this crate accumulates them into frame-coherent state and
//! condenses that state into one [`InputRecord`] per outbound network tick.

pub mod keyboard;
pub mod mouse;
pub mod sampler;

pub use keyboard::{KeyPress, KeyboardState};
pub use mouse::MouseLook;
pub use sampler::{DEFAULT_SAMPLE_INTERVAL, InputRecord, InputSampler};
