//! Session orchestration for the planetwalk client.
//!
//! Wires the orientation solver, input sampler, network channel, and
//! remote-actor interpolator into the per-frame control flow: sample input,
//! solve the local orientation, advance interpolation, hand transforms to
//! the renderer. Physics stepping and rendering stay behind traits; the
//! session logic itself is synchronous and runtime-free, driven by the
//! tokio runner in [`runner`].

pub mod context;
pub mod physics;
pub mod runner;
pub mod scene;
pub mod session;

pub use context::{SessionContext, WorldConstants};
pub use physics::{KinematicBody, PhysicsBody};
pub use runner::{RunnerConfig, drive, now_ms};
pub use scene::{ActorScene, RecordingScene, compose_camera_transform};
pub use session::{Session, SessionConfig};
