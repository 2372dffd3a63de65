//! Actor state model and remote-actor snapshot interpolation.
//!
//! The server sends authoritative snapshots of all actors at its tick rate,
//! which is lower than the render framerate; without smoothing, remote
//! actors would visibly teleport between snapshots. This crate owns the
//! remote actors' state exclusively: snapshot ingestion, the two-slot
//! receive buffer, and per-frame interpolation toward the latest target.

pub mod actor;
pub mod buffer;
pub mod interpolate;

pub use actor::{ActorId, ActorState};
pub use buffer::{SnapshotBuffer, StateSnapshot};
pub use interpolate::{
    BlendPolicy, DEFAULT_BLEND_FACTOR, RemoteActorInterpolator, RemoteActorPose, SnapshotDiff,
};
