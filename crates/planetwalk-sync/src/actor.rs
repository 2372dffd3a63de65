//! Actor identity and per-tick actor state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use planetwalk_orient::{LookAngles, Stance};

/// Opaque server-assigned actor identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    /// Creates an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_normal() -> Vec3 {
    Vec3::Y
}

fn default_grounded() -> bool {
    true
}

/// One actor's authoritative state at a single server tick.
///
/// Snapshots missing `normal` or `grounded` are defaulted in place (straight
/// up, grounded) rather than rejected: continuity over strict validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Server-assigned identifier.
    pub id: ActorId,
    /// World position.
    pub position: Vec3,
    /// Look angles (yaw/pitch).
    pub rotation: LookAngles,
    /// Surface normal at the actor's position.
    #[serde(default = "default_normal")]
    pub normal: Vec3,
    /// Whether the actor is in contact with the surface.
    #[serde(default = "default_grounded")]
    pub grounded: bool,
}

impl ActorState {
    /// The actor's stance implied by the grounded flag.
    #[must_use]
    pub fn stance(&self) -> Stance {
        if self.grounded {
            Stance::Grounded
        } else {
            Stance::Falling
        }
    }

    /// Returns the normal, substituting straight up if it is unusable.
    #[must_use]
    pub fn safe_normal(&self) -> Vec3 {
        if self.normal.length_squared() < 1e-8 || !self.normal.is_finite() {
            Vec3::Y
        } else {
            self.normal.normalize()
        }
    }
}
