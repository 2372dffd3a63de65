//! Physics collaborator seam.
//!
//! Rigid-body stepping is a black box invoked each tick. The core only
//! computes forces and orientations; the engine behind this trait decides
//! contact and integrates motion, then reports position and groundedness
//! back.

use glam::Vec3;

/// The local player's rigid body as seen by the session.
pub trait PhysicsBody {
    /// Current world position of the body.
    fn position(&self) -> Vec3;
    /// Queues a force to be applied during the next step.
    fn apply_force(&mut self, force: Vec3);
    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);
    /// Whether the body is in contact with the planet surface. The session
    /// never decides groundedness; it is told.
    fn grounded(&self) -> bool;
}

/// Minimal force-integrating body for tests and headless runs.
///
/// Integrates queued forces into velocity and velocity into position, with
/// no collision; groundedness is set by the harness.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Contact flag, driven by the harness.
    pub grounded: bool,
    pending_force: Vec3,
}

impl KinematicBody {
    /// Creates a grounded body at rest at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: true,
            pending_force: Vec3::ZERO,
        }
    }
}

impl PhysicsBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn apply_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    fn step(&mut self, dt: f32) {
        // Unit mass; grounded bodies don't accelerate into the surface.
        if !self.grounded {
            self.velocity += self.pending_force * dt;
            self.position += self.velocity * dt;
        }
        self.pending_force = Vec3::ZERO;
    }

    fn grounded(&self) -> bool {
        self.grounded
    }
}
