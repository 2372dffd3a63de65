//! Gravity force computation for the external physics engine.
//!
//! The core never integrates motion itself; it hands a center-directed force
//! to the physics collaborator each tick.

use glam::Vec3;

use crate::frame::DEGENERATE_EPSILON_SQ;

/// Returns the gravity force acting on a body at `position`, pointing toward
/// `planet_center` with magnitude `strength`.
///
/// Returns `Vec3::ZERO` when the body sits exactly at the planet center,
/// where the direction is undefined.
#[must_use]
pub fn gravity_force(position: Vec3, planet_center: Vec3, strength: f32) -> Vec3 {
    let radial = planet_center - position;
    if radial.length_squared() < DEGENERATE_EPSILON_SQ {
        return Vec3::ZERO;
    }
    radial.normalize() * strength
}
