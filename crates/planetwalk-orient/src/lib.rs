//! Orientation math for actors standing on a spherical planet.
//!
//! Provides the surface frame (local "up" plus a tangent forward/right
//! basis), the orientation solver that turns yaw/pitch look input into a
//! gimbal-lock-free body rotation for grounded and airborne actors, and the
//! gravity force fed to the external physics engine.

pub mod frame;
pub mod gravity;
pub mod solver;

pub use frame::{TangentBasis, surface_up};
pub use gravity::gravity_force;
pub use solver::{LookAngles, OrientationSolver, Stance, falling_rotation, grounded_look_rotation};
