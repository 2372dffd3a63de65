//! Orientation solver: yaw/pitch look input to body and camera rotations.
//!
//! Two regimes, selected by the actor's stance. Grounded actors align their
//! local +Y to the surface normal via the shortest arc, then compose yaw
//! about that normal and pitch about the resulting local right axis; a naive
//! Euler composition would reintroduce gimbal lock once the body is tilted
//! to an arbitrary surface orientation. Airborne actors have no surface to
//! align to and use a plain yaw-then-pitch composition with no roll.
//!
//! The solver is told its stance by the physics collaborator; it never
//! infers groundedness itself.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::frame::{DEGENERATE_EPSILON_SQ, MIN_TANGENT_LEN_SQ, TangentBasis};

/// Maximum pitch magnitude in radians. Kept strictly inside ±π/2 so the
/// look direction never becomes exactly parallel to the local up.
pub const PITCH_LIMIT: f32 = 89.0 * (std::f32::consts::PI / 180.0);

/// Accumulated look input in radians.
///
/// Yaw is unbounded and wraps implicitly through the trig functions;
/// positive yaw turns left (counter-clockwise viewed from above). Pitch is
/// clamped to [`PITCH_LIMIT`]; positive pitch looks up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LookAngles {
    /// Horizontal look angle in radians.
    pub yaw: f32,
    /// Vertical look angle in radians, clamped to ±[`PITCH_LIMIT`].
    pub pitch: f32,
}

impl LookAngles {
    /// Creates look angles with the pitch clamped into the valid range.
    #[must_use]
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    /// Applies a raw mouse delta scaled by `sensitivity`, clamping pitch.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// Whether the actor is in contact with the planet surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    /// In contact with the surface; orientation is constrained by the
    /// surface normal.
    #[default]
    Grounded,
    /// Airborne; orientation is unconstrained by any surface.
    Falling,
}

/// Builds the camera rotation for a grounded actor: shortest-arc alignment
/// of +Y to `up`, then yaw about `up`, then pitch about the yawed local
/// right axis.
///
/// A zero-length `up` is undefined input and falls back to world +Y.
#[must_use]
pub fn grounded_look_rotation(up: Vec3, look: LookAngles) -> Quat {
    let up = if up.length_squared() < DEGENERATE_EPSILON_SQ {
        tracing::debug!("zero-length up passed to grounded rotation; defaulting to +Y");
        Vec3::Y
    } else {
        up.normalize()
    };
    let base = Quat::from_rotation_arc(Vec3::Y, up);
    let yawed = (Quat::from_axis_angle(up, -look.yaw) * base).normalize();
    let right = yawed * Vec3::X;
    (Quat::from_axis_angle(right, look.pitch) * yawed).normalize()
}

/// Builds the free-fall rotation: yaw about world Y, then pitch about the
/// local X axis. No roll component.
#[must_use]
pub fn falling_rotation(look: LookAngles) -> Quat {
    Quat::from_rotation_y(-look.yaw) * Quat::from_rotation_x(look.pitch)
}

/// Stateful orientation solver for the local actor.
///
/// Holds the accumulated look angles, the current stance, and the previous
/// frame's tangent forward so the body facing stays stable when the camera
/// looks straight along the surface normal.
#[derive(Clone, Debug)]
pub struct OrientationSolver {
    /// Accumulated look input.
    pub look: LookAngles,
    stance: Stance,
    last_tangent_forward: Vec3,
}

impl Default for OrientationSolver {
    fn default() -> Self {
        Self {
            look: LookAngles::default(),
            stance: Stance::Grounded,
            last_tangent_forward: Vec3::NEG_Z,
        }
    }
}

impl OrientationSolver {
    /// Creates a solver starting grounded, looking along world −Z.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current stance.
    #[must_use]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Updates the stance as reported by the physics collaborator.
    ///
    /// Entering `Falling` switches to the roll-free Euler composition, which
    /// discards any roll accumulated from surface alignment; yaw and pitch
    /// carry over unchanged in both directions.
    pub fn set_stance(&mut self, stance: Stance) {
        if stance != self.stance {
            tracing::debug!(?stance, "stance transition");
        }
        self.stance = stance;
    }

    /// Computes the camera rotation for the current stance and look angles.
    #[must_use]
    pub fn camera_rotation(&self, up: Vec3) -> Quat {
        match self.stance {
            Stance::Grounded => grounded_look_rotation(up, self.look),
            Stance::Falling => falling_rotation(self.look),
        }
    }

    /// Computes the body rotation for the current stance.
    ///
    /// Grounded bodies face the camera's forward direction flattened onto
    /// the tangent plane, so the mesh visually faces where the camera looks
    /// without pitching into the ground. When that projection degenerates
    /// (camera looking straight along the surface normal), the previous
    /// frame's forward is retained instead of recomputed, which prevents
    /// facing flicker at the poles of the look direction.
    pub fn body_rotation(&mut self, up: Vec3) -> Quat {
        if self.stance == Stance::Falling {
            return falling_rotation(self.look);
        }

        let up = if up.length_squared() < DEGENERATE_EPSILON_SQ {
            Vec3::Y
        } else {
            up.normalize()
        };

        let cam_forward = grounded_look_rotation(up, self.look) * Vec3::NEG_Z;
        let mut flat = cam_forward - up * up.dot(cam_forward);
        if flat.length_squared() < MIN_TANGENT_LEN_SQ {
            // Camera aligned with the normal: retain last frame's facing,
            // reprojected in case the surface tilted underneath us.
            flat = self.last_tangent_forward - up * up.dot(self.last_tangent_forward);
            if flat.length_squared() < MIN_TANGENT_LEN_SQ {
                flat = TangentBasis::from_up_and_reference(up, Vec3::NEG_Z).forward;
            } else {
                flat = flat.normalize();
            }
        } else {
            flat = flat.normalize();
            self.last_tangent_forward = flat;
        }

        let right = flat.cross(up).normalize();
        let corrected_up = right.cross(flat).normalize();
        Quat::from_mat3(&Mat3::from_cols(right, corrected_up, -flat)).normalize()
    }
}
