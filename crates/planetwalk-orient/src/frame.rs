//! Surface frame: local "up" on a sphere and the tangent basis built from it.
//!
//! Every orientation computation in this crate starts from the frame derived
//! here: `up` is the outward surface normal at the actor's position, and
//! `forward`/`right` span the tangent plane perpendicular to it.

use glam::Vec3;

/// Squared length below which a vector is treated as degenerate.
pub const DEGENERATE_EPSILON_SQ: f32 = 1e-8;

/// Squared length below which a tangent-plane projection is considered too
/// short to normalize safely.
pub const MIN_TANGENT_LEN_SQ: f32 = 1e-6;

/// Computes the local "up" direction at `position` on a planet centered at
/// `planet_center`: the unit vector from the center toward the position.
///
/// Positions coinciding with the planet center have no defined normal; that
/// case is logged and defaults to world +Y rather than propagating a NaN
/// into every downstream rotation.
#[must_use]
pub fn surface_up(position: Vec3, planet_center: Vec3) -> Vec3 {
    let radial = position - planet_center;
    if radial.length_squared() < DEGENERATE_EPSILON_SQ {
        tracing::warn!(
            ?position,
            "surface position coincides with planet center; defaulting up to +Y"
        );
        return Vec3::Y;
    }
    radial.normalize()
}

/// An orthonormal basis anchored to a point on the planet surface.
///
/// `forward` and `right` lie in the tangent plane; `up` is the surface
/// normal. `right = forward × up`, so the triple is right-handed with
/// `forward` playing the role of −Z in camera space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentBasis {
    /// Tangent-plane forward direction (unit length).
    pub forward: Vec3,
    /// Tangent-plane right direction (unit length).
    pub right: Vec3,
    /// Surface normal (unit length).
    pub up: Vec3,
}

impl TangentBasis {
    /// Builds a basis from a surface normal and a reference forward.
    ///
    /// The reference is projected onto the tangent plane. When the reference
    /// is nearly parallel to `up` (looking straight along the normal while
    /// standing at a pole of the reference axis), a secondary world axis is
    /// substituted so the projection never collapses to zero.
    #[must_use]
    pub fn from_up_and_reference(up: Vec3, raw_forward: Vec3) -> Self {
        let mut forward = raw_forward - up * up.dot(raw_forward);
        if forward.length_squared() < MIN_TANGENT_LEN_SQ {
            // Secondary reference: pick whichever world axis is least
            // aligned with up, then project it the same way.
            let alt = if up.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
            forward = alt - up * up.dot(alt);
        }
        let forward = forward.normalize();
        let right = forward.cross(up).normalize();
        Self { forward, right, up }
    }

    /// Builds the basis at a surface position using the world −Z reference.
    #[must_use]
    pub fn at_position(position: Vec3, planet_center: Vec3) -> Self {
        Self::from_up_and_reference(surface_up(position, planet_center), Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_up_is_unit_and_points_outward() {
        let cases = [
            (Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO),
            (Vec3::new(3.0, 4.0, 0.0), Vec3::ZERO),
            (Vec3::new(-7.0, 2.0, 5.0), Vec3::new(1.0, 1.0, 1.0)),
            (Vec3::new(0.001, 0.0, 0.0), Vec3::ZERO),
        ];
        for (pos, center) in cases {
            let up = surface_up(pos, center);
            assert!(
                (up.length() - 1.0).abs() < EPS,
                "up should be unit length for {pos:?}"
            );
            let radial = (pos - center).normalize();
            assert!(
                (up - radial).length() < EPS,
                "up should point from center toward position for {pos:?}"
            );
        }
    }

    #[test]
    fn test_position_at_center_defaults_to_world_y() {
        let up = surface_up(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(up, Vec3::Y);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let ups = [
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::new(1.0, 1.0, 1.0).normalize(),
            Vec3::new(-0.2, 0.9, 0.4).normalize(),
        ];
        for up in ups {
            let basis = TangentBasis::from_up_and_reference(up, Vec3::NEG_Z);
            assert!(basis.forward.dot(basis.up).abs() < EPS, "forward ⊥ up for {up:?}");
            assert!(basis.right.dot(basis.up).abs() < EPS, "right ⊥ up for {up:?}");
            assert!(
                basis.right.dot(basis.forward).abs() < EPS,
                "right ⊥ forward for {up:?}"
            );
            assert!((basis.forward.length() - 1.0).abs() < EPS);
            assert!((basis.right.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_reference_parallel_to_up_uses_secondary_axis() {
        // up == -reference: the projection of -Z onto the tangent plane of
        // -Z is zero, so the fallback axis must kick in.
        let basis = TangentBasis::from_up_and_reference(Vec3::NEG_Z, Vec3::NEG_Z);
        assert!(basis.forward.length_squared() > 0.5, "forward must not collapse");
        assert!(basis.forward.dot(basis.up).abs() < EPS);
    }

    #[test]
    fn test_basis_at_north_pole_matches_world_axes() {
        let basis = TangentBasis::at_position(Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO);
        assert!((basis.up - Vec3::Y).length() < EPS);
        assert!((basis.forward - Vec3::NEG_Z).length() < EPS);
        assert!((basis.right - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_projection_removes_normal_component() {
        let up = Vec3::new(0.3, 0.8, 0.1).normalize();
        let raw = Vec3::new(0.5, 0.5, -0.7);
        let basis = TangentBasis::from_up_and_reference(up, raw);
        // The projected forward should equal raw minus its up component,
        // renormalized.
        let expected = (raw - up * up.dot(raw)).normalize();
        assert!((basis.forward - expected).length() < EPS);
    }
}
