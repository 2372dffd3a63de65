//! Renderer seam: explicit transform handoff.
//!
//! Actors are positioned by explicit transform composition computed each
//! frame (actor transform times camera offset) rather than a scene-graph
//! parent/child hierarchy, which keeps the orientation math testable in
//! isolation from any renderer.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use planetwalk_sync::ActorId;

/// Mutation surface the renderer exposes to the session.
pub trait ActorScene {
    /// A new actor appeared; create its visual representation.
    fn add_actor(&mut self, id: &ActorId);
    /// An actor left; remove its visual representation.
    fn remove_actor(&mut self, id: &ActorId);
    /// Positions and orients an actor's body mesh.
    fn set_transform(&mut self, id: &ActorId, position: Vec3, rotation: Quat);
}

/// Composes the camera transform from the body transform and a local eye
/// offset, replacing implicit scene-graph propagation.
///
/// The eye offset is expressed in the body's local frame (e.g. `(0, 1.7, 0)`
/// for head height); the camera rotation is supplied separately since the
/// camera pitches freely while a grounded body does not.
#[must_use]
pub fn compose_camera_transform(
    body_position: Vec3,
    body_rotation: Quat,
    camera_rotation: Quat,
    eye_offset: Vec3,
) -> (Vec3, Quat) {
    (body_position + body_rotation * eye_offset, camera_rotation)
}

/// Scene double that records every mutation. Used by session tests and
/// headless runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    /// Ids added, in order.
    pub added: Vec<ActorId>,
    /// Ids removed, in order.
    pub removed: Vec<ActorId>,
    /// Latest transform per actor.
    pub transforms: HashMap<ActorId, (Vec3, Quat)>,
}

impl ActorScene for RecordingScene {
    fn add_actor(&mut self, id: &ActorId) {
        self.added.push(id.clone());
    }

    fn remove_actor(&mut self, id: &ActorId) {
        self.removed.push(id.clone());
        self.transforms.remove(id);
    }

    fn set_transform(&mut self, id: &ActorId, position: Vec3, rotation: Quat) {
        self.transforms.insert(id.clone(), (position, rotation));
    }
}
