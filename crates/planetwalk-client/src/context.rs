//! Session context: identity and world constants.
//!
//! One explicit object created at session start and torn down at session
//! end, with no global connection state. Components receive what they need from
//! here by value.

use glam::Vec3;

use planetwalk_sync::{ActorId, ActorState};

/// World constants received in the `init` message. Immutable for the life
/// of the connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConstants {
    /// Planet center in world space.
    pub planet_center: Vec3,
    /// Planet radius.
    pub planet_radius: f32,
}

/// Per-session identity and shared constants.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    local_id: Option<ActorId>,
    world: Option<WorldConstants>,
    local_state: Option<ActorState>,
}

impl SessionContext {
    /// Creates an empty context awaiting `init`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an `init` message. Called once per connection; after a
    /// reconnect the server re-inits with a possibly new id.
    pub fn apply_init(&mut self, id: ActorId, planet_radius: f32) {
        if let Some(old) = &self.local_id
            && *old != id
        {
            tracing::info!(%old, new = %id, "server assigned a new actor id");
            self.local_state = None;
        }
        self.local_id = Some(id);
        self.world = Some(WorldConstants {
            planet_center: Vec3::ZERO,
            planet_radius,
        });
    }

    /// Records the local actor's entry from an authoritative snapshot.
    pub fn note_snapshot(&mut self, actors: &[ActorState]) {
        if let Some(id) = &self.local_id
            && let Some(state) = actors.iter().find(|a| &a.id == id)
        {
            self.local_state = Some(state.clone());
        }
    }

    /// Returns `true` once `init` has been received.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.local_id.is_some()
    }

    /// The id the server assigned to this client, if initialized.
    #[must_use]
    pub fn local_id(&self) -> Option<&ActorId> {
        self.local_id.as_ref()
    }

    /// World constants, if initialized.
    #[must_use]
    pub fn world(&self) -> Option<WorldConstants> {
        self.world
    }

    /// The local actor's most recent server-side state, if any snapshot
    /// has listed it.
    #[must_use]
    pub fn local_state(&self) -> Option<&ActorState> {
        self.local_state.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetwalk_orient::LookAngles;

    fn actor(id: &str) -> ActorState {
        ActorState {
            id: ActorId::new(id),
            position: Vec3::new(0.0, 100.0, 0.0),
            rotation: LookAngles::default(),
            normal: Vec3::Y,
            grounded: true,
        }
    }

    #[test]
    fn test_uninitialized_context_has_nothing() {
        let ctx = SessionContext::new();
        assert!(!ctx.is_initialized());
        assert!(ctx.local_id().is_none());
        assert!(ctx.world().is_none());
    }

    #[test]
    fn test_init_sets_identity_and_world() {
        let mut ctx = SessionContext::new();
        ctx.apply_init(ActorId::new("A"), 100.0);
        assert_eq!(ctx.local_id(), Some(&ActorId::new("A")));
        let world = ctx.world().unwrap();
        assert_eq!(world.planet_radius, 100.0);
        assert_eq!(world.planet_center, Vec3::ZERO);
    }

    #[test]
    fn test_snapshot_yields_local_player_data() {
        let mut ctx = SessionContext::new();
        ctx.apply_init(ActorId::new("A"), 100.0);
        ctx.note_snapshot(&[actor("A"), actor("B")]);
        let me = ctx.local_state().expect("local player should be found");
        assert_eq!(me.id, ActorId::new("A"));
        assert_eq!(me.position, Vec3::new(0.0, 100.0, 0.0));
    }

    #[test]
    fn test_reinit_with_new_id_clears_stale_local_state() {
        let mut ctx = SessionContext::new();
        ctx.apply_init(ActorId::new("A"), 100.0);
        ctx.note_snapshot(&[actor("A")]);
        ctx.apply_init(ActorId::new("Z"), 100.0);
        assert!(ctx.local_state().is_none());
        assert_eq!(ctx.local_id(), Some(&ActorId::new("Z")));
    }
}
