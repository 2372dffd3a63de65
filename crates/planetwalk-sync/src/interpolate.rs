//! Remote-actor interpolation toward the latest server snapshot.
//!
//! Each remote actor gets an interpolation record: the displayed (current)
//! pose and the authoritative target from the newest snapshot. Every frame
//! the displayed pose is nudged toward the target: exponential smoothing
//! with a fixed blend factor rather than time-accurate playback between two
//! timestamps. Simpler, stable, and self-correcting when snapshots drop, at
//! the cost of a visual lag that grows with movement speed.

use std::collections::HashMap;
use std::time::Duration;

use glam::{Quat, Vec3};

use planetwalk_orient::{falling_rotation, grounded_look_rotation};

use crate::actor::{ActorId, ActorState};

/// Default fixed blend factor per advance step.
pub const DEFAULT_BLEND_FACTOR: f32 = 0.2;

/// How the per-frame blend factor is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendPolicy {
    /// Constant factor per advance call (exponential smoothing). Primary
    /// policy.
    Fixed(f32),
    /// Frame-time over a fixed window, clamped to 1. Alternative policy for
    /// time-delta-based playback.
    Windowed {
        /// Interpolation window; the displayed pose crosses the full
        /// remaining distance in roughly this long.
        window: Duration,
    },
}

impl Default for BlendPolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_BLEND_FACTOR)
    }
}

impl BlendPolicy {
    /// The blend factor for a frame of length `dt`, clamped to [0, 1].
    #[must_use]
    pub fn factor(&self, dt: Duration) -> f32 {
        match *self {
            Self::Fixed(t) => t.clamp(0.0, 1.0),
            Self::Windowed { window } => {
                let w = window.as_secs_f32();
                if w <= f32::EPSILON {
                    1.0
                } else {
                    (dt.as_secs_f32() / w).clamp(0.0, 1.0)
                }
            }
        }
    }
}

/// Displayed state of one remote actor, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteActorPose {
    /// Actor identifier.
    pub id: ActorId,
    /// Interpolated world position.
    pub position: Vec3,
    /// Displayed rotation.
    pub rotation: Quat,
    /// Interpolated surface normal.
    pub normal: Vec3,
    /// Grounded flag from the latest target.
    pub grounded: bool,
}

/// Actors that appeared or disappeared in one snapshot round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotDiff {
    /// Ids seen for the first time this round.
    pub added: Vec<ActorId>,
    /// Previously tracked ids absent from this round (disconnected).
    pub removed: Vec<ActorId>,
}

#[derive(Debug, Clone)]
struct InterpolationRecord {
    current_position: Vec3,
    current_normal: Vec3,
    displayed_rotation: Quat,
    target: ActorState,
    last_snapshot_at_ms: u64,
}

impl InterpolationRecord {
    /// A fresh record snaps the displayed pose straight onto the target.
    fn snapped_to(state: &ActorState, received_at_ms: u64) -> Self {
        Self {
            current_position: state.position,
            current_normal: state.safe_normal(),
            displayed_rotation: target_rotation(state, state.safe_normal()),
            target: state.clone(),
            last_snapshot_at_ms: received_at_ms,
        }
    }
}

/// The rotation a target state resolves to, given the normal to build the
/// tangent frame from.
fn target_rotation(state: &ActorState, normal: Vec3) -> Quat {
    if state.grounded {
        grounded_look_rotation(normal, state.rotation)
    } else {
        falling_rotation(state.rotation)
    }
}

/// Owns and smooths all remote actors' displayed state.
#[derive(Debug, Clone, Default)]
pub struct RemoteActorInterpolator {
    records: HashMap<ActorId, InterpolationRecord>,
    policy: BlendPolicy,
}

impl RemoteActorInterpolator {
    /// Creates an interpolator with the given blend policy.
    #[must_use]
    pub fn new(policy: BlendPolicy) -> Self {
        Self {
            records: HashMap::new(),
            policy,
        }
    }

    /// Ingests one authoritative snapshot round.
    ///
    /// Unseen actors get a record snapped onto the incoming state; known
    /// actors are retargeted. Any tracked id absent from `actors` is
    /// dropped. The local actor is never tracked here; its authoritative
    /// state comes from local physics.
    pub fn ingest_snapshot(
        &mut self,
        actors: &[ActorState],
        local_id: Option<&ActorId>,
        received_at_ms: u64,
    ) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();
        let mut seen: Vec<&ActorId> = Vec::with_capacity(actors.len());

        for state in actors {
            if Some(&state.id) == local_id {
                continue;
            }
            seen.push(&state.id);
            match self.records.get_mut(&state.id) {
                Some(rec) => {
                    rec.target = state.clone();
                    rec.last_snapshot_at_ms = received_at_ms;
                }
                None => {
                    tracing::debug!(id = %state.id, "tracking new remote actor");
                    self.records
                        .insert(state.id.clone(), InterpolationRecord::snapped_to(state, received_at_ms));
                    diff.added.push(state.id.clone());
                }
            }
        }

        let stale: Vec<ActorId> = self
            .records
            .keys()
            .filter(|id| !seen.contains(id))
            .cloned()
            .collect();
        for id in stale {
            tracing::debug!(id = %id, "remote actor left; dropping record");
            self.records.remove(&id);
            diff.removed.push(id);
        }

        diff
    }

    /// Advances every displayed pose toward its target by one frame.
    ///
    /// Position and normal lerp by the policy's blend factor; grounded
    /// rotations slerp toward the tangent-frame goal rebuilt from the
    /// interpolated normal, while falling rotations apply the target's
    /// yaw/pitch immediately (no surface constraint to smooth against).
    pub fn advance(&mut self, dt: Duration) {
        let t = self.policy.factor(dt);
        for rec in self.records.values_mut() {
            rec.current_position = rec.current_position.lerp(rec.target.position, t);
            rec.current_normal = rec
                .current_normal
                .lerp(rec.target.safe_normal(), t)
                .normalize_or(Vec3::Y);

            if rec.target.grounded {
                let goal = grounded_look_rotation(rec.current_normal, rec.target.rotation);
                rec.displayed_rotation = rec.displayed_rotation.slerp(goal, t).normalize();
            } else {
                rec.displayed_rotation = falling_rotation(rec.target.rotation);
            }
        }
    }

    /// The displayed pose of one tracked actor.
    #[must_use]
    pub fn pose(&self, id: &ActorId) -> Option<RemoteActorPose> {
        self.records.get(id).map(|rec| RemoteActorPose {
            id: id.clone(),
            position: rec.current_position,
            rotation: rec.displayed_rotation,
            normal: rec.current_normal,
            grounded: rec.target.grounded,
        })
    }

    /// Displayed poses of all tracked actors, in arbitrary order.
    pub fn poses(&self) -> impl Iterator<Item = RemoteActorPose> + '_ {
        self.records.keys().filter_map(|id| self.pose(id))
    }

    /// Receipt time of the newest snapshot targeting `id`, for staleness
    /// display.
    #[must_use]
    pub fn last_snapshot_at_ms(&self, id: &ActorId) -> Option<u64> {
        self.records.get(id).map(|rec| rec.last_snapshot_at_ms)
    }

    /// Number of tracked remote actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no remote actor is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
