//! The session: per-frame control flow over all core components.
//!
//! Each render frame runs a strict sequence: ingest pending snapshot,
//! apply look input, step physics under gravity, solve the local
//! orientation, advance remote interpolation, push transforms to the scene.
//! Input ticks run on their own fixed cadence and produce the outbound
//! record; the runner owns the actual send. Everything here is synchronous,
//! so the whole flow is testable without a runtime or socket.

use std::time::Duration;

use glam::{Quat, Vec3};

use planetwalk_config::Config;
use planetwalk_input::{InputRecord, InputSampler, KeyboardState, MouseLook};
use planetwalk_net::{ChannelStatus, ServerMessage};
use planetwalk_orient::{OrientationSolver, Stance, gravity_force, surface_up};
use planetwalk_sync::{BlendPolicy, RemoteActorInterpolator, SnapshotBuffer, StateSnapshot};

use crate::context::SessionContext;
use crate::physics::PhysicsBody;
use crate::scene::{ActorScene, compose_camera_transform};

/// Tunables for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Mouse sensitivity multiplier.
    pub mouse_sensitivity: f32,
    /// Invert the pitch axis.
    pub invert_y: bool,
    /// Gravity magnitude fed to the physics body each frame.
    pub gravity_strength: f32,
    /// Camera eye offset in the body's local frame.
    pub eye_offset: Vec3,
    /// Remote-actor blend policy.
    pub blend_policy: BlendPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.003,
            invert_y: false,
            gravity_strength: 9.8,
            eye_offset: Vec3::new(0.0, 1.7, 0.0),
            blend_policy: BlendPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Builds session tunables from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let blend_policy = if config.sync.windowed {
            BlendPolicy::Windowed {
                window: Duration::from_millis(config.sync.window_ms),
            }
        } else {
            BlendPolicy::Fixed(config.sync.blend_factor)
        };
        Self {
            mouse_sensitivity: config.input.mouse_sensitivity,
            invert_y: config.input.invert_y,
            blend_policy,
            ..Self::default()
        }
    }
}

/// One client session: identity, input state, orientation, interpolation,
/// and the collaborator seams.
pub struct Session<P: PhysicsBody, S: ActorScene> {
    /// Keyboard tracker; the platform layer forwards events here.
    pub keyboard: KeyboardState,
    /// Mouse look accumulator; the platform layer forwards deltas here.
    pub mouse: MouseLook,
    ctx: SessionContext,
    solver: OrientationSolver,
    sampler: InputSampler,
    interpolator: RemoteActorInterpolator,
    buffer: SnapshotBuffer,
    physics: P,
    scene: S,
    config: SessionConfig,
    connectivity: ChannelStatus,
    camera: (Vec3, Quat),
}

impl<P: PhysicsBody, S: ActorScene> Session<P, S> {
    /// Creates a session around the physics and scene collaborators.
    pub fn new(physics: P, scene: S, config: SessionConfig) -> Self {
        Self {
            keyboard: KeyboardState::new(),
            mouse: MouseLook::new(),
            ctx: SessionContext::new(),
            solver: OrientationSolver::new(),
            sampler: InputSampler::new(),
            interpolator: RemoteActorInterpolator::new(config.blend_policy),
            buffer: SnapshotBuffer::new(),
            physics,
            scene,
            config,
            connectivity: ChannelStatus::Connecting,
            camera: (Vec3::ZERO, Quat::IDENTITY),
        }
    }

    /// Handles one parsed server message. Called from the receive path;
    /// the snapshot itself is consumed by the next render tick.
    pub fn handle_message(&mut self, msg: ServerMessage, received_at_ms: u64) {
        match msg {
            ServerMessage::Init { id, planet_radius } => {
                tracing::info!(%id, planet_radius, "session initialized");
                self.ctx.apply_init(id, planet_radius);
            }
            ServerMessage::State { players } => {
                self.ctx.note_snapshot(&players);
                self.buffer.push(StateSnapshot {
                    actors: players,
                    received_at_ms,
                });
            }
        }
    }

    /// One outbound input tick. Returns the record to send, or `None` when
    /// the pointer is not captured (the cursor belongs to the UI then).
    pub fn input_tick(&mut self, now_ms: u64) -> Option<InputRecord> {
        if !self.mouse.is_captured() {
            return None;
        }
        Some(self.sampler.sample(&self.keyboard, self.solver.look, now_ms))
    }

    /// One render frame, `dt` seconds after the previous one.
    pub fn render_tick(&mut self, dt: f32) {
        // 1. Ingest the latest snapshot, if one arrived since last frame.
        if let Some(snapshot) = self.buffer.poll().cloned() {
            let diff = self.interpolator.ingest_snapshot(
                &snapshot.actors,
                self.ctx.local_id(),
                snapshot.received_at_ms,
            );
            for id in &diff.added {
                self.scene.add_actor(id);
            }
            for id in &diff.removed {
                self.scene.remove_actor(id);
            }
        }

        // 2. Look input.
        let delta = self.mouse.take_delta();
        let dy = if self.config.invert_y { -delta.y } else { delta.y };
        self.solver
            .look
            .apply_mouse_delta(delta.x, dy, self.config.mouse_sensitivity);
        self.sampler.note_frame(&self.keyboard);

        // 3. Local physics under gravity, then stance from the result.
        if let Some(world) = self.ctx.world() {
            let force = gravity_force(
                self.physics.position(),
                world.planet_center,
                self.config.gravity_strength,
            );
            self.physics.apply_force(force);
            self.physics.step(dt);
            self.solver.set_stance(if self.physics.grounded() {
                Stance::Grounded
            } else {
                Stance::Falling
            });

            // 4. Local orientation and transforms.
            let position = self.physics.position();
            let up = surface_up(position, world.planet_center);
            let body_rotation = self.solver.body_rotation(up);
            let camera_rotation = self.solver.camera_rotation(up);
            self.camera = compose_camera_transform(
                position,
                body_rotation,
                camera_rotation,
                self.config.eye_offset,
            );
            if let Some(id) = self.ctx.local_id() {
                self.scene.set_transform(id, position, body_rotation);
            }
        }

        // 5. Remote actors.
        self.interpolator.advance(Duration::from_secs_f32(dt.max(0.0)));
        for pose in self.interpolator.poses() {
            self.scene.set_transform(&pose.id, pose.position, pose.rotation);
        }

        self.keyboard.clear_transients();
    }

    /// Records the channel's connectivity for the UI layer.
    pub fn set_connectivity(&mut self, status: ChannelStatus) {
        if status != self.connectivity {
            tracing::info!(?status, "connectivity changed");
        }
        self.connectivity = status;
    }

    /// Current connectivity, as last reported by the runner.
    #[must_use]
    pub fn connectivity(&self) -> ChannelStatus {
        self.connectivity
    }

    /// The session context (identity, world constants, local player data).
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// The camera transform computed by the last render tick.
    #[must_use]
    pub fn camera_transform(&self) -> (Vec3, Quat) {
        self.camera
    }

    /// The remote-actor interpolator, for render-state queries.
    #[must_use]
    pub fn interpolator(&self) -> &RemoteActorInterpolator {
        &self.interpolator
    }

    /// The scene collaborator.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }
}
