//! The async driver: two fixed-cadence timers around one session.
//!
//! Render ticks drain the channel and advance the session; input ticks
//! sample and send. When the channel reports itself disconnected, the
//! input tick swaps it out via the reconnect loop and keeps going. A
//! watch flag requests shutdown; the channel is closed explicitly, and
//! the session is handed back to the caller.

use std::net::SocketAddr;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tokio::time::interval;

use planetwalk_input::DEFAULT_SAMPLE_INTERVAL;
use planetwalk_net::{ChannelStatus, ReconnectPolicy, StateChannel};

use crate::physics::PhysicsBody;
use crate::scene::ActorScene;
use crate::session::Session;

/// Milliseconds since the Unix epoch, for input and snapshot timestamps.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Cadences and reconnect behavior for [`drive`].
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Render tick period.
    pub render_interval: Duration,
    /// Input sampling period.
    pub input_interval: Duration,
    /// Fixed-delay reconnect policy.
    pub reconnect: ReconnectPolicy,
    /// Server address, used for reconnection.
    pub server_addr: SocketAddr,
}

impl RunnerConfig {
    /// 60 Hz render, 30 Hz input, default reconnect delay.
    #[must_use]
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            render_interval: Duration::from_micros(16_667),
            input_interval: DEFAULT_SAMPLE_INTERVAL,
            reconnect: ReconnectPolicy::default(),
            server_addr,
        }
    }
}

/// Drives the session until `shutdown` flips to true, then closes the
/// channel and returns the session for inspection.
pub async fn drive<P, S>(
    mut session: Session<P, S>,
    mut channel: StateChannel,
    config: RunnerConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Session<P, S>
where
    P: PhysicsBody,
    S: ActorScene,
{
    let mut render = interval(config.render_interval);
    let mut input = interval(config.input_interval);
    let mut last_frame = Instant::now();

    session.set_connectivity(channel.status());

    loop {
        tokio::select! {
            _ = render.tick() => {
                while let Some(msg) = channel.try_recv() {
                    session.handle_message(msg, now_ms());
                }
                session.set_connectivity(channel.status());
                let now = Instant::now();
                let dt = (now - last_frame).as_secs_f32();
                last_frame = now;
                session.render_tick(dt);
            }
            _ = input.tick() => {
                if channel.status() == ChannelStatus::Disconnected {
                    tracing::warn!(addr = %config.server_addr, "channel down, reconnecting");
                    session.set_connectivity(ChannelStatus::Connecting);
                    let reconnect =
                        planetwalk_net::reconnect_loop(config.server_addr, config.reconnect);
                    tokio::pin!(reconnect);
                    // Rendering and teardown stay live while the server is
                    // unreachable; only input sampling pauses.
                    let fresh = loop {
                        tokio::select! {
                            fresh = &mut reconnect => break fresh,
                            _ = render.tick() => {
                                let now = Instant::now();
                                let dt = (now - last_frame).as_secs_f32();
                                last_frame = now;
                                session.render_tick(dt);
                            }
                            changed = shutdown.changed() => {
                                if changed.is_err() || *shutdown.borrow() {
                                    channel.close().await;
                                    return session;
                                }
                            }
                        }
                    };
                    channel.close().await;
                    channel = fresh;
                    session.set_connectivity(channel.status());
                    continue;
                }
                if let Some(record) = session.input_tick(now_ms())
                    && let Err(err) = channel.send_input(&record).await
                {
                    tracing::warn!(%err, "failed to send input record");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    channel.close().await;
    session
}
