//! Fixed-delay reconnection.
//!
//! When the channel closes unexpectedly, the client retries after a fixed
//! delay, indefinitely. No exponential backoff and no attempt cap: the
//! server is the client's only peer and a best-effort game client should
//! simply keep knocking. (A production service would want backoff; a game
//! client reconnecting to its one server does not.)

use std::net::SocketAddr;
use std::time::Duration;

use crate::channel::StateChannel;

/// Reconnection policy: one fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before each reconnection attempt. Default: 3 s.
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(3),
        }
    }
}

impl ReconnectPolicy {
    /// The delay before attempt number `attempt` (1-based). Always the same
    /// fixed value; the parameter exists so call sites read naturally in
    /// logs and tests.
    #[must_use]
    pub fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Retries connecting to `addr` until it succeeds.
///
/// Each cycle sleeps the policy delay, then attempts a fresh connection.
/// The server re-`init`s the client after reconnection (possibly with a new
/// id), so nothing needs to be re-sent from this side.
pub async fn reconnect_loop(addr: SocketAddr, policy: ReconnectPolicy) -> StateChannel {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let delay = policy.delay_for_attempt(attempt);
        tracing::info!(attempt, ?delay, "scheduling reconnection attempt");
        tokio::time::sleep(delay).await;

        match StateChannel::connect(addr).await {
            Ok(channel) => {
                tracing::info!(attempt, "reconnected to state server");
                return channel;
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "reconnection attempt failed");
            }
        }
    }
}
