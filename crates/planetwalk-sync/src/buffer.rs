//! Two-slot buffer for authoritative state snapshots.
//!
//! Network receipt overwrites the latest slot immediately on arrival; the
//! tick that next reads the buffer consumes it. Exactly two snapshots are
//! retained (previous + latest), never a queue.

use crate::actor::ActorState;

/// One authoritative snapshot round as received from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    /// All actors the server listed this round.
    pub actors: Vec<ActorState>,
    /// Client wall-clock milliseconds at receipt.
    pub received_at_ms: u64,
}

/// Holds the latest and previous snapshots, with consume-once semantics for
/// the latest.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuffer {
    previous: Option<StateSnapshot>,
    latest: Option<StateSnapshot>,
    consumed: bool,
}

impl SnapshotBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an arriving snapshot, demoting the previous latest. Called
    /// from the receive path, outside any tick.
    pub fn push(&mut self, snapshot: StateSnapshot) {
        self.previous = self.latest.take();
        self.latest = Some(snapshot);
        self.consumed = false;
    }

    /// Returns the latest snapshot if one arrived since the last poll.
    pub fn poll(&mut self) -> Option<&StateSnapshot> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        self.latest.as_ref()
    }

    /// The most recently received snapshot, consumed or not.
    #[must_use]
    pub fn latest(&self) -> Option<&StateSnapshot> {
        self.latest.as_ref()
    }

    /// The snapshot before the latest, if two have arrived.
    #[must_use]
    pub fn previous(&self) -> Option<&StateSnapshot> {
        self.previous.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(t: u64) -> StateSnapshot {
        StateSnapshot {
            actors: Vec::new(),
            received_at_ms: t,
        }
    }

    #[test]
    fn test_empty_buffer_polls_none() {
        let mut buf = SnapshotBuffer::new();
        assert!(buf.poll().is_none());
    }

    #[test]
    fn test_poll_consumes_once() {
        let mut buf = SnapshotBuffer::new();
        buf.push(snap(1));
        assert_eq!(buf.poll().unwrap().received_at_ms, 1);
        assert!(buf.poll().is_none(), "second poll without a new arrival");
    }

    #[test]
    fn test_new_arrival_rearms_poll() {
        let mut buf = SnapshotBuffer::new();
        buf.push(snap(1));
        let _ = buf.poll();
        buf.push(snap(2));
        assert_eq!(buf.poll().unwrap().received_at_ms, 2);
    }

    #[test]
    fn test_exactly_two_snapshots_retained() {
        let mut buf = SnapshotBuffer::new();
        buf.push(snap(1));
        buf.push(snap(2));
        buf.push(snap(3));
        assert_eq!(buf.latest().unwrap().received_at_ms, 3);
        assert_eq!(buf.previous().unwrap().received_at_ms, 2);
    }

    #[test]
    fn test_unconsumed_snapshot_overwritten_by_newer() {
        // A burst of arrivals between ticks: the tick only ever sees the
        // newest state, never a stale intermediate.
        let mut buf = SnapshotBuffer::new();
        buf.push(snap(1));
        buf.push(snap(2));
        assert_eq!(buf.poll().unwrap().received_at_ms, 2);
    }
}
