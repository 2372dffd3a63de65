//! Wire message types.
//!
//! All messages are JSON records tagged by a `type` field. The server sends
//! `init` once at connection establishment and `state` at its tick rate; the
//! client sends `input` at its sampling rate. Reconnection reuses the same
//! establishment procedure; the server re-`init`s with a possibly new id.

use serde::{Deserialize, Serialize};

use planetwalk_input::InputRecord;
use planetwalk_sync::{ActorId, ActorState};

/// Messages the server sends to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Identity and world constants, sent once per connection.
    Init {
        /// The id assigned to this client's actor.
        id: ActorId,
        /// Planet radius; immutable for the rest of the session.
        #[serde(rename = "planetRadius")]
        planet_radius: f32,
    },
    /// Authoritative snapshot of all actors.
    State {
        /// Every connected player's state this server tick.
        players: Vec<ActorState>,
    },
}

/// Messages the client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// One sampled input record.
    Input(InputRecord),
}
