//! Network state channel: wire messages, framing, the tokio TCP channel,
//! and fixed-delay reconnection.
//!
//! The wire is newline-delimited JSON records over a persistent ordered
//! stream. Incoming `init`/`state` messages are parsed off the socket by a
//! background task and drained non-blockingly by the session tick; outbound
//! `input` records are written as they are sampled.

pub mod channel;
pub mod codec;
pub mod messages;
pub mod reconnect;

pub use channel::{ChannelError, ChannelStatus, StateChannel};
pub use codec::{CodecError, decode_server_line, encode_client_line, read_wire_line};
pub use messages::{ClientMessage, ServerMessage};
pub use reconnect::{ReconnectPolicy, reconnect_loop};
