//! The state channel: a persistent ordered stream carrying JSON lines.
//!
//! A background reader task parses incoming lines into parsed messages the
//! session drains non-blockingly at its own tick; receipt never suspends
//! the tick loop. Outbound input records are written directly. Teardown is
//! explicit: [`StateChannel::close`] stops the reader task and shuts the
//! stream down, so nothing is left running on a torn-down session.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use planetwalk_input::InputRecord;

use crate::codec::{CodecError, decode_server_line, encode_client_line, read_wire_line};
use crate::messages::{ClientMessage, ServerMessage};

/// Connectivity state surfaced to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// TCP handshake in progress.
    Connecting,
    /// Established and exchanging messages.
    Connected,
    /// Lost or intentionally closed.
    Disconnected,
}

impl ChannelStatus {
    fn as_u8(self) -> u8 {
        match self {
            Self::Connecting => 0,
            Self::Connected => 1,
            Self::Disconnected => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Connecting,
            1 => Self::Connected,
            _ => Self::Disconnected,
        }
    }
}

/// Errors surfaced by channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A message could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The channel is no longer connected.
    #[error("channel disconnected")]
    Disconnected,
}

/// A connected state channel.
///
/// Owns the writer half of the stream, the parsed-message queue fed by the
/// background reader task, and the shared connectivity flag.
pub struct StateChannel {
    writer: Box<dyn AsyncWrite + Send + Unpin>,
    incoming: mpsc::UnboundedReceiver<ServerMessage>,
    status: Arc<AtomicU8>,
    reader_task: JoinHandle<()>,
}

impl StateChannel {
    /// Connects to the server at `addr` over TCP with `TCP_NODELAY`.
    pub async fn connect(addr: SocketAddr) -> Result<Self, ChannelError> {
        tracing::info!(%addr, "connecting to state server");
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::from_stream(stream))
    }

    /// Wraps an already-established ordered stream. Used by tests with
    /// `tokio::io::duplex` and by [`connect`](Self::connect).
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let status = Arc::new(AtomicU8::new(ChannelStatus::Connected.as_u8()));
        let (tx, rx) = mpsc::unbounded_channel();

        let reader_status = Arc::clone(&status);
        let reader_task = tokio::spawn(async move {
            read_loop(read_half, tx, reader_status).await;
        });

        Self {
            writer: Box::new(write_half) as Box<dyn AsyncWrite + Send + Unpin>,
            incoming: rx,
            status,
            reader_task,
        }
    }

    /// Returns the next parsed message, if one has arrived. Never blocks.
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        self.incoming.try_recv().ok()
    }

    /// Sends one input record as a JSON line.
    pub async fn send_input(&mut self, record: &InputRecord) -> Result<(), ChannelError> {
        if self.status() == ChannelStatus::Disconnected {
            return Err(ChannelError::Disconnected);
        }
        let line = encode_client_line(&ClientMessage::Input(record.clone()))?;
        if let Err(e) = self.writer.write_all(line.as_bytes()).await {
            self.status
                .store(ChannelStatus::Disconnected.as_u8(), Ordering::Relaxed);
            return Err(e.into());
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Current connectivity state, for the UI layer.
    #[must_use]
    pub fn status(&self) -> ChannelStatus {
        ChannelStatus::from_u8(self.status.load(Ordering::Relaxed))
    }

    /// Closes the channel: stops the reader task and shuts the stream down.
    pub async fn close(mut self) {
        self.reader_task.abort();
        self.status
            .store(ChannelStatus::Disconnected.as_u8(), Ordering::Relaxed);
        let _ = self.writer.shutdown().await;
        tracing::info!("state channel closed");
    }
}

/// Parses lines off the stream until EOF, error, or abort. Malformed lines
/// are logged and skipped so one bad record never stalls the snapshot feed.
async fn read_loop<R>(
    read_half: R,
    tx: mpsc::UnboundedSender<ServerMessage>,
    status: Arc<AtomicU8>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(read_half);
    loop {
        match read_wire_line(&mut reader).await {
            Ok(Some(line)) => match decode_server_line(&line) {
                Ok(msg) => {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
                Err(CodecError::EmptyLine) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed server line");
                }
            },
            Ok(None) => {
                tracing::info!("server closed the state channel");
                break;
            }
            Err(CodecError::Io(e)) => {
                tracing::warn!(error = %e, "state channel read failed");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed server line");
            }
        }
    }
    status.store(ChannelStatus::Disconnected.as_u8(), Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use glam::Vec3;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    use planetwalk_orient::LookAngles;
    use planetwalk_sync::ActorId;

    /// Polls `try_recv` until a message arrives or the deadline passes.
    async fn recv_with_timeout(channel: &mut StateChannel) -> Option<ServerMessage> {
        for _ in 0..100 {
            if let Some(msg) = channel.try_recv() {
                return Some(msg);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        None
    }

    #[tokio::test]
    async fn test_init_message_is_delivered() {
        let (client_end, mut server_end) = tokio::io::duplex(4096);
        let mut channel = StateChannel::from_stream(client_end);

        server_end
            .write_all(b"{ \"type\": \"init\", \"id\": \"A\", \"planetRadius\": 100.0 }\n")
            .await
            .unwrap();

        let msg = recv_with_timeout(&mut channel).await.expect("init should arrive");
        assert_eq!(
            msg,
            ServerMessage::Init {
                id: ActorId::new("A"),
                planet_radius: 100.0
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_line_is_skipped_not_fatal() {
        let (client_end, mut server_end) = tokio::io::duplex(4096);
        let mut channel = StateChannel::from_stream(client_end);

        server_end.write_all(b"not json at all\n").await.unwrap();
        server_end
            .write_all(b"{ \"type\": \"state\", \"players\": [] }\n")
            .await
            .unwrap();

        let msg = recv_with_timeout(&mut channel).await.expect("state should arrive");
        assert_eq!(msg, ServerMessage::State { players: vec![] });
    }

    #[tokio::test]
    async fn test_oversized_line_is_dropped_without_buffering() {
        use crate::codec::MAX_LINE_BYTES;

        let (client_end, mut server_end) = tokio::io::duplex(4096);
        let mut channel = StateChannel::from_stream(client_end);

        // A line past the limit is discarded at the read layer; the feed
        // resynchronizes on the following line.
        let writer = tokio::spawn(async move {
            let mut oversized = vec![b'x'; MAX_LINE_BYTES + 1];
            oversized.push(b'\n');
            server_end.write_all(&oversized).await.unwrap();
            server_end
                .write_all(b"{ \"type\": \"state\", \"players\": [] }\n")
                .await
                .unwrap();
            server_end
        });

        let msg = recv_with_timeout(&mut channel).await.expect("state should arrive");
        assert_eq!(msg, ServerMessage::State { players: vec![] });
        assert_eq!(channel.status(), ChannelStatus::Connected);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_input_writes_decodable_line() {
        let (client_end, server_end) = tokio::io::duplex(4096);
        let mut channel = StateChannel::from_stream(client_end);

        let record = InputRecord {
            direction: Vec3::new(0.0, 0.0, -1.0),
            rotation: LookAngles::new(0.3, 0.0),
            jump: false,
            timestamp_ms: 42,
        };
        channel.send_input(&record).await.unwrap();

        let (read_half, _write_half) = tokio::io::split(server_end);
        let mut lines = BufReader::new(read_half).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let msg: ClientMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(msg, ClientMessage::Input(record));
    }

    #[tokio::test]
    async fn test_server_eof_flips_status_to_disconnected() {
        let (client_end, server_end) = tokio::io::duplex(4096);
        let channel = StateChannel::from_stream(client_end);
        assert_eq!(channel.status(), ChannelStatus::Connected);

        drop(server_end);
        for _ in 0..100 {
            if channel.status() == ChannelStatus::Disconnected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("status should become Disconnected after server EOF");
    }

    #[tokio::test]
    async fn test_close_stops_reader_and_disconnects() {
        let (client_end, _server_end) = tokio::io::duplex(4096);
        let channel = StateChannel::from_stream(client_end);
        let status = Arc::clone(&channel.status);
        channel.close().await;
        assert_eq!(
            ChannelStatus::from_u8(status.load(Ordering::Relaxed)),
            ChannelStatus::Disconnected
        );
    }

    #[tokio::test]
    async fn test_send_after_disconnect_errors() {
        let (client_end, server_end) = tokio::io::duplex(64);
        let mut channel = StateChannel::from_stream(client_end);
        drop(server_end);

        // Wait for the reader to notice EOF.
        for _ in 0..100 {
            if channel.status() == ChannelStatus::Disconnected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        let record = InputRecord {
            direction: Vec3::ZERO,
            rotation: LookAngles::default(),
            jump: false,
            timestamp_ms: 0,
        };
        let result = channel.send_input(&record).await;
        assert!(matches!(result, Err(ChannelError::Disconnected)));
    }
}
