//! Newline-delimited JSON framing.
//!
//! One message per line. The transport guarantees ordering and reliability;
//! this layer only turns lines into [`ServerMessage`]s and
//! [`ClientMessage`]s into lines, with a size guard against pathological
//! input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::messages::{ClientMessage, ServerMessage};

/// Maximum accepted line length in bytes. A `state` round for a full server
/// fits comfortably; anything larger is a protocol violation.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Errors produced while encoding or decoding wire lines.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A blank line arrived where a message was expected.
    #[error("empty line")]
    EmptyLine,

    /// The line exceeded [`MAX_LINE_BYTES`].
    #[error("line of {len} bytes exceeds limit of {max}")]
    LineTooLong {
        /// Actual line length.
        len: usize,
        /// The enforced limit.
        max: usize,
    },

    /// JSON (de)serialization failed.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// The underlying stream failed mid-line.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The line was not valid UTF-8.
    #[error("line is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encodes a client message as one newline-terminated JSON line.
pub fn encode_client_line(msg: &ClientMessage) -> Result<String, CodecError> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}

/// Reads one newline-terminated line, never buffering more than
/// [`MAX_LINE_BYTES`] of it.
///
/// The limit is enforced while reading: an oversized line is drained off
/// the stream in bounded chunks and reported as
/// [`CodecError::LineTooLong`], leaving the reader positioned at the next
/// line. Returns `Ok(None)` at a clean EOF; a final unterminated line is
/// still returned. A trailing `\r` is stripped along with the newline.
pub async fn read_wire_line<R>(reader: &mut R) -> Result<Option<String>, CodecError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        // One extra byte of budget distinguishes "exactly at the limit"
        // from "over it".
        let budget = (MAX_LINE_BYTES + 1 - buf.len()) as u64;
        let n = (&mut *reader).take(budget).read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return if buf.is_empty() {
                Ok(None)
            } else {
                Ok(Some(String::from_utf8(buf)?))
            };
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
            return Ok(Some(String::from_utf8(buf)?));
        }
        if buf.len() > MAX_LINE_BYTES {
            let len = drain_oversized_line(reader, buf.len()).await?;
            return Err(CodecError::LineTooLong {
                len,
                max: MAX_LINE_BYTES,
            });
        }
        // Budget not exhausted and no newline yet: the take hit a short
        // read, keep filling.
    }
}

/// Consumes the remainder of an over-limit line in bounded chunks so the
/// stream stays aligned on line boundaries. Returns the full line length.
async fn drain_oversized_line<R>(reader: &mut R, mut len: usize) -> Result<usize, CodecError>
where
    R: AsyncBufRead + Unpin,
{
    let mut scratch = Vec::with_capacity(4096);
    loop {
        scratch.clear();
        let n = (&mut *reader).take(4096).read_until(b'\n', &mut scratch).await?;
        if n == 0 {
            return Ok(len);
        }
        len += n;
        if scratch.last() == Some(&b'\n') {
            return Ok(len - 1);
        }
    }
}

/// Decodes one line into a server message.
pub fn decode_server_line(line: &str) -> Result<ServerMessage, CodecError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CodecError::EmptyLine);
    }
    if trimmed.len() > MAX_LINE_BYTES {
        return Err(CodecError::LineTooLong {
            len: trimmed.len(),
            max: MAX_LINE_BYTES,
        });
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use planetwalk_input::InputRecord;
    use planetwalk_orient::LookAngles;
    use planetwalk_sync::ActorId;

    #[test]
    fn test_encode_terminates_with_newline() {
        let msg = ClientMessage::Input(InputRecord {
            direction: Vec3::ZERO,
            rotation: LookAngles::default(),
            jump: false,
            timestamp_ms: 0,
        });
        let line = encode_client_line(&msg).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_decode_round_trips_init() {
        let line = r#"{ "type": "init", "id": "X", "planetRadius": 50.0 }"#;
        let msg = decode_server_line(line).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Init {
                id: ActorId::new("X"),
                planet_radius: 50.0
            }
        );
    }

    #[test]
    fn test_empty_line_rejected() {
        assert!(matches!(decode_server_line("  \n"), Err(CodecError::EmptyLine)));
    }

    #[test]
    fn test_unknown_message_type_rejected_without_panic() {
        let result = decode_server_line(r#"{ "type": "teleport", "x": 1 }"#);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_oversized_line_rejected() {
        let huge = format!(r#"{{ "type": "state", "players": "{}" }}"#, "x".repeat(MAX_LINE_BYTES));
        assert!(matches!(
            decode_server_line(&huge),
            Err(CodecError::LineTooLong { .. })
        ));
    }

    #[test]
    fn test_truncated_json_rejected() {
        let result = decode_server_line(r#"{ "type": "init", "id": "A""#);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[tokio::test]
    async fn test_read_wire_line_splits_lines_and_ends_with_none() {
        let mut reader = tokio::io::BufReader::new(&b"first\r\nsecond\n"[..]);
        assert_eq!(read_wire_line(&mut reader).await.unwrap().as_deref(), Some("first"));
        assert_eq!(read_wire_line(&mut reader).await.unwrap().as_deref(), Some("second"));
        assert!(read_wire_line(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_wire_line_returns_unterminated_tail() {
        let mut reader = tokio::io::BufReader::new(&b"no newline"[..]);
        assert_eq!(
            read_wire_line(&mut reader).await.unwrap().as_deref(),
            Some("no newline")
        );
        assert!(read_wire_line(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_wire_line_bounds_buffering_and_resyncs() {
        // The oversized line must be rejected without being held in memory
        // whole, and the reader must land cleanly on the next line.
        let oversized_len = MAX_LINE_BYTES + 9000;
        let mut input = vec![b'x'; oversized_len];
        input.push(b'\n');
        input.extend_from_slice(b"{ \"type\": \"state\", \"players\": [] }\n");

        let mut reader = tokio::io::BufReader::new(&input[..]);
        match read_wire_line(&mut reader).await {
            Err(CodecError::LineTooLong { len, max }) => {
                assert_eq!(len, oversized_len);
                assert_eq!(max, MAX_LINE_BYTES);
            }
            other => panic!("expected LineTooLong, got {other:?}"),
        }
        let next = read_wire_line(&mut reader).await.unwrap().expect("next line");
        assert!(decode_server_line(&next).is_ok());
        assert!(read_wire_line(&mut reader).await.unwrap().is_none());
    }
}
