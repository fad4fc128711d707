//! The single channel of truth to the parent.
//!
//! Serializes typed events as newline-delimited JSON, flushed immediately so
//! the parent never waits on a buffer boundary. The sink is cheaply cloneable
//! and single-threaded by design: the session and each progress emitter hold
//! handles to the same underlying stream.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use thiserror::Error;

use crate::protocol::ProtocolEvent;

// ============================================================================
// Error Types
// ============================================================================

/// Errors writing the protocol stream.
///
/// These are environment failures (exit code 98): once the stream is broken
/// the helper cannot report through it, so callers fall back to stderr.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to encode protocol event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write protocol stream: {0}")]
    Stream(#[from] io::Error),
}

// ============================================================================
// Event Sink
// ============================================================================

/// NDJSON writer over a shared output stream.
pub struct EventSink {
    out: Rc<RefCell<dyn Write>>,
}

impl EventSink {
    /// Sink bound to the process stdout (the production configuration).
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink over an owned writer.
    pub fn new<W: Write + 'static>(out: W) -> Self {
        Self {
            out: Rc::new(RefCell::new(out)),
        }
    }

    /// Sink over a shared writer, letting tests inspect what was written.
    pub fn from_shared<W: Write + 'static>(out: Rc<RefCell<W>>) -> Self {
        Self { out }
    }

    /// Write one event as a single JSON line and flush it.
    pub fn emit(&self, event: &ProtocolEvent) -> Result<(), SinkError> {
        let mut out = self.out.borrow_mut();
        serde_json::to_writer(&mut *out, event)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

impl Clone for EventSink {
    fn clone(&self) -> Self {
        Self {
            out: Rc::clone(&self.out),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_buffer() -> (Rc<RefCell<Vec<u8>>>, EventSink) {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let sink = EventSink::from_shared(Rc::clone(&buffer));
        (buffer, sink)
    }

    #[test]
    fn test_emit_writes_one_line_per_event() {
        let (buffer, sink) = shared_buffer();
        sink.emit(&ProtocolEvent::Complete).unwrap();
        sink.emit(&ProtocolEvent::Error {
            message: "boom".to_string(),
        })
        .unwrap();

        let text = String::from_utf8(buffer.borrow().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"status":"complete"}"#);
        assert_eq!(lines[1], r#"{"status":"error","message":"boom"}"#);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_clones_share_the_stream() {
        let (buffer, sink) = shared_buffer();
        let other = sink.clone();
        sink.emit(&ProtocolEvent::Complete).unwrap();
        other.emit(&ProtocolEvent::Complete).unwrap();

        let text = String::from_utf8(buffer.borrow().clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_write_failure_surfaces_as_stream_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = EventSink::new(Broken);
        let err = sink.emit(&ProtocolEvent::Complete).unwrap_err();
        assert!(matches!(err, SinkError::Encode(_) | SinkError::Stream(_)));
    }
}
