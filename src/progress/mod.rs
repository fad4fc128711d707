//! Per-file progress emission.
//!
//! A [`ProgressEmitter`] is scoped to exactly one file transfer: it owns the
//! file's label, running byte counters, and throttle state. The external
//! transfer library is adapted onto the emitter's small byte-counter surface
//! (`set_total` / `advance` / `finish`) rather than the helper inheriting
//! from the library's own progress machinery.

mod throttle;

pub use throttle::ProgressThrottle;

use std::time::Duration;

use tracing::warn;

use crate::protocol::ProtocolEvent;
use crate::sink::EventSink;

/// Minimum spacing between regular progress events for one file.
///
/// Construction and completion bypass the throttle so the parent always
/// learns a file started before bytes move and always sees the final count.
pub const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Throttled progress reporter for one file transfer.
///
/// Constructing the emitter immediately announces the file with
/// `downloaded = 0` and the best-known total (size hint or 0).
pub struct ProgressEmitter {
    sink: EventSink,
    label: String,
    downloaded: u64,
    total: u64,
    throttle: ProgressThrottle,
    finished: bool,
    poisoned: bool,
}

impl ProgressEmitter {
    pub fn new(sink: EventSink, label: impl Into<String>, size_hint: Option<u64>) -> Self {
        let mut emitter = Self {
            sink,
            label: label.into(),
            downloaded: 0,
            total: size_hint.unwrap_or(0),
            throttle: ProgressThrottle::new(MIN_PROGRESS_INTERVAL),
            finished: false,
            poisoned: false,
        };
        emitter.force_emit();
        emitter
    }

    /// Record the library-resolved content length. Zero is ignored so a
    /// backend that reports "unknown" cannot erase a caller-supplied hint.
    pub fn set_total(&mut self, total: u64) {
        if total > 0 {
            self.total = total;
        }
    }

    /// Add `n` transferred bytes and emit if the throttle allows.
    pub fn advance(&mut self, n: u64) {
        self.downloaded += n;
        if self.throttle.should_emit() {
            self.write_event();
        }
    }

    /// Force-emit the final counters. Idempotent: the transfer backend and
    /// the session may both signal completion.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.force_emit();
    }

    /// Bytes counted so far.
    pub const fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// Best-known total for the file, 0 when unknown.
    pub const fn total(&self) -> u64 {
        self.total
    }

    fn force_emit(&mut self) {
        self.throttle.mark_emitted();
        self.write_event();
    }

    fn write_event(&mut self) {
        if self.poisoned {
            return;
        }
        let event = ProtocolEvent::Progress {
            file: self.label.clone(),
            downloaded: self.downloaded,
            total: self.total,
        };
        if let Err(err) = self.sink.emit(&event) {
            // The emitter runs inside the transfer library's callback, so a
            // broken pipe must not propagate from here. Stop emitting and
            // let the session's next protocol write surface the failure.
            warn!(
                target: "progress",
                file = %self.label,
                error = %err,
                "protocol stream rejected a write, dropping further progress events"
            );
            self.poisoned = true;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
