//! Progress throttling.
//!
//! Rate-limits progress emission so a fast transfer cannot flood the parent
//! with events. Each emitter owns its own throttle; timestamps are never
//! shared across files.

use std::time::{Duration, Instant};

/// Rate-limiter for progress updates.
///
/// Ensures progress events are not emitted more frequently than the
/// configured interval. The first check after construction or [`reset`]
/// always passes.
///
/// [`reset`]: ProgressThrottle::reset
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Check if enough time has passed to emit another progress update.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Record an emission that bypassed the throttle, so a forced event
    /// still pushes back the next regular one.
    pub fn mark_emitted(&mut self) {
        self.last_emit = Some(Instant::now());
    }

    /// Force the next check to return true.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }
}
