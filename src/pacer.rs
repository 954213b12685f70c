//! Decouples physics time from display refresh
//!
//! The host calls [`FramePacer::advance`] from its idle callback with a
//! monotonic clock. Each elapsed refresh interval is one frame's worth of
//! physics; a long stall is caught up only up to a fixed number of frames.

use crate::config::FrameConfig;

/// Turns wall-clock time into a count of due frames
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval_ms: u64,
    max_catch_up: usize,
    last_ms: Option<u64>,
}

impl FramePacer {
    /// Create a pacer from frame settings
    pub fn new(frames: &FrameConfig) -> Self {
        Self {
            interval_ms: frames.refresh_interval_ms().max(1),
            max_catch_up: frames.max_catch_up_frames.max(1),
            last_ms: None,
        }
    }

    /// Length of one frame
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Forget the reference time; the next `advance` starts a new timeline
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Number of frames due at `now_ms`.
    ///
    /// The first call after construction or [`reset`](Self::reset) only
    /// records the time. A backlog longer than the catch-up limit is dropped.
    pub fn advance(&mut self, now_ms: u64) -> usize {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return 0;
        };

        let elapsed = now_ms.saturating_sub(last);
        if elapsed <= self.interval_ms {
            return 0;
        }

        // Strictly more than one interval must pass for each frame
        let due = ((elapsed - 1) / self.interval_ms) as usize;
        if due > self.max_catch_up {
            tracing::warn!(
                due,
                max = self.max_catch_up,
                "physics fell behind, dropping backlog"
            );
            self.last_ms = Some(now_ms);
            return self.max_catch_up;
        }

        self.last_ms = Some(last + due as u64 * self.interval_ms);
        due
    }
}
