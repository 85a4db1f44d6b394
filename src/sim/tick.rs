//! Frame driver: wall-clock timestamps in, bounded simulation steps out
//!
//! The scheduling collaborator (an event loop, a test harness) calls
//! [`FrameDriver::frame`] once per rendered frame with a monotonically
//! increasing timestamp and the current input snapshot. A `false` return is
//! the stop signal: the level reached a terminal status and the caller is
//! responsible for constructing a replacement.

use serde::{Deserialize, Serialize};

use super::level::{Level, Status};
use crate::consts::MAX_FRAME_MS;

/// Per-frame snapshot of player input, sourced from held-key state.
/// The simulation reads no global input state; this value is all it sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

/// Advance the level by one already-clamped timestep. Returns whether the
/// caller should keep scheduling frames.
pub fn step(level: &mut Level, intent: &Intent, dt: f64) -> bool {
    level.advance(dt, intent);
    level.status() == Status::InProgress
}

/// Turns a timestamp stream into bounded simulation steps
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDriver {
    last_time_ms: Option<f64>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame at the given timestamp (milliseconds).
    ///
    /// The first call only records a baseline. The elapsed time between
    /// calls is clamped to [`MAX_FRAME_MS`] before conversion to seconds, so
    /// a single long stall cannot produce a step large enough to tunnel an
    /// actor through a wall.
    pub fn frame(&mut self, level: &mut Level, time_ms: f64, intent: &Intent) -> bool {
        let dt = match self.last_time_ms {
            Some(last) => (time_ms - last).clamp(0.0, MAX_FRAME_MS) / 1000.0,
            None => 0.0,
        };
        self.last_time_ms = Some(time_ms);
        step(level, intent, dt)
    }
}
