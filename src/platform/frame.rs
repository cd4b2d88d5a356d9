//! Wall-clock to simulated time

use crate::consts::{FALLBACK_FRAME_MS, MAX_FRAME_MS, NOMINAL_FRAME_MS};
use crate::sim::TickInput;

/// Simulated timing for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Clamped wall frame time in milliseconds
    pub frame_time: f32,
    /// Simulated milliseconds, time dilation included
    pub sim_time: f32,
    /// Nominal frames elapsed, time dilation included
    pub sim_speed: f32,
    /// Wall frame time relative to a nominal 60 Hz frame
    pub lag: f32,
}

impl FrameTiming {
    /// Pair the timing with a view size to feed `tick`
    pub fn tick_input(&self, view_width: f32, view_height: f32) -> TickInput {
        TickInput {
            view_width,
            view_height,
            sim_time: self.sim_time,
            sim_speed: self.sim_speed,
            lag: self.lag,
        }
    }
}

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Report a frame at `timestamp_ms`.
    ///
    /// Returns `None` for the very first frame and while paused. Paused frames
    /// still record their timestamp, so resuming picks up without a backlog.
    pub fn frame(&mut self, timestamp_ms: f64, game_speed: f32, paused: bool) -> Option<FrameTiming> {
        let previous = self.last_timestamp.replace(timestamp_ms);
        if paused {
            return None;
        }
        let elapsed = (timestamp_ms - previous?) as f32;

        let frame_time = if elapsed < 0.0 {
            FALLBACK_FRAME_MS
        } else {
            elapsed.min(MAX_FRAME_MS)
        };
        let lag = frame_time / NOMINAL_FRAME_MS;
        Some(FrameTiming {
            frame_time,
            sim_time: game_speed * frame_time,
            sim_speed: game_speed * lag,
            lag,
        })
    }
}
