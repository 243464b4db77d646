//! Frame timing.
//!
//! A [`FrameClock`] produces one [`FrameTime`] per frame. It runs in one of
//! two modes:
//!
//! - **fixed**: every frame advances by the same `dt`. Elapsed time is
//!   computed as `frame_index * dt` rather than accumulated, so it carries no
//!   drift. Headless runs and tests use this mode.
//! - **wall**: `dt` is measured with [`Instant`] and clamped to `max_dt`, so
//!   a debugger pause or a stalled window does not hand components a huge
//!   step.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Timing snapshot for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Zero-based index of this frame.
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum ClockMode {
    Fixed { dt: f64 },
    Wall { last: Option<Instant>, max_dt: Duration },
}

/// Produces [`FrameTime`] snapshots.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    frames: u64,
    elapsed: f64,
}

impl FrameClock {
    /// A clock that advances by exactly `dt` seconds per tick.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not positive and finite.
    pub fn fixed(dt: f64) -> Self {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "fixed dt must be positive and finite, got {dt}"
        );
        Self {
            mode: ClockMode::Fixed { dt },
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// A wall-clock timer whose per-frame delta is clamped to `max_dt`.
    ///
    /// The first tick reports `dt == 0`.
    pub fn wall(max_dt: Duration) -> Self {
        Self {
            mode: ClockMode::Wall { last: None, max_dt },
            frames: 0,
            elapsed: 0.0,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.mode, ClockMode::Fixed { .. })
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTime {
        let frame_index = self.frames;
        let dt = match &mut self.mode {
            ClockMode::Fixed { dt } => {
                self.elapsed = (frame_index + 1) as f64 * *dt;
                *dt
            }
            ClockMode::Wall { last, max_dt } => {
                let now = Instant::now();
                let step = last
                    .map(|prev| now.saturating_duration_since(prev).min(*max_dt))
                    .unwrap_or_default();
                *last = Some(now);
                self.elapsed += step.as_secs_f64();
                step.as_secs_f64()
            }
        };
        self.frames += 1;
        FrameTime {
            dt: dt as f32,
            elapsed: self.elapsed,
            frame_index,
        }
    }

    /// Restart timing from zero.
    pub fn reset(&mut self) {
        self.frames = 0;
        self.elapsed = 0.0;
        if let ClockMode::Wall { last, .. } = &mut self.mode {
            *last = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
