//! Frame-rate sampling for the in-world HUD.
//!
//! Frames are counted every update; the displayed rate is only recomputed once the refresh
//! interval has passed, as frames counted divided by the seconds elapsed since the previous
//! refresh. There is no smoothing between samples.

use web_time::{Duration, Instant};

/// Counts frames and samples the frame rate at a fixed interval.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    last_refresh: Instant,
    interval: Duration,
    fps: f64,
}

impl FpsCounter {
    /// Creates a counter whose first sample is taken `interval` after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            frames: 0,
            last_refresh: now,
            interval,
            fps: 0.0,
        }
    }

    /// Records one frame.
    pub fn count_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// Takes a new sample if the refresh interval has passed since the last one.
    ///
    /// # Arguments
    /// * `now` - Current time
    ///
    /// # Returns
    /// The new frame rate if a sample was taken, `None` if the displayed rate is unchanged
    pub fn refresh(&mut self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.last_refresh);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }

        self.fps = self.frames as f64 / elapsed.as_secs_f64();
        self.frames = 0;
        self.last_refresh = now;
        Some(self.fps)
    }

    /// The most recently sampled frame rate; `0.0` before the first sample.
    pub fn displayed_fps(&self) -> f64 {
        self.fps
    }

    /// Frames counted since the last sample.
    pub fn frames_since_refresh(&self) -> u32 {
        self.frames
    }

    /// Time of the last sample, or of construction if none was taken yet.
    pub fn last_refresh(&self) -> Instant {
        self.last_refresh
    }

    /// Minimum time between two samples.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
