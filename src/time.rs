//! Frame clock.
//!
//! The scene is driven by a single monotonic clock that is sampled once per
//! displayed frame. Every animated transform is a pure function of
//! [`Time::elapsed`], so nothing else about time needs to be stored.
//!
//! # Example
//!
//! ```ignore
//! use immersive::time::Time;
//!
//! let mut time = Time::starting_at(Instant::now());
//!
//! // In the redraw handler:
//! let elapsed = time.update_at(Instant::now());
//! scene.update(elapsed);
//! ```

use std::time::{Duration, Instant};

/// Monotonic clock for the render loop.
///
/// Tracks elapsed seconds since the clock was created plus a few frame
/// statistics used for logging.
#[derive(Debug, Clone)]
pub struct Time {
    /// When the clock started (scene mount).
    start: Instant,
    /// Instant of the previous `update`.
    last_frame: Instant,
    /// Seconds since `start` as of the last `update`.
    elapsed_secs: f32,
    /// Seconds between the last two updates.
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    /// Start a clock at an explicit instant.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Sample the clock at `now`. Call once per frame.
    ///
    /// Returns the elapsed time in seconds.
    /// Instants earlier than the previous sample are clamped so elapsed time
    /// never runs backwards.
    pub fn update_at(&mut self, now: Instant) -> f32 {
        let now = now.max(self.last_frame);

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }

    /// Total elapsed time in seconds as of the last update.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time between the last two updates, in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Number of updates since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, recomputed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clock_is_at_zero() {
        let time = Time::starting_at(Instant::now());
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
    }

    #[test]
    fn test_update_at_reports_elapsed() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);

        let elapsed = time.update_at(start + Duration::from_millis(1500));
        assert!((elapsed - 1.5).abs() < 1e-4);
        assert!((time.delta() - 1.5).abs() < 1e-4);
        assert_eq!(time.frame(), 1);

        time.update_at(start + Duration::from_millis(1600));
        assert!((time.delta() - 0.1).abs() < 1e-4);
        assert_eq!(time.frame(), 2);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        time.update_at(start + Duration::from_secs(2));

        // A stale instant must not move the clock backwards
        let elapsed = time.update_at(start + Duration::from_secs(1));
        assert!((elapsed - 2.0).abs() < 1e-4);
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn test_fps_updates_after_interval() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        for i in 1..=30 {
            time.update_at(start + Duration::from_millis(i * 1000 / 60));
        }
        assert!(time.fps() > 50.0 && time.fps() < 70.0);
    }
}
