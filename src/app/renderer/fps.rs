//! Frame timing
//!
//! The label shows the rate of the last frame; the rolling average goes into
//! the render statistics logged at shutdown.

use std::collections::VecDeque;
use std::time::Instant;

/// Number of frame times averaged for the displayed FPS
const WINDOW: usize = 100;

/// Rolling frame-rate estimate over the last frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
    last_delta: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(WINDOW),
            last_frame_time: Instant::now(),
            last_delta: 0.0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures the time since the previous call and records it
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        self.record(delta);
        delta
    }

    /// Records one frame duration in seconds
    pub fn record(&mut self, delta: f32) {
        self.last_delta = delta;
        if self.frame_times.len() == WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
    }

    /// Average FPS over the recorded window
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg_frame_time: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// FPS derived from the last frame alone
    pub fn instant_fps(&self) -> f32 {
        if self.last_delta > 0.0 {
            1.0 / self.last_delta
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_counter_reports_zero() {
        let counter = FpsCounter::new();
        assert_eq!(counter.fps(), 0.0);
        assert_eq!(counter.instant_fps(), 0.0);
    }

    #[test]
    fn test_average_over_window() {
        let mut counter = FpsCounter::new();
        counter.record(0.01);
        counter.record(0.03);
        assert!((counter.fps() - 50.0).abs() < 1e-3);
        assert!((counter.instant_fps() - 33.333).abs() < 1e-2);
    }

    #[test]
    fn test_window_drops_oldest() {
        let mut counter = FpsCounter::new();
        counter.record(1.0);
        for _ in 0..WINDOW {
            counter.record(0.02);
        }
        assert_eq!(counter.frame_times.len(), WINDOW);
        assert!((counter.fps() - 50.0).abs() < 1e-2);
    }

    #[test]
    fn test_instant_fps_follows_last_frame_only() {
        let mut counter = FpsCounter::new();
        for _ in 0..10 {
            counter.record(0.01);
        }
        counter.record(0.5);
        assert!((counter.instant_fps() - 2.0).abs() < 1e-4);
        assert!(counter.fps() > 2.0);
    }
}
