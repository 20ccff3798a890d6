//! Frame-rate estimator.
//!
//! Counts frame callbacks in consecutive windows of `window_ms` and reports
//! the count of the last completed window, scaled to frames per second.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMonitor {
    window_ms: f64,
    running: bool,
    window_start: f64,
    frames_in_window: u32,
    fps: Option<u32>,
}

impl PerformanceMonitor {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: if window_ms > 0.0 { window_ms } else { 1000.0 },
            running: false,
            window_start: 0.0,
            frames_in_window: 0,
            fps: None,
        }
    }

    pub fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.window_start = now;
        self.frames_in_window = 0;
    }

    /// Stop sampling. The last estimate stays readable.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Latest completed-window estimate.
    #[inline]
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Count one frame callback. Returns a fresh estimate when a window closes.
    pub fn frame(&mut self, now: f64) -> Option<u32> {
        if !self.running {
            return None;
        }
        let elapsed = now - self.window_start;
        if elapsed >= self.window_ms {
            let fps = (self.frames_in_window as f64 * 1000.0 / elapsed).round() as u32;
            self.fps = Some(fps);
            self.window_start = now;
            self.frames_in_window = 1;
            log::trace!("frame rate estimate {fps} fps");
            return Some(fps);
        }
        self.frames_in_window += 1;
        None
    }

    /// True when an estimate exists and is below `threshold`.
    pub fn below(&self, threshold: f32) -> bool {
        self.fps.is_some_and(|fps| (fps as f32) < threshold)
    }
}
