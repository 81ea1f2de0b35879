//! Frame rate statistics.

use web_time::{Duration, Instant};

/// Length of one measurement window.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// A completed measurement window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frames counted in the window
    pub fps: u32,
    /// Mean time per frame in milliseconds
    pub frame_time_ms: f64,
}

/// Counts frames and produces a [`FrameReport`] once per second.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window_start: Instant,
    frame_count: u32,
    last_report: Option<FrameReport>,
}

impl FrameStats {
    /// Starts the first measurement window at `now`.
    pub fn new(now: Instant) -> Self {
        FrameStats {
            window_start: now,
            frame_count: 0,
            last_report: None,
        }
    }

    /// Records one frame finished at `now`.
    ///
    /// # Returns
    /// A report when at least a second has passed since the window started; the
    /// next window then starts at `now`.
    pub fn update(&mut self, now: Instant) -> Option<FrameReport> {
        self.frame_count += 1;

        if now.saturating_duration_since(self.window_start) < REPORT_INTERVAL {
            return None;
        }

        let report = FrameReport {
            fps: self.frame_count,
            frame_time_ms: 1000.0 / f64::from(self.frame_count),
        };
        self.frame_count = 0;
        self.window_start = now;
        self.last_report = Some(report);
        Some(report)
    }

    /// The most recent report, if a window has completed.
    pub fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }
}
