//! Rolling frame-rate estimation and device performance classification.
//!
//! The monitor is fed once per rendered frame. It keeps the instantaneous
//! rates of the last `window_size` frames and classifies the device from their
//! mean.

use log::debug;
use std::collections::VecDeque;
use std::time::Instant;

/// Snapshot returned by every [`FpsMonitor::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsReport {
    /// Rate implied by the time since the previous update
    pub fps: f64,
    /// Mean over the sample window
    pub avg_fps: f64,
    /// Average is below the low-performance threshold
    pub is_low_performance: bool,
    /// Average is below the warning threshold
    pub show_warning: bool,
    /// Number of updates since the last reset
    pub frame_count: u64,
}

/// Verdict on whether the device can run the challenge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Compatibility {
    /// Not enough samples collected yet
    Measuring {
        /// Samples so far
        samples: usize,
        /// Samples needed
        required: usize,
    },
    /// Frame rate is high enough
    Compatible {
        /// Average frame rate
        avg_fps: f64,
    },
    /// Frame rate is too low
    Incompatible {
        /// Average frame rate
        avg_fps: f64,
    },
}

impl Compatibility {
    /// True only for a positive verdict
    #[must_use]
    pub const fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible { .. })
    }
}

/// Frame rate monitor
pub struct FpsMonitor {
    window_size: usize,
    low_performance_fps: f64,
    warning_fps: f64,
    min_samples: usize,
    origin: Instant,
    last_ms: f64,
    samples: VecDeque<f64>,
    frame_count: u64,
    last_report: Option<FpsReport>,
}

impl FpsMonitor {
    /// Create a monitor whose timing baseline is "now"
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero or the thresholds are not positive
    #[must_use]
    pub fn new(window_size: usize, low_performance_fps: f64, warning_fps: f64) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(
            low_performance_fps > 0.0 && warning_fps > 0.0,
            "FPS thresholds must be positive"
        );
        Self {
            window_size,
            low_performance_fps,
            warning_fps,
            min_samples: window_size,
            origin: Instant::now(),
            last_ms: 0.0,
            samples: VecDeque::with_capacity(window_size + 1),
            frame_count: 0,
            last_report: None,
        }
    }

    /// Require `min_samples` updates before [`compatibility`](Self::compatibility) gives a verdict
    #[must_use]
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples.max(1);
        self
    }

    /// Use `now_ms` on the caller's clock as the timing baseline
    #[must_use]
    pub fn starting_at(mut self, now_ms: f64) -> Self {
        self.last_ms = now_ms;
        self
    }

    /// Record a rendered frame at the current wall-clock time
    pub fn update(&mut self) -> FpsReport {
        let now_ms = self.origin.elapsed().as_secs_f64() * 1000.0;
        self.update_at(now_ms)
    }

    /// Record a rendered frame at `now_ms` on the caller's clock
    pub fn update_at(&mut self, now_ms: f64) -> FpsReport {
        let delta = now_ms - self.last_ms;
        if delta.is_nan() || delta <= 0.0 {
            // Two frames on the same timestamp carry no rate information
            return self.last_report.unwrap_or_else(|| self.report(0.0));
        }
        self.last_ms = now_ms;
        self.frame_count += 1;

        let fps = 1000.0 / delta;
        self.samples.push_back(fps);
        if self.samples.len() > self.window_size {
            self.samples.pop_front();
        }

        let report = self.report(fps);
        if report.show_warning && self.samples.len() == self.window_size {
            debug!("Frame rate is low: {:.1} fps average", report.avg_fps);
        }
        self.last_report = Some(report);
        report
    }

    /// Mean over the current window, zero when empty
    #[must_use]
    pub fn average_fps(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Classify the device from the samples collected so far
    #[must_use]
    pub fn compatibility(&self) -> Compatibility {
        let samples = self.samples.len();
        if (self.frame_count as usize) < self.min_samples {
            return Compatibility::Measuring {
                samples,
                required: self.min_samples,
            };
        }
        let avg_fps = self.average_fps();
        if avg_fps < self.low_performance_fps {
            Compatibility::Incompatible { avg_fps }
        } else {
            Compatibility::Compatible { avg_fps }
        }
    }

    /// Clear history and restart timing from the current wall-clock time
    pub fn reset(&mut self) {
        self.origin = Instant::now();
        self.reset_at(0.0);
    }

    /// Clear history and restart timing from `now_ms` on the caller's clock
    pub fn reset_at(&mut self, now_ms: f64) {
        self.samples.clear();
        self.frame_count = 0;
        self.last_ms = now_ms;
        self.last_report = None;
    }

    fn report(&self, fps: f64) -> FpsReport {
        let avg_fps = self.average_fps();
        FpsReport {
            fps,
            avg_fps,
            is_low_performance: avg_fps < self.low_performance_fps,
            show_warning: avg_fps < self.warning_fps,
            frame_count: self.frame_count,
        }
    }
}

impl Default for FpsMonitor {
    fn default() -> Self {
        use crate::constants::{DEFAULT_FPS_WINDOW, DEFAULT_LOW_PERFORMANCE_FPS, DEFAULT_WARNING_FPS};
        Self::new(DEFAULT_FPS_WINDOW, DEFAULT_LOW_PERFORMANCE_FPS, DEFAULT_WARNING_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_uses_construction_baseline() {
        let mut monitor = FpsMonitor::default().starting_at(1000.0);
        let report = monitor.update_at(1050.0);
        assert!((report.fps - 20.0).abs() < 1e-9);
        assert_eq!(report.frame_count, 1);
    }

    #[test]
    fn test_average_converges() {
        let mut monitor = FpsMonitor::default().starting_at(0.0);
        let mut report = None;
        for i in 1..=30 {
            report = Some(monitor.update_at(f64::from(i) * 30.0));
        }
        let report = report.unwrap();
        assert!((report.avg_fps - 33.3).abs() < 1.0);
        assert!(!report.is_low_performance);
        assert!(!report.show_warning);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut monitor = FpsMonitor::new(3, 15.0, 20.0).starting_at(0.0);
        // One slow frame followed by fast ones
        monitor.update_at(1000.0);
        monitor.update_at(1010.0);
        monitor.update_at(1020.0);
        let before = monitor.average_fps();
        monitor.update_at(1030.0);
        let after = monitor.average_fps();

        assert!(before < 100.0);
        assert!((after - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_thresholds() {
        let mut monitor = FpsMonitor::new(5, 15.0, 20.0).starting_at(0.0);
        let mut t = 0.0;
        let mut report = None;
        for _ in 0..5 {
            t += 1000.0 / 18.0;
            report = Some(monitor.update_at(t));
        }
        let report = report.unwrap();
        assert!(report.show_warning);
        assert!(!report.is_low_performance);

        for _ in 0..5 {
            t += 100.0;
            monitor.update_at(t);
        }
        assert!(matches!(monitor.compatibility(), Compatibility::Incompatible { .. }));
    }

    #[test]
    fn test_compatibility_waits_for_samples() {
        let mut monitor = FpsMonitor::new(10, 15.0, 20.0).starting_at(0.0);
        monitor.update_at(16.0);
        assert_eq!(
            monitor.compatibility(),
            Compatibility::Measuring { samples: 1, required: 10 }
        );
        for i in 2..=10 {
            monitor.update_at(f64::from(i) * 16.0);
        }
        assert!(monitor.compatibility().is_compatible());
    }

    #[test]
    fn test_compatibility_is_a_pure_query() {
        let mut monitor = FpsMonitor::new(5, 15.0, 20.0).starting_at(0.0);
        for i in 1..=5 {
            monitor.update_at(f64::from(i) * 100.0);
        }
        let first = monitor.compatibility();
        for _ in 0..100 {
            assert_eq!(monitor.compatibility(), first);
        }
        assert!(matches!(first, Compatibility::Incompatible { .. }));
        assert_eq!(monitor.update_at(600.0).frame_count, 6);
    }

    #[test]
    fn test_duplicate_timestamp_is_ignored() {
        let mut monitor = FpsMonitor::default().starting_at(0.0);
        let first = monitor.update_at(20.0);
        let again = monitor.update_at(20.0);
        assert_eq!(first, again);
        assert_eq!(monitor.update_at(40.0).frame_count, 2);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut monitor = FpsMonitor::default().starting_at(0.0);
        for i in 1..=10 {
            monitor.update_at(f64::from(i) * 50.0);
        }
        monitor.reset_at(5000.0);
        assert_eq!(monitor.average_fps(), 0.0);
        let report = monitor.update_at(5025.0);
        assert_eq!(report.frame_count, 1);
        assert!((report.avg_fps - 40.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "Window size must be greater than 0")]
    fn test_zero_window() {
        let _ = FpsMonitor::new(0, 15.0, 20.0);
    }
}
