//! Performance monitoring
//!
//! Tracks UI frame cadence plus the wall time of the last background
//! rasterization and export, surfaced in the status bar.

use std::collections::VecDeque;
use std::time::Duration;

/// Performance metrics
pub struct PerfMetrics {
    frame_times: VecDeque<Duration>,
    pub fps: f32,
    pub avg_frame_time_ms: f32,
    pub last_raster_ms: u64,
    pub last_export_ms: u64,
}

impl PerfMetrics {
    /// Maximum number of frames to track for averaging
    const MAX_SAMPLES: usize = 60;

    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(Self::MAX_SAMPLES),
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            last_raster_ms: 0,
            last_export_ms: 0,
        }
    }

    /// Record a frame time
    pub fn record_frame(&mut self, duration: Duration) {
        self.frame_times.push_back(duration);
        if self.frame_times.len() > Self::MAX_SAMPLES {
            self.frame_times.pop_front();
        }

        self.update_stats();
    }

    /// Record how long the worker spent rasterizing the last preview
    pub fn record_raster(&mut self, duration: Duration) {
        self.last_raster_ms = duration.as_millis() as u64;
    }

    /// Record how long the last PNG export took end to end
    pub fn record_export(&mut self, duration: Duration) {
        self.last_export_ms = duration.as_millis() as u64;
    }

    fn update_stats(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg = total / self.frame_times.len() as u32;
        self.avg_frame_time_ms = avg.as_secs_f32() * 1000.0;

        if self.avg_frame_time_ms > 0.0 {
            self.fps = 1000.0 / self.avg_frame_time_ms;
        }
    }

    /// Get current FPS as integer
    pub fn fps_int(&self) -> u32 {
        self.fps.round() as u32
    }

    /// Check if performance is degraded (below 30 FPS)
    pub fn is_degraded(&self) -> bool {
        self.fps > 0.0 && self.fps < 30.0
    }
}

impl Default for PerfMetrics {
    fn default() -> Self {
        Self::new()
    }
}
