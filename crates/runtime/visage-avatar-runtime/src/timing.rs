//! Achieved-rate bookkeeping for the animator loop.

use log::debug;

/// Milliseconds between periodic rate reports.
const REPORT_INTERVAL_MS: f32 = 3000.0;

/// Exponentially smoothed tick rate plus a periodic debug report.
#[derive(Clone, Debug)]
pub struct TickStats {
    smoothed_hz: f32,
    /// Share of each new sample in the average.
    smoothing: f32,
    report_elapsed_ms: f32,
    report_ticks: u32,
}

impl TickStats {
    /// Seeds the average at the target rate so the first few samples do
    /// not read as a ramp from zero.
    pub fn new(target_hz: f32) -> Self {
        Self {
            smoothed_hz: target_hz,
            smoothing: 0.05,
            report_elapsed_ms: 0.0,
            report_ticks: 0,
        }
    }

    pub fn smoothed_hz(&self) -> f32 {
        self.smoothed_hz
    }

    /// Records one completed tick that took `dt_ms` of wall time.
    pub fn record(&mut self, dt_ms: f32) {
        if dt_ms > 0.0 {
            let instant_hz = 1000.0 / dt_ms;
            self.smoothed_hz =
                self.smoothed_hz * (1.0 - self.smoothing) + instant_hz * self.smoothing;
        }
        self.report_elapsed_ms += dt_ms;
        self.report_ticks += 1;
        if self.report_elapsed_ms >= REPORT_INTERVAL_MS {
            let window_hz = self.report_ticks as f32 * 1000.0 / self.report_elapsed_ms;
            debug!(
                "animator: {window_hz:.1} ticks/s over the last {:.1} s (smoothed {:.1})",
                self.report_elapsed_ms / 1000.0,
                self.smoothed_hz
            );
            self.report_elapsed_ms = 0.0;
            self.report_ticks = 0;
        }
    }
}
