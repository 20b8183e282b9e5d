//! Engine Metrics: Monotonic Counters and Rolling Averages
//!
//! ## Overview
//!
//! Both halves of the engine expose lightweight observability: monotonic
//! counters for discrete happenings (gestures processed, cache hits) and
//! rolling averages over bounded sample windows for continuous quantities
//! (bypass latency, prediction error).
//!
//! ## Consistency Model
//!
//! Metrics are eventually consistent with the touch pipeline: they are
//! updated synchronously but consumers read snapshots whenever convenient -
//! nothing about the bypass path waits on a metrics read. Counters reset
//! only through the explicit `reset()` calls, never implicitly.
//!
//! The rolling windows are capped at [`METRICS_WINDOW`] samples; older
//! samples fall out of the average as new ones arrive. The window maintains
//! a running sum incrementally, so recording a sample is O(1).

use crate::constants::METRICS_WINDOW;

/// Bounded ring of `f32` samples with an O(1) running average.
#[derive(Debug, Clone)]
pub struct RollingWindow<const N: usize> {
    samples: [f32; N],
    write_pos: usize,
    len: usize,
    sum: f32,
}

impl<const N: usize> RollingWindow<N> {
    /// Empty window.
    pub const fn new() -> Self {
        Self {
            samples: [0.0; N],
            write_pos: 0,
            len: 0,
            sum: 0.0,
        }
    }

    /// Record a sample, dropping the oldest when the window is full.
    pub fn record(&mut self, value: f32) {
        if self.len == N {
            self.sum -= self.samples[self.write_pos];
        } else {
            self.len += 1;
        }
        self.samples[self.write_pos] = value;
        self.sum += value;
        self.write_pos = (self.write_pos + 1) % N;
    }

    /// Number of samples currently in the window (capped at `N`).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Average over the window; 0.0 when empty.
    pub fn average(&self) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        self.sum / self.len as f32
    }

    /// Discard all samples.
    pub fn reset(&mut self) {
        self.write_pos = 0;
        self.len = 0;
        self.sum = 0.0;
    }
}

impl<const N: usize> Default for RollingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics maintained by the gesture latency bypasser.
#[derive(Debug, Clone, Default)]
pub struct BypassMetrics {
    /// Completed gestures (all touches lifted)
    pub gestures_processed: u32,
    /// Style updates applied through the direct callback
    pub bypassed_updates: u32,
    /// Momentum animation frames executed
    pub momentum_frames: u32,
    /// Momentum settles resolved into a snap point
    pub snaps_triggered: u32,
    /// Touch-moves dropped by the no-active-gesture guard
    pub moves_ignored: u32,
    latency: RollingWindow<METRICS_WINDOW>,
}

impl BypassMetrics {
    /// Record one measured style-callback latency in milliseconds.
    pub fn record_latency(&mut self, latency_ms: f32) {
        self.latency.record(latency_ms);
    }

    /// Moving average of recent style-callback latencies, ms.
    pub fn average_latency_ms(&self) -> f32 {
        self.latency.average()
    }

    /// Number of latency samples currently in the window.
    pub fn latency_samples(&self) -> usize {
        self.latency.len()
    }

    /// Reset all counters and the latency window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics maintained by the touch response predictor.
#[derive(Debug, Clone, Default)]
pub struct PredictorMetrics {
    /// Samples fed through the filter
    pub samples_processed: u32,
    /// Position predictions generated
    pub predictions_made: u32,
    /// Intents recognized above the confidence threshold
    pub intents_recognized: u32,
    /// Response cache lookups that found a live entry
    pub cache_hits: u32,
    /// Response cache lookups that missed (including never-cached keys)
    pub cache_misses: u32,
    error_px: RollingWindow<METRICS_WINDOW>,
}

impl PredictorMetrics {
    /// Record the observed error of a past prediction, in pixels.
    pub fn record_error(&mut self, error_px: f32) {
        self.error_px.record(error_px);
    }

    /// Moving average of recent prediction errors, px.
    pub fn average_error_px(&self) -> f32 {
        self.error_px.average()
    }

    /// Reset all counters and the error window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_average_incremental() {
        let mut w = RollingWindow::<4>::new();
        assert_eq!(w.average(), 0.0);

        w.record(2.0);
        w.record(4.0);
        assert_eq!(w.average(), 3.0);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn window_caps_and_evicts() {
        let mut w = RollingWindow::<3>::new();
        for v in [1.0, 2.0, 3.0, 10.0] {
            w.record(v);
        }
        // 1.0 evicted: average of [2, 3, 10]
        assert_eq!(w.len(), 3);
        assert!((w.average() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn latency_window_capped_at_metrics_window() {
        let mut m = BypassMetrics::default();
        for _ in 0..120 {
            m.bypassed_updates += 1;
            m.record_latency(1.0);
        }
        assert_eq!(m.bypassed_updates, 120);
        assert_eq!(m.latency_samples(), METRICS_WINDOW);
    }

    #[test]
    fn reset_clears_everything() {
        let mut m = PredictorMetrics::default();
        m.samples_processed = 7;
        m.cache_misses = 3;
        m.record_error(12.0);

        m.reset();
        assert_eq!(m.samples_processed, 0);
        assert_eq!(m.cache_misses, 0);
        assert_eq!(m.average_error_px(), 0.0);
    }
}
