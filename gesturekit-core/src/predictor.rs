//! Touch Response Predictor
//!
//! ## Overview
//!
//! The predictor consumes the samples of one tracked touch, runs them
//! through the constant-acceleration Kalman filter, and exposes three
//! derived products:
//!
//! 1. **Position predictions** - where the touch will be at a requested
//!    future time, with confidence that decays over the lookahead horizon
//! 2. **Intent recognition** - a deterministic classification cascade over
//!    displacement, duration, speed and angle relative to the touch-start
//!    anchor
//! 3. **Precomputed responses** - a short-TTL cache of speculatively
//!    executed work keyed by intent, so the UI response to a likely gesture
//!    is ready before the gesture completes
//!
//! ## State Machine
//!
//! ```text
//!         begin_touch()            end_touch()
//! Idle ───────────────→ Tracking ─────────────→ Idle
//!   ↑                      │ process_sample()      │
//!   └──────── reset() ─────┴───────────────────────┘
//! ```
//!
//! `begin_touch` resets the sample history and filter state;
//! `end_touch` returns to idle **without** clearing history - samples
//! persist until `reset()` so late consumers can still inspect the
//! trajectory.
//!
//! ## Recognition Cascade
//!
//! A fixed priority order, evaluated against the touch-start anchor:
//!
//! 1. displacement < tap threshold, duration < 200 ms → tap (0.8)
//! 2. displacement < tap threshold, duration ≥ long-press → long press (0.9)
//! 3. speed > swipe threshold → swipe by angle quadrant (≤ 0.95)
//! 4. displacement ≥ tap threshold → pan (0.7)
//! 5. otherwise → unknown (0.5)
//!
//! An intent is only emitted when its confidence clears `min_confidence`.
//! By default a below-threshold pass leaves the *previous* intent in place
//! ("intent stickiness", the historical behavior); set
//! `intent_stickiness = false` to clear instead.
//!
//! ## Speculative Response Cache
//!
//! `precompute_response` is a guarded gate, not an unconditional memoize:
//! the closure runs only while the live intent matches the requested one
//! with sufficient confidence. Reads evict lazily on TTL expiry; every
//! lookup counts as a hit or a miss, including lookups against keys that
//! were never cached.

use crate::buffer::SampleBuffer;
use crate::config::PredictorConfig;
use crate::constants::*;
use crate::events::{GestureIntent, IntentPrediction, Point, PredictedTouch, TouchSample, Vec2};
use crate::filter::{kalman_predict, kalman_update, KalmanState};
use crate::geometry::{angle_deg, distance, window_velocity, Velocity};
use crate::metrics::PredictorMetrics;
use crate::time::Timestamp;
use heapless::FnvIndexMap;

/// Tracking phase of the per-pointer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Tracking,
}

/// Precomputed response entry with its validity window.
#[derive(Debug, Clone)]
struct CacheEntry<R> {
    response: R,
    #[allow(dead_code)] // kept for debugging/snapshot purposes
    computed_at: Timestamp,
    valid_until: Timestamp,
}

/// Kalman-backed touch trajectory predictor with intent recognition.
///
/// `R` is the precomputed response type cached per intent; the default
/// `()` is for consumers that only use prediction/recognition.
///
/// One predictor tracks one pointer. Multi-touch gestures are deliberately
/// modeled through the first touch only - see the bypasser docs for the
/// scale/rotation half.
pub struct TouchPredictor<R = ()> {
    config: PredictorConfig,
    phase: Phase,
    history: SampleBuffer<SAMPLE_HISTORY_CAPACITY>,
    kalman: KalmanState,
    anchor: Option<TouchSample>,
    last_sample: Option<TouchSample>,
    predicted: Option<PredictedTouch>,
    intent: Option<IntentPrediction>,
    last_tap_end: Option<Timestamp>,
    cache: FnvIndexMap<GestureIntent, CacheEntry<R>, RESPONSE_CACHE_CAPACITY>,
    metrics: PredictorMetrics,
}

impl<R> TouchPredictor<R> {
    /// Create a predictor with the given configuration.
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            history: SampleBuffer::new(),
            kalman: KalmanState::default(),
            anchor: None,
            last_sample: None,
            predicted: None,
            intent: None,
            last_tap_end: None,
            cache: FnvIndexMap::new(),
            metrics: PredictorMetrics::default(),
        }
    }

    /// Start tracking a new touch.
    ///
    /// Resets the sample history and re-initializes the filter at the
    /// touch-down position; any stale intent from a previous touch is
    /// dropped.
    pub fn begin_touch(&mut self, sample: TouchSample) {
        self.history.clear();
        self.history.push(sample);
        self.kalman = KalmanState::init(sample.position);
        self.anchor = Some(sample);
        self.last_sample = Some(sample);
        self.predicted = None;
        self.intent = None;
        self.phase = Phase::Tracking;
    }

    /// Process one trajectory sample.
    ///
    /// Appends to the bounded history (oldest evicted), advances the
    /// filter, regenerates the position prediction, and re-runs intent
    /// recognition. Calling without a preceding [`begin_touch`] starts
    /// tracking implicitly from this sample - the predictor operates on a
    /// default state rather than erroring.
    ///
    /// [`begin_touch`]: TouchPredictor::begin_touch
    pub fn process_sample(&mut self, sample: TouchSample) {
        let Some(last) = self.last_sample else {
            self.begin_touch(sample);
            self.metrics.samples_processed += 1;
            return;
        };

        // Score the previous prediction once reality catches up with it
        if let Some(prev) = self.predicted {
            if sample.timestamp >= prev.predicted_time {
                self.metrics
                    .record_error(distance(prev.position, sample.position));
            }
        }

        self.history.push(sample);

        if self.config.enable_kalman_filter {
            let dt_ms = sample.timestamp.saturating_sub(last.timestamp);
            if dt_ms > 0 {
                kalman_predict(
                    &mut self.kalman,
                    dt_ms as f32 / 1000.0,
                    self.config.process_noise,
                );
            }
            kalman_update(&mut self.kalman, sample.position, self.config.measurement_noise);
        } else {
            // Raw passthrough: position from the sample, velocity from the
            // trailing window, no acceleration estimate
            let v = window_velocity(&self.history, self.config.sample_history_size);
            self.kalman.x = sample.position.x;
            self.kalman.y = sample.position.y;
            self.kalman.vx = v.vx;
            self.kalman.vy = v.vy;
            self.kalman.ax = 0.0;
            self.kalman.ay = 0.0;
        }

        self.last_sample = Some(sample);

        // Regenerate the lookahead prediction for the configured horizon
        self.predicted =
            self.prediction_at(sample.timestamp + self.config.prediction_horizon_ms as u64);
        if self.predicted.is_some() {
            self.metrics.predictions_made += 1;
        }

        self.recognize(sample);
        self.metrics.samples_processed += 1;
    }

    /// Stop tracking. History persists until [`reset`](TouchPredictor::reset).
    ///
    /// A tap ending within `intent_window_ms` of a previous tap upgrades to
    /// a double tap here, at the moment the second tap completes.
    pub fn end_touch(&mut self) {
        if self.phase != Phase::Tracking {
            return;
        }
        self.phase = Phase::Idle;

        let Some(end_ts) = self.last_sample.map(|s| s.timestamp) else {
            return;
        };

        if let Some(ip) = self.intent {
            if ip.intent == GestureIntent::Tap {
                if let Some(prev_end) = self.last_tap_end {
                    if end_ts.saturating_sub(prev_end) <= self.config.intent_window_ms as u64 {
                        self.intent = Some(IntentPrediction {
                            intent: GestureIntent::DoubleTap,
                            confidence: DOUBLE_TAP_CONFIDENCE,
                            target_position: ip.target_position,
                            estimated_completion_ms: 0,
                        });
                        self.metrics.intents_recognized += 1;
                        // Pair consumed; a third tap starts a fresh window
                        self.last_tap_end = None;
                        return;
                    }
                }
                self.last_tap_end = Some(end_ts);
            }
        }
    }

    /// Clear all tracking state, history, intent and cached responses.
    /// Metrics survive; use [`reset_metrics`](TouchPredictor::reset_metrics)
    /// for those.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.history.clear();
        self.kalman = KalmanState::default();
        self.anchor = None;
        self.last_sample = None;
        self.predicted = None;
        self.intent = None;
        self.last_tap_end = None;
        self.cache.clear();
    }

    /// Predict the touch position at an absolute future time.
    ///
    /// Returns `None` when no samples exist or when `time_ms` precedes the
    /// last observed sample - the filter cannot predict into the past
    /// relative to its last observation.
    ///
    /// Confidence derives from the filter's position variance and decays
    /// linearly with the lookahead distance, floored at
    /// [`CONFIDENCE_FLOOR`].
    pub fn prediction_at(&self, time_ms: Timestamp) -> Option<PredictedTouch> {
        let last = self.last_sample?;
        if self.history.is_empty() || time_ms < last.timestamp {
            return None;
        }

        let mut state = self.kalman.clone();
        let dt_ms = time_ms - last.timestamp;
        if dt_ms > 0 {
            kalman_predict(&mut state, dt_ms as f32 / 1000.0, self.config.process_noise);
        }

        let base = 1.0 / (1.0 + state.position_variance());
        let confidence =
            (base - CONFIDENCE_DECAY_PER_MS * dt_ms as f32).max(CONFIDENCE_FLOOR);

        Some(PredictedTouch {
            position: state.position(),
            velocity: Velocity::from_components(state.vx, state.vy),
            acceleration: Vec2::new(state.ax, state.ay),
            confidence,
            predicted_time: time_ms,
        })
    }

    /// The prediction generated by the most recent sample, if any.
    pub fn last_prediction(&self) -> Option<&PredictedTouch> {
        self.predicted.as_ref()
    }

    /// The live intent prediction, if one has cleared the threshold.
    pub fn intent(&self) -> Option<&IntentPrediction> {
        self.intent.as_ref()
    }

    /// Whether a touch is currently being tracked.
    pub fn is_tracking(&self) -> bool {
        self.phase == Phase::Tracking
    }

    /// Recorded sample history (persists across `end_touch`).
    pub fn history(&self) -> &SampleBuffer<SAMPLE_HISTORY_CAPACITY> {
        &self.history
    }

    /// Metrics snapshot.
    pub fn metrics(&self) -> &PredictorMetrics {
        &self.metrics
    }

    /// Reset counters and the error window.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Active configuration.
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Speculatively execute and cache a response for `intent`.
    ///
    /// The closure runs only when the *live* intent prediction matches
    /// `intent` and clears `min_confidence` - a guarded speculative
    /// execution gate, not a memoize. Returns whether the response was
    /// computed and cached.
    pub fn precompute_response<F>(&mut self, intent: GestureIntent, now: Timestamp, compute: F) -> bool
    where
        F: FnOnce() -> R,
    {
        let live_matches = self
            .intent
            .map(|ip| ip.intent == intent && ip.confidence >= self.config.min_confidence)
            .unwrap_or(false);
        if !live_matches {
            return false;
        }

        let entry = CacheEntry {
            response: compute(),
            computed_at: now,
            valid_until: now + self.config.response_cache_ttl_ms as u64,
        };
        let _ = self.cache.insert(intent, entry);
        true
    }

    /// Look up a cached response, evicting it first if its TTL elapsed.
    ///
    /// Every call increments either `cache_hits` or `cache_misses` -
    /// including lookups against intents that were never cached.
    pub fn cached_response(&mut self, intent: GestureIntent, now: Timestamp) -> Option<&R> {
        let expired = self
            .cache
            .get(&intent)
            .map(|e| now >= e.valid_until)
            .unwrap_or(false);
        if expired {
            self.cache.remove(&intent);
        }

        match self.cache.get(&intent) {
            Some(entry) => {
                self.metrics.cache_hits += 1;
                Some(&entry.response)
            }
            None => {
                self.metrics.cache_misses += 1;
                None
            }
        }
    }

    /// Run the recognition cascade and apply the emission policy.
    fn recognize(&mut self, sample: TouchSample) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let candidate = classify(&self.config, &anchor, &sample);
        if candidate.confidence >= self.config.min_confidence {
            self.intent = Some(candidate);
            self.metrics.intents_recognized += 1;
        } else if !self.config.intent_stickiness {
            self.intent = None;
        }
        // Stickiness: a low-confidence pass leaves the previous intent alone
    }
}

/// The deterministic recognition cascade, pure over the anchor-relative
/// trajectory summary.
fn classify(
    config: &PredictorConfig,
    anchor: &TouchSample,
    current: &TouchSample,
) -> IntentPrediction {
    let dist = distance(anchor.position, current.position);
    let duration_ms = current.timestamp.saturating_sub(anchor.timestamp);
    let speed = if duration_ms > 0 {
        dist / (duration_ms as f32 / 1000.0)
    } else {
        0.0
    };
    let angle = angle_deg(anchor.position, current.position);

    // 1. Tap: stationary and brief
    if dist < config.tap_threshold_px && duration_ms < TAP_MAX_DURATION_MS as u64 {
        return IntentPrediction {
            intent: GestureIntent::Tap,
            confidence: TAP_CONFIDENCE,
            target_position: Some(anchor.position),
            estimated_completion_ms: TAP_MAX_DURATION_MS
                .saturating_sub(duration_ms as u32),
        };
    }

    // 2. Long press: stationary past the hold threshold
    if dist < config.tap_threshold_px && duration_ms >= config.long_press_threshold_ms as u64 {
        return IntentPrediction {
            intent: GestureIntent::LongPress,
            confidence: LONG_PRESS_CONFIDENCE,
            target_position: Some(anchor.position),
            estimated_completion_ms: 0,
        };
    }

    // 3. Swipe: fast displacement, direction by angle quadrant
    if speed > config.swipe_velocity_threshold {
        let abs_angle = libm::fabsf(angle);
        let intent = if abs_angle < 45.0 {
            GestureIntent::SwipeRight
        } else if abs_angle > 135.0 {
            GestureIntent::SwipeLeft
        } else if angle < 0.0 {
            // Negative y is up in surface coordinates
            GestureIntent::SwipeUp
        } else {
            GestureIntent::SwipeDown
        };

        let confidence = libm::fminf(
            SWIPE_CONFIDENCE_CAP,
            SWIPE_CONFIDENCE_BASE + speed / SWIPE_CONFIDENCE_SPEED_SCALE,
        );

        // Project the anchor-relative velocity out to the nominal
        // completion time
        let duration_s = duration_ms as f32 / 1000.0;
        let remaining_s = SWIPE_COMPLETION_MS as f32 / 1000.0;
        let vx = (current.position.x - anchor.position.x) / duration_s;
        let vy = (current.position.y - anchor.position.y) / duration_s;
        let target = Point::new(
            current.position.x + vx * remaining_s,
            current.position.y + vy * remaining_s,
        );

        return IntentPrediction {
            intent,
            confidence,
            target_position: Some(target),
            estimated_completion_ms: SWIPE_COMPLETION_MS,
        };
    }

    // 4. Pan: sustained displacement below swipe speed, open-ended
    if dist >= config.tap_threshold_px {
        return IntentPrediction {
            intent: GestureIntent::Pan,
            confidence: PAN_CONFIDENCE,
            target_position: None,
            estimated_completion_ms: 0,
        };
    }

    // 5. Nothing cleared the cascade
    IntentPrediction {
        intent: GestureIntent::Unknown,
        confidence: UNKNOWN_CONFIDENCE,
        target_position: None,
        estimated_completion_ms: 0,
    }
}
