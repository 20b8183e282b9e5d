//! Configuration Surfaces for the Predictor and the Bypasser
//!
//! Each config is a `Default` carrying the documented defaults from
//! [`constants`](crate::constants), chainable `with_*` builders, and an
//! explicit `validate()` that rejects degenerate values (friction outside
//! (0, 1), zero horizons) before they can destabilize the physics.
//!
//! Validation is opt-in at construction sites rather than baked into the
//! builders, mirroring the rule that nothing on the touch path itself
//! errors.

use crate::constants::*;
use crate::errors::{GestureError, GestureResult};
use crate::events::GestureMask;
use crate::snap::SnapPoint;
use heapless::Vec;

/// Configuration for [`TouchPredictor`](crate::predictor::TouchPredictor).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictorConfig {
    /// Default lookahead horizon for generated predictions, ms
    pub prediction_horizon_ms: u32,
    /// Minimum confidence for an intent to be emitted
    pub min_confidence: f32,
    /// Effective sample history window (capped by the buffer capacity)
    pub sample_history_size: usize,
    /// Run the Kalman filter; when false, raw samples drive the state
    pub enable_kalman_filter: bool,
    /// Isotropic process noise injected per predict step
    pub process_noise: f32,
    /// Measurement noise variance for touch positions
    pub measurement_noise: f32,
    /// Window within which two taps merge into a double tap, ms
    pub intent_window_ms: u32,
    /// Maximum tap displacement, px
    pub tap_threshold_px: f32,
    /// Minimum swipe speed, px/s
    pub swipe_velocity_threshold: f32,
    /// Hold duration for long-press classification, ms
    pub long_press_threshold_ms: u32,
    /// Time-to-live for precomputed responses, ms
    pub response_cache_ttl_ms: u32,
    /// Keep the previous intent when a recognition pass lands below
    /// `min_confidence` (the historical behavior). When false, a
    /// low-confidence pass clears the intent instead.
    pub intent_stickiness: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            prediction_horizon_ms: PREDICTION_HORIZON_MS,
            min_confidence: MIN_CONFIDENCE,
            sample_history_size: SAMPLE_HISTORY_CAPACITY,
            enable_kalman_filter: true,
            process_noise: PROCESS_NOISE,
            measurement_noise: MEASUREMENT_NOISE,
            intent_window_ms: INTENT_WINDOW_MS,
            tap_threshold_px: TAP_THRESHOLD_PX,
            swipe_velocity_threshold: SWIPE_VELOCITY_THRESHOLD,
            long_press_threshold_ms: LONG_PRESS_THRESHOLD_MS,
            response_cache_ttl_ms: RESPONSE_CACHE_TTL_MS,
            intent_stickiness: true,
        }
    }
}

impl PredictorConfig {
    /// Set the prediction horizon in milliseconds.
    pub fn with_horizon_ms(mut self, horizon_ms: u32) -> Self {
        self.prediction_horizon_ms = horizon_ms;
        self
    }

    /// Set the minimum intent confidence.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set filter noise parameters (process, measurement).
    pub fn with_noise(mut self, process: f32, measurement: f32) -> Self {
        self.process_noise = process;
        self.measurement_noise = measurement;
        self
    }

    /// Enable or disable the Kalman filter.
    pub fn with_kalman(mut self, enabled: bool) -> Self {
        self.enable_kalman_filter = enabled;
        self
    }

    /// Set the low-confidence intent retention policy.
    pub fn with_intent_stickiness(mut self, sticky: bool) -> Self {
        self.intent_stickiness = sticky;
        self
    }

    /// Reject degenerate values.
    pub fn validate(&self) -> GestureResult<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(GestureError::InvalidConfig {
                field: "min_confidence",
                value: self.min_confidence,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.process_noise < 0.0 {
            return Err(GestureError::InvalidConfig {
                field: "process_noise",
                value: self.process_noise,
                min: 0.0,
                max: f32::MAX,
            });
        }
        if self.measurement_noise <= 0.0 {
            return Err(GestureError::InvalidConfig {
                field: "measurement_noise",
                value: self.measurement_noise,
                min: f32::MIN_POSITIVE,
                max: f32::MAX,
            });
        }
        if self.tap_threshold_px <= 0.0 {
            return Err(GestureError::InvalidConfig {
                field: "tap_threshold_px",
                value: self.tap_threshold_px,
                min: f32::MIN_POSITIVE,
                max: f32::MAX,
            });
        }
        Ok(())
    }
}

/// Configuration for [`GestureBypasser`](crate::bypass::GestureBypasser).
#[derive(Debug, Clone)]
pub struct BypassConfig {
    /// Gesture classes the bypasser activates on
    pub gestures: GestureMask,
    /// Track first-touch velocity over the trailing window
    pub track_velocity: bool,
    /// Trailing window size for velocity estimation
    pub velocity_samples: usize,
    /// Run momentum physics after release
    pub enable_momentum: bool,
    /// Per-frame velocity multiplier during momentum, in (0, 1)
    pub momentum_friction: f32,
    /// Speed below which momentum settles, px/s
    pub momentum_threshold: f32,
    /// Resolve settling positions against snap points
    pub enable_snap_points: bool,
    /// Snap points seeded at construction (more can be added later)
    pub snap_points: Vec<SnapPoint, MAX_SNAP_POINTS>,
    /// Search radius for snap resolution, px
    pub snap_radius: f32,
    /// Maintain a predicted end position during the gesture
    pub enable_prediction: bool,
    /// Horizon for end-position prediction, ms
    pub prediction_horizon_ms: u32,
    /// Request passive host listeners (host surface capture hint)
    pub passive_listeners: bool,
}

impl Default for BypassConfig {
    fn default() -> Self {
        Self {
            gestures: GestureMask::all(),
            track_velocity: true,
            velocity_samples: VELOCITY_SAMPLES,
            enable_momentum: true,
            momentum_friction: MOMENTUM_FRICTION,
            momentum_threshold: MOMENTUM_THRESHOLD,
            enable_snap_points: false,
            snap_points: Vec::new(),
            snap_radius: SNAP_RADIUS_PX,
            enable_prediction: false,
            prediction_horizon_ms: PREDICTION_HORIZON_MS,
            passive_listeners: true,
        }
    }
}

impl BypassConfig {
    /// Restrict the bypasser to specific gesture classes.
    pub fn with_gestures(mut self, gestures: GestureMask) -> Self {
        self.gestures = gestures;
        self
    }

    /// Configure momentum physics.
    pub fn with_momentum(mut self, friction: f32, threshold: f32) -> Self {
        self.enable_momentum = true;
        self.momentum_friction = friction;
        self.momentum_threshold = threshold;
        self
    }

    /// Disable momentum entirely.
    pub fn without_momentum(mut self) -> Self {
        self.enable_momentum = false;
        self
    }

    /// Enable snap resolution with the given search radius.
    pub fn with_snap_points(mut self, radius: f32) -> Self {
        self.enable_snap_points = true;
        self.snap_radius = radius;
        self
    }

    /// Seed a snap point at construction. Points beyond the store capacity
    /// are ignored here; use the bypasser's `add_snap_point` for checked
    /// insertion.
    pub fn with_snap_point(mut self, point: SnapPoint) -> Self {
        let _ = self.snap_points.push(point);
        self
    }

    /// Enable end-position prediction with the given horizon.
    pub fn with_prediction(mut self, horizon_ms: u32) -> Self {
        self.enable_prediction = true;
        self.prediction_horizon_ms = horizon_ms;
        self
    }

    /// Reject degenerate values.
    pub fn validate(&self) -> GestureResult<()> {
        if self.enable_momentum && !(self.momentum_friction > 0.0 && self.momentum_friction < 1.0)
        {
            return Err(GestureError::InvalidConfig {
                field: "momentum_friction",
                value: self.momentum_friction,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.momentum_threshold < 0.0 {
            return Err(GestureError::InvalidConfig {
                field: "momentum_threshold",
                value: self.momentum_threshold,
                min: 0.0,
                max: f32::MAX,
            });
        }
        if self.velocity_samples < 2 {
            return Err(GestureError::InvalidConfig {
                field: "velocity_samples",
                value: self.velocity_samples as f32,
                min: 2.0,
                max: VELOCITY_SAMPLE_CAPACITY as f32,
            });
        }
        if self.enable_snap_points && self.snap_radius <= 0.0 {
            return Err(GestureError::InvalidConfig {
                field: "snap_radius",
                value: self.snap_radius,
                min: f32::MIN_POSITIVE,
                max: f32::MAX,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PredictorConfig::default().validate().is_ok());
        assert!(BypassConfig::default().validate().is_ok());
    }

    #[test]
    fn friction_must_decay() {
        let bad = BypassConfig::default().with_momentum(1.2, 50.0);
        assert!(matches!(
            bad.validate(),
            Err(GestureError::InvalidConfig { field: "momentum_friction", .. })
        ));

        // Friction of exactly 1.0 would never settle
        let stuck = BypassConfig::default().with_momentum(1.0, 50.0);
        assert!(stuck.validate().is_err());

        // Momentum disabled: friction value irrelevant
        let mut off = BypassConfig::default().without_momentum();
        off.momentum_friction = 1.2;
        assert!(off.validate().is_ok());
    }

    #[test]
    fn confidence_range_checked() {
        let bad = PredictorConfig::default().with_min_confidence(1.5);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn builders_chain() {
        let config = PredictorConfig::default()
            .with_horizon_ms(50)
            .with_noise(0.02, 0.2)
            .with_kalman(false);
        assert_eq!(config.prediction_horizon_ms, 50);
        assert_eq!(config.process_noise, 0.02);
        assert!(!config.enable_kalman_filter);
    }
}
