//! Constants for GestureKit Core
//!
//! Centralized, documented constants used throughout the gesture engine.
//! All values carry units in their names or documentation; use these instead
//! of magic numbers.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Recognition**: intent classification thresholds and confidences
//! - **Filter**: Kalman filter noise defaults and the contractual gains
//! - **Prediction**: lookahead horizons and confidence decay
//! - **Momentum**: friction physics and frame cadence
//! - **Buffers**: fixed capacities for the no-alloc hot path

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// Maximum displacement for a touch to still count as a tap (pixels).
pub const TAP_THRESHOLD_PX: f32 = 10.0;

/// Maximum duration for a tap (milliseconds). Anything held longer within
/// the tap radius is on the long-press track.
pub const TAP_MAX_DURATION_MS: u32 = 200;

/// Hold duration after which a stationary touch becomes a long press.
pub const LONG_PRESS_THRESHOLD_MS: u32 = 500;

/// Two taps closer together than this window form a double tap.
pub const INTENT_WINDOW_MS: u32 = 300;

/// Minimum speed for swipe classification (pixels per second).
///
/// 500 px/s corresponds to 0.5 px/ms, the conventional threshold on
/// touchscreens sampling at 60-120 Hz.
pub const SWIPE_VELOCITY_THRESHOLD: f32 = 500.0;

/// Fixed confidence assigned to a recognized tap.
pub const TAP_CONFIDENCE: f32 = 0.8;

/// Fixed confidence assigned to a recognized double tap.
pub const DOUBLE_TAP_CONFIDENCE: f32 = 0.85;

/// Fixed confidence assigned to a recognized long press.
pub const LONG_PRESS_CONFIDENCE: f32 = 0.9;

/// Upper bound on swipe confidence regardless of speed.
pub const SWIPE_CONFIDENCE_CAP: f32 = 0.95;

/// Base swipe confidence before the speed-proportional term.
pub const SWIPE_CONFIDENCE_BASE: f32 = 0.6;

/// Speed divisor mapping px/s onto the swipe confidence ramp.
pub const SWIPE_CONFIDENCE_SPEED_SCALE: f32 = 10_000.0;

/// Fixed confidence assigned to the pan fallback.
pub const PAN_CONFIDENCE: f32 = 0.7;

/// Confidence reported for an unclassifiable trajectory.
pub const UNKNOWN_CONFIDENCE: f32 = 0.5;

/// Default minimum confidence for an intent to be emitted at all.
pub const MIN_CONFIDENCE: f32 = 0.6;

/// Nominal time for an in-flight swipe to complete (milliseconds).
pub const SWIPE_COMPLETION_MS: u32 = 150;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Default isotropic process noise injected per predict step.
pub const PROCESS_NOISE: f32 = 0.01;

/// Default measurement noise variance for touch positions.
pub const MEASUREMENT_NOISE: f32 = 0.1;

/// Empirical gain applied to the position innovation when nudging the
/// velocity and acceleration states.
///
/// This is a contractual constant: the filter deliberately skips the full
/// Kalman velocity-gain derivation and uses this fixed coefficient instead.
/// Changing it changes observable trajectories.
pub const KALMAN_INNOVATION_GAIN: f32 = 0.1;

/// Dimension of the constant-acceleration state vector
/// `[x, y, vx, vy, ax, ay]`.
pub const KALMAN_STATE_DIM: usize = 6;

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Default lookahead horizon for position predictions (milliseconds).
pub const PREDICTION_HORIZON_MS: u32 = 100;

/// Linear confidence decay per millisecond of lookahead.
///
/// A prediction 100 ms out loses 0.2 of confidence relative to one at the
/// last observed sample.
pub const CONFIDENCE_DECAY_PER_MS: f32 = 0.002;

/// Lower bound on prediction confidence after decay.
pub const CONFIDENCE_FLOOR: f32 = 0.3;

/// Confidence reported for a free (un-snapped) end-position prediction.
pub const END_PREDICTION_CONFIDENCE: f32 = 0.7;

/// Confidence reported when a snap point captures the predicted end.
pub const SNAPPED_PREDICTION_CONFIDENCE: f32 = 0.9;

// ---------------------------------------------------------------------------
// Momentum
// ---------------------------------------------------------------------------

/// Default per-frame velocity multiplier during momentum decay.
pub const MOMENTUM_FRICTION: f32 = 0.95;

/// Speed below which momentum stops and the position settles (px/s).
pub const MOMENTUM_THRESHOLD: f32 = 50.0;

/// Frame cadence the momentum physics are expressed in.
///
/// Velocity is integrated in 1/60 s steps: the decay constants assume a
/// roughly 60 Hz frame callback. See the bypass module docs for the
/// implications on displays with other refresh rates.
pub const FRAMES_PER_SECOND: f32 = 60.0;

/// Default radius within which a snap point attracts a settling gesture.
pub const SNAP_RADIUS_PX: f32 = 40.0;

// ---------------------------------------------------------------------------
// Buffers
// ---------------------------------------------------------------------------

/// Capacity of the predictor's touch sample history ring.
pub const SAMPLE_HISTORY_CAPACITY: usize = 10;

/// Capacity of the bypasser's velocity sample ring.
pub const VELOCITY_SAMPLE_CAPACITY: usize = 8;

/// Default trailing window used for velocity estimation.
pub const VELOCITY_SAMPLES: usize = 5;

/// Maximum simultaneous touches carried by one event.
pub const MAX_TOUCHES: usize = 10;

/// Maximum stored snap points.
pub const MAX_SNAP_POINTS: usize = 16;

/// Capacity of the precomputed response cache (power of two for the
/// index-map hasher).
pub const RESPONSE_CACHE_CAPACITY: usize = 16;

/// Default time-to-live for precomputed responses (milliseconds).
pub const RESPONSE_CACHE_TTL_MS: u32 = 150;

/// Number of latency/accuracy samples feeding the rolling averages.
pub const METRICS_WINDOW: usize = 100;
