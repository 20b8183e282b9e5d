//! Constant-Acceleration Kalman Steps for 2D Touch Trajectories
//!
//! ## State Model
//!
//! The state vector is conceptually `[x, y, vx, vy, ax, ay]` under a
//! constant-acceleration motion model:
//!
//! ```text
//! Predict:  x += vx·dt + ½·ax·dt²      (and symmetrically for y)
//!           vx += ax·dt
//!           ax unchanged
//!           P[i][i] += Q  for every diagonal entry
//!
//! Update:   innovation = z − [x, y]
//!           K = P₀₀ / (P₀₀ + R)               (scalar gain)
//!           [x, y] += K·innovation
//!           [vx, vy] += 0.1·innovation        (empirical coefficient)
//!           [ax, ay] += 0.1·innovation
//!           P *= (1 − K)                      (uniform scaling)
//! ```
//!
//! ## Approximations
//!
//! Two deliberate simplifications relative to the textbook filter:
//!
//! 1. **Isotropic process noise**: `Q` is injected equally into every
//!    diagonal entry rather than shaped per state component. Touch sampling
//!    rates are narrow enough that per-component shaping buys nothing.
//! 2. **Scalar gain**: the gain is derived from `P₀₀` alone and applied to
//!    the position, while velocity and acceleration are nudged by the fixed
//!    [`KALMAN_INNOVATION_GAIN`] coefficient instead of a derived
//!    velocity gain.
//!
//! These formulas are contractual: scaling constants included, they must be
//! reproduced exactly for behavioral compatibility with existing consumers
//! and their recorded trajectories.
//!
//! ## Failure Semantics
//!
//! None. Both steps are pure numeric functions that never error; callers
//! guard `dt <= 0` upstream (the velocity helpers return a zero default in
//! that case, and the predictor skips the predict step entirely for a zero
//! delta).
//!
//! ## Invariants
//!
//! - Diagonal covariance entries are non-negative
//! - `update` strictly decreases `P₀₀` whenever `R > 0` and `P₀₀ > 0`
//!   (information gain)
//! - `predict` increases every diagonal entry by exactly `Q`
//!   (process-noise injection)

use crate::constants::{KALMAN_INNOVATION_GAIN, KALMAN_STATE_DIM};
use crate::events::Point;

/// 6×6 covariance matrix for the constant-acceleration state.
pub type Covariance = [[f32; KALMAN_STATE_DIM]; KALMAN_STATE_DIM];

/// Filter state: position, velocity, acceleration and covariance.
///
/// Mutated in place by the predict/update steps; re-initialized from scratch
/// whenever tracking restarts at a new touch-down.
#[derive(Debug, Clone)]
pub struct KalmanState {
    /// Estimated x position, px
    pub x: f32,
    /// Estimated y position, px
    pub y: f32,
    /// Estimated x velocity, px/s
    pub vx: f32,
    /// Estimated y velocity, px/s
    pub vy: f32,
    /// Estimated x acceleration, px/s²
    pub ax: f32,
    /// Estimated y acceleration, px/s²
    pub ay: f32,
    /// Estimation error covariance
    pub covariance: Covariance,
}

fn identity() -> Covariance {
    let mut m = [[0.0; KALMAN_STATE_DIM]; KALMAN_STATE_DIM];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

impl KalmanState {
    /// Initialize tracking at a touch-down position.
    ///
    /// Velocity and acceleration start at zero; covariance resets to
    /// identity (full uncertainty about motion, unit uncertainty about
    /// position).
    pub fn init(position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: 0.0,
            vy: 0.0,
            ax: 0.0,
            ay: 0.0,
            covariance: identity(),
        }
    }

    /// Current position estimate.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Position variance (the `P₀₀ + P₁₁` diagonal slice), used for
    /// confidence derivation - higher variance means lower confidence.
    pub fn position_variance(&self) -> f32 {
        self.covariance[0][0] + self.covariance[1][1]
    }
}

impl Default for KalmanState {
    fn default() -> Self {
        Self::init(Point::default())
    }
}

/// Prediction step: advance the state `dt_s` seconds under constant
/// acceleration and inject process noise.
///
/// `dt_s <= 0` must be guarded by the caller; passing zero is harmless for
/// the motion terms but still injects `Q` into the covariance, so callers
/// skip the call entirely for a zero delta.
pub fn kalman_predict(state: &mut KalmanState, dt_s: f32, process_noise: f32) {
    state.x += state.vx * dt_s + 0.5 * state.ax * dt_s * dt_s;
    state.y += state.vy * dt_s + 0.5 * state.ay * dt_s * dt_s;
    state.vx += state.ax * dt_s;
    state.vy += state.ay * dt_s;
    // Acceleration unchanged under the constant-acceleration model

    // Isotropic process-noise injection
    for i in 0..KALMAN_STATE_DIM {
        state.covariance[i][i] += process_noise;
    }
}

/// Update step: correct the state with an observed position.
///
/// Scalar gain from the position-variance term; uniform covariance scaling
/// by `(1 − K)`.
pub fn kalman_update(state: &mut KalmanState, measurement: Point, measurement_noise: f32) {
    let innovation_x = measurement.x - state.x;
    let innovation_y = measurement.y - state.y;

    let p00 = state.covariance[0][0];
    let denom = p00 + measurement_noise;
    if denom <= 0.0 {
        // Degenerate covariance/noise combination; nothing to gain
        return;
    }
    let gain = p00 / denom;

    state.x += gain * innovation_x;
    state.y += gain * innovation_y;

    // Fixed empirical coefficients instead of a derived velocity gain
    state.vx += KALMAN_INNOVATION_GAIN * innovation_x;
    state.vy += KALMAN_INNOVATION_GAIN * innovation_y;
    state.ax += KALMAN_INNOVATION_GAIN * innovation_x;
    state.ay += KALMAN_INNOVATION_GAIN * innovation_y;

    let shrink = 1.0 - gain;
    for row in state.covariance.iter_mut() {
        for entry in row.iter_mut() {
            *entry *= shrink;
        }
    }
}
