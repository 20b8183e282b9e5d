//! Vector and Physics Utilities
//!
//! ## Overview
//!
//! Shared numeric primitives for the gesture engine: distances, angles,
//! velocity estimation over sample windows, and the smoothing helpers the
//! animation consumers build on.
//!
//! ## Design Principles
//!
//! ### Pure Functions
//! Everything here is a pure function with no side effects - safe to call
//! from the synchronous touch handlers and trivial to test in isolation.
//!
//! ### Defensive Defaults
//! Every function has an explicit guard for its degenerate case and returns
//! a defined default instead of erroring:
//! - Zero or negative time delta → zero velocity
//! - Fewer than two samples → zero velocity
//! - Zero-length reference vector → zero angle
//!
//! This matches the engine-wide rule that nothing on the touch path may
//! throw or block.
//!
//! ## Units
//!
//! Positions are pixels, timestamps milliseconds, velocities pixels per
//! second, angles degrees (atan2 convention: 0° points right, positive
//! angles rotate toward positive y, which is *down* in surface coordinates).

use crate::buffer::SampleBuffer;
use crate::events::{Point, TouchSample};

/// Degrees per radian
const RAD_TO_DEG: f32 = 57.295_78;

/// Velocity estimate over a sample window.
///
/// `speed` and `angle_deg` are derived from the components and carried along
/// so hot-path consumers never recompute the square root.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    /// Horizontal component, px/s
    pub vx: f32,
    /// Vertical component, px/s
    pub vy: f32,
    /// Magnitude, px/s
    pub speed: f32,
    /// Direction in degrees (atan2 convention)
    pub angle_deg: f32,
}

impl Velocity {
    /// The zero-velocity default returned for degenerate input.
    pub const ZERO: Self = Self {
        vx: 0.0,
        vy: 0.0,
        speed: 0.0,
        angle_deg: 0.0,
    };

    /// Build a velocity from components, deriving speed and angle.
    pub fn from_components(vx: f32, vy: f32) -> Self {
        let speed = libm::sqrtf(vx * vx + vy * vy);
        let angle_deg = if speed == 0.0 {
            0.0
        } else {
            libm::atan2f(vy, vx) * RAD_TO_DEG
        };
        Self {
            vx,
            vy,
            speed,
            angle_deg,
        }
    }
}

/// Euclidean distance between two points, pixels.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    libm::sqrtf(dx * dx + dy * dy)
}

/// Angle of the vector `from → to` in degrees.
///
/// Coincident points yield 0.0.
pub fn angle_deg(from: Point, to: Point) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    libm::atan2f(dy, dx) * RAD_TO_DEG
}

/// Linear velocity between two samples, px/s.
///
/// Returns [`Velocity::ZERO`] when the time delta is zero or the samples are
/// out of order - the caller-side `dt <= 0` guard lives here so no consumer
/// can forget it.
pub fn linear_velocity(first: &TouchSample, last: &TouchSample) -> Velocity {
    if last.timestamp <= first.timestamp {
        return Velocity::ZERO;
    }

    let dt_s = (last.timestamp - first.timestamp) as f32 / 1000.0;
    let vx = (last.position.x - first.position.x) / dt_s;
    let vy = (last.position.y - first.position.y) / dt_s;

    Velocity::from_components(vx, vy)
}

/// Velocity over the trailing `window` samples of a buffer, px/s.
///
/// Uses the endpoints of the window (the middle samples only define which
/// endpoints participate). Fewer than two samples, or equal endpoint
/// timestamps, yield the zero default.
pub fn window_velocity<const N: usize>(samples: &SampleBuffer<N>, window: usize) -> Velocity {
    let len = samples.len();
    if len < 2 {
        return Velocity::ZERO;
    }

    let start = len.saturating_sub(window.max(2));
    let (Some(first), Some(last)) = (samples.get(start), samples.last()) else {
        return Velocity::ZERO;
    };

    linear_velocity(first, last)
}

/// Exponential smoothing step: move `current` toward `target` by `factor`.
///
/// `factor` is clamped to [0, 1]; 0 keeps the current value, 1 jumps to the
/// target.
pub fn exp_smooth(current: f32, target: f32, factor: f32) -> f32 {
    let f = factor.clamp(0.0, 1.0);
    current + (target - current) * f
}

/// One step of critically-dampable spring integration.
///
/// Returns the updated `(position, velocity)` after `dt_s` seconds under a
/// spring with the given stiffness and damping pulling toward `target`.
/// Non-positive `dt_s` returns the state unchanged.
pub fn spring_step(
    position: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
    dt_s: f32,
) -> (f32, f32) {
    if dt_s <= 0.0 {
        return (position, velocity);
    }

    let accel = stiffness * (target - position) - damping * velocity;
    let velocity = velocity + accel * dt_s;
    let position = position + velocity * dt_s;
    (position, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(x: f32, y: f32, ts: u64) -> TouchSample {
        TouchSample::new(Point::new(x, y), ts, 0)
    }

    #[test]
    fn distance_basic() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(Point::new(1.0, 1.0), Point::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn angle_quadrants() {
        let origin = Point::new(0.0, 0.0);
        assert!((angle_deg(origin, Point::new(10.0, 0.0))).abs() < 0.01);
        assert!((angle_deg(origin, Point::new(0.0, 10.0)) - 90.0).abs() < 0.01);
        assert!((angle_deg(origin, Point::new(-10.0, 0.0)).abs() - 180.0).abs() < 0.01);
        assert_eq!(angle_deg(origin, origin), 0.0);
    }

    #[test]
    fn velocity_zero_dt_guard() {
        let a = sample(0.0, 0.0, 1000);
        let b = sample(50.0, 0.0, 1000); // same timestamp
        assert_eq!(linear_velocity(&a, &b), Velocity::ZERO);

        // Backwards time also yields the zero default
        let c = sample(50.0, 0.0, 900);
        assert_eq!(linear_velocity(&a, &c), Velocity::ZERO);
    }

    #[test]
    fn velocity_units() {
        // 50 px in 16 ms ≈ 3125 px/s
        let a = sample(100.0, 100.0, 0);
        let b = sample(150.0, 100.0, 16);
        let v = linear_velocity(&a, &b);
        assert!((v.vx - 3125.0).abs() < 0.5);
        assert_eq!(v.vy, 0.0);
        assert!((v.speed - 3125.0).abs() < 0.5);
        assert!(v.angle_deg.abs() < 0.01);
    }

    #[test]
    fn window_velocity_trailing() {
        let mut buf = SampleBuffer::<8>::new();
        // Old slow movement followed by a fast tail
        buf.push(sample(0.0, 0.0, 0));
        buf.push(sample(1.0, 0.0, 100));
        buf.push(sample(2.0, 0.0, 200));
        buf.push(sample(102.0, 0.0, 300));

        // Window of 2 looks only at the fast tail: 100 px / 100 ms
        let v = window_velocity(&buf, 2);
        assert!((v.vx - 1000.0).abs() < 0.5);

        // Full window averages from the start: 102 px / 300 ms
        let v_full = window_velocity(&buf, 8);
        assert!((v_full.vx - 340.0).abs() < 0.5);
    }

    #[test]
    fn window_velocity_single_sample() {
        let mut buf = SampleBuffer::<4>::new();
        buf.push(sample(10.0, 10.0, 50));
        assert_eq!(window_velocity(&buf, 4), Velocity::ZERO);
    }

    #[test]
    fn exp_smooth_bounds() {
        assert_eq!(exp_smooth(0.0, 10.0, 0.0), 0.0);
        assert_eq!(exp_smooth(0.0, 10.0, 1.0), 10.0);
        assert_eq!(exp_smooth(0.0, 10.0, 0.5), 5.0);
        // Out-of-range factors are clamped
        assert_eq!(exp_smooth(0.0, 10.0, 2.0), 10.0);
    }

    #[test]
    fn spring_converges() {
        let mut pos = 0.0;
        let mut vel = 0.0;
        for _ in 0..600 {
            let (p, v) = spring_step(pos, vel, 100.0, 120.0, 22.0, 1.0 / 60.0);
            pos = p;
            vel = v;
        }
        assert!((pos - 100.0).abs() < 1.0);
        assert!(vel.abs() < 1.0);
    }

    #[test]
    fn spring_zero_dt_unchanged() {
        assert_eq!(spring_step(5.0, 2.0, 100.0, 120.0, 22.0, 0.0), (5.0, 2.0));
    }

    proptest! {
        /// For all non-increasing timestamp pairs, velocity is the zero default.
        #[test]
        fn degenerate_dt_always_zero(
            x0 in -1e4f32..1e4, y0 in -1e4f32..1e4,
            x1 in -1e4f32..1e4, y1 in -1e4f32..1e4,
            ts in 0u64..1_000_000, back in 0u64..1_000,
        ) {
            let a = sample(x0, y0, ts);
            let b = sample(x1, y1, ts.saturating_sub(back));
            prop_assert_eq!(linear_velocity(&a, &b), Velocity::ZERO);
        }

        /// Speed is always the magnitude of the components.
        #[test]
        fn speed_matches_components(vx in -5e3f32..5e3, vy in -5e3f32..5e3) {
            let v = Velocity::from_components(vx, vy);
            let expected = libm::sqrtf(vx * vx + vy * vy);
            prop_assert!((v.speed - expected).abs() < 1e-3);
        }
    }
}
