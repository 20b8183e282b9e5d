//! GestureKit Core - Touch Prediction & Latency Bypass Engine
//!
//! ## Overview
//!
//! GestureKit cuts perceived touch latency two ways:
//!
//! 1. **Prediction** - a constant-acceleration Kalman filter tracks each
//!    touch trajectory, predicts where it will be tens of milliseconds
//!    ahead, classifies the user's intent, and lets the host precompute the
//!    response before the gesture completes
//! 2. **Bypass** - pan/pinch gestures drive visual transforms synchronously
//!    inside the touch handler, skipping the host's full dispatch and
//!    layout path, with momentum physics and snap points carrying the
//!    motion after release
//!
//! ```text
//!  touch events ──┬──▶ TouchPredictor ──▶ predictions / intents / cache
//!                 │
//!                 └──▶ GestureBypasser ──▶ StyleSink (synchronous)
//!                            │
//!                            └──▶ FrameScheduler (momentum loop)
//! ```
//!
//! ## Design Principles
//!
//! - **Nothing blocks the touch path**: handlers are straight-line numeric
//!   code with no allocation, locking or I/O
//! - **Time is data**: the engine consumes event timestamps; only latency
//!   measurement reads a clock, through the [`time::TimeSource`] seam
//! - **Bounded memory**: every buffer is a fixed-capacity ring or
//!   `heapless` collection, sized at compile time
//! - **Host-agnostic seams**: style output and frame scheduling are traits,
//!   so the same engine runs against a DOM bridge, a native compositor or a
//!   test mock
//!
//! ## Quick Start
//!
//! ```rust
//! use gesturekit_core::{
//!     config::PredictorConfig,
//!     events::{Point, TouchSample},
//!     predictor::TouchPredictor,
//! };
//!
//! let mut predictor: TouchPredictor = TouchPredictor::new(PredictorConfig::default());
//!
//! predictor.begin_touch(TouchSample::new(Point::new(100.0, 100.0), 0, 0));
//! predictor.process_sample(TouchSample::new(Point::new(120.0, 100.0), 16, 0));
//! predictor.process_sample(TouchSample::new(Point::new(140.0, 100.0), 32, 0));
//!
//! // Where will the touch be 100 ms from the last sample?
//! if let Some(prediction) = predictor.prediction_at(132) {
//!     println!(
//!         "({:.0}, {:.0}) at confidence {:.2}",
//!         prediction.position.x, prediction.position.y, prediction.confidence
//!     );
//! }
//! ```
//!
//! ## Platform Support
//!
//! `no_std` compatible with the default `std` feature disabled; all math
//! goes through `libm` and all collections are `heapless`. The `embedded`
//! feature switches diagnostics to `defmt`.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Trace-level diagnostics, compiled out without the `log` feature.
#[cfg(feature = "log")]
macro_rules! gk_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! gk_trace {
    ($($arg:tt)*) => {};
}

pub mod buffer;
pub mod bypass;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod metrics;
pub mod predictor;
pub mod snap;
pub mod time;

pub use buffer::SampleBuffer;
pub use bypass::{
    CaptureOptions, EndPrediction, FrameScheduler, GestureBypasser, StyleSink, StyleUpdate,
};
pub use config::{BypassConfig, PredictorConfig};
pub use errors::{GestureError, GestureResult};
pub use events::{
    GestureIntent, GestureMask, GestureState, GestureType, IntentPrediction, Point,
    PredictedTouch, TouchEvent, TouchPoint, TouchSample, Vec2,
};
pub use geometry::Velocity;
pub use metrics::{BypassMetrics, PredictorMetrics};
pub use predictor::TouchPredictor;
pub use snap::{SnapPoint, SnapPoints};
pub use time::{TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
