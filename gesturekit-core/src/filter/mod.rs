//! Trajectory Filtering for Touch Prediction
//!
//! ## Overview
//!
//! Raw touch positions are noisy: sensor quantization, finger contact-patch
//! wobble, and irregular sampling all corrupt the trajectory. This module
//! houses the recursive estimator that smooths observed positions and
//! carries velocity/acceleration state forward for lookahead prediction.
//!
//! ## Why a Simplified Filter?
//!
//! A textbook Kalman filter derives a full gain matrix from the covariance
//! and measurement model each step. Touch input has narrow, bounded noise
//! characteristics and a fixed 2D measurement shape, so this implementation
//! trades filter optimality for determinism and speed:
//!
//! - Isotropic process noise (one scalar added to every diagonal entry)
//! - Scalar gain derived from the position-variance term only
//! - Fixed empirical coefficients for the velocity/acceleration corrections
//!
//! The exact formulas, coefficients included, are contractual - consumers
//! depend on bit-for-bit reproducible trajectories. See
//! [`kalman`] for the step definitions.

pub mod kalman;

pub use kalman::{kalman_predict, kalman_update, Covariance, KalmanState};
