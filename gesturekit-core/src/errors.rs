//! Error Types for the Gesture Engine
//!
//! ## Design Philosophy
//!
//! The touch pipeline itself never fails: degenerate numeric input (zero time
//! deltas, empty histories, events with no touches) produces defined default
//! values, and API misuse (move before start, double detach) is a silent
//! idempotent no-op. Nothing in the hot path returns a `Result`, because
//! nothing in the hot path is allowed to block or abort a gesture.
//!
//! What remains is construction-time and capacity errors:
//!
//! - `InvalidConfig`: a configuration value outside its meaningful range
//!   (e.g. friction of 1.2 would make momentum accelerate forever)
//! - `SnapCapacityExceeded`: the fixed-size snap point store is full
//! - `IdTooLong`: a snap point id does not fit the inline string
//!
//! Errors are small, `Copy`, and heap-free - `&'static str` field names only,
//! so they can be returned from `no_std` builds without allocation.

use thiserror_no_std::Error;

/// Result type for fallible gesture-engine operations.
pub type GestureResult<T> = Result<T, GestureError>;

/// Errors surfaced by configuration and store mutation. Kept small - these
/// never occur on the touch event path.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GestureError {
    /// Configuration value outside its meaningful range
    #[error("{field} = {value} outside range [{min}, {max}]")]
    InvalidConfig {
        /// Name of the offending configuration field
        field: &'static str,
        /// The rejected value
        value: f32,
        /// Minimum acceptable value
        min: f32,
        /// Maximum acceptable value
        max: f32,
    },

    /// The fixed-capacity snap point store is full
    #[error("snap point store full (capacity {capacity})")]
    SnapCapacityExceeded {
        /// Capacity of the store
        capacity: usize,
    },

    /// Identifier does not fit the inline string storage
    #[error("id longer than {max} bytes")]
    IdTooLong {
        /// Maximum inline id length in bytes
        max: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for GestureError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidConfig { field, value, min, max } =>
                defmt::write!(fmt, "{} = {} outside [{}, {}]", field, value, min, max),
            Self::SnapCapacityExceeded { capacity } =>
                defmt::write!(fmt, "snap store full ({})", capacity),
            Self::IdTooLong { max } =>
                defmt::write!(fmt, "id longer than {} bytes", max),
        }
    }
}
