//! Time handling for the gesture engine
//!
//! Touch events arrive with their own timestamps, so the core numeric code
//! never reads a clock - it treats time as data. The one exception is bypass
//! latency measurement, which wraps the style callback with before/after
//! readings from a [`TimeSource`].
//!
//! Provided sources:
//! - `MonotonicTime` - milliseconds since construction, never goes backwards
//! - `SystemTime` - wall clock (requires `std`)
//! - `FixedTime` - manually advanced, for deterministic tests

/// Timestamp in milliseconds. Touch event timestamps are relative to an
/// arbitrary epoch (page load, device boot); only deltas are meaningful.
pub type Timestamp = u64;

/// Source of time for latency measurement
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Get current timestamp in microseconds
    ///
    /// Latency measurement needs sub-millisecond readings; a style callback
    /// usually returns in well under a millisecond, so `now()` deltas would
    /// round to zero. Sources without microsecond resolution fall back to
    /// scaled milliseconds.
    fn now_micros(&self) -> u64 {
        self.now() * 1_000
    }

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

/// Monotonic time source counting from construction
///
/// Backed by `std::time::Instant` when `std` is enabled; on bare-metal
/// targets the host is expected to supply its own [`TimeSource`] wired to a
/// hardware timer, and this type degenerates to a zero clock.
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    #[cfg(feature = "std")]
    start: std::time::Instant,
}

impl MonotonicTime {
    /// Create a monotonic source starting at zero.
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "std")]
            start: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        #[cfg(feature = "std")]
        {
            self.start.elapsed().as_millis() as Timestamp
        }
        #[cfg(not(feature = "std"))]
        {
            0
        }
    }

    fn now_micros(&self) -> u64 {
        #[cfg(feature = "std")]
        {
            self.start.elapsed().as_micros() as u64
        }
        #[cfg(not(feature = "std"))]
        {
            0
        }
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn now_micros(&self) -> u64 {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64
    }

    fn is_wall_clock(&self) -> bool {
        true
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a source frozen at the given timestamp.
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp.
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
    }

    #[test]
    fn fixed_time_micros_scales_milliseconds() {
        let time = FixedTime::new(1500);
        assert_eq!(time.now_micros(), 1_500_000);
    }

    #[test]
    fn monotonic_never_decreases() {
        let time = MonotonicTime::new();
        let a = time.now();
        let b = time.now();
        assert!(b >= a);
        assert!(!time.is_wall_clock());
    }
}
