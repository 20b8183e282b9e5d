//! Fixed-Size Circular Buffer for Touch Sample History
//!
//! ## Overview
//!
//! Trajectory prediction and velocity estimation both need a short sliding
//! window of recent touch observations. This module provides a ring buffer
//! with a capacity fixed at compile time through const generics - no heap
//! allocation on the touch event path, ever.
//!
//! ## Design Rationale
//!
//! ### Why a Circular Buffer?
//!
//! - Velocity estimation reads the oldest and newest samples of a trailing
//!   window
//! - The Kalman filter consumes samples one at a time but recognition needs
//!   the touch-start anchor context
//! - Recent data is strictly more valuable than old data: when the buffer is
//!   full, the oldest sample is silently overwritten rather than reported as
//!   an error
//!
//! All operations are O(1) except iteration:
//! - `push()` - array write plus a modulo
//! - `last()` / `get()` - index arithmetic plus bounds check
//! - `iter()` - oldest-to-newest walk
//!
//! ### Memory Layout
//!
//! Storage is an array of `Option<TouchSample>` to avoid unsafe
//! uninitialized memory:
//!
//! ```text
//! SampleBuffer<5> layout:
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  0  │  1  │  2  │  3  │  4  │  ← array indices
//! └─────┴─────┴─────┴─────┴─────┘
//!    ↑
//!    └── write_pos wraps to 0 after N pushes
//! ```
//!
//! The modulo in `push()` compiles to a bit mask when N is a power of two;
//! for the default history size of 10 it costs a division, which is still
//! negligible at touch sampling rates.

use crate::events::TouchSample;

/// Fixed-size circular buffer of touch samples
///
/// Overwrites the oldest sample when full, maintaining a sliding window of
/// the most recent `N` observations in chronological order.
///
/// ## Internal Invariants
///
/// - `write_pos < N` (next write position is always valid)
/// - `len <= N` (never claims more items than capacity)
/// - Iteration yields samples oldest to newest
///
/// ## Thread Safety
///
/// Not thread-safe; each buffer is exclusively owned by one predictor or
/// bypasser instance, matching the single-threaded cooperative model.
#[derive(Clone)]
pub struct SampleBuffer<const N: usize> {
    /// Storage array using Option for uninitialized slots
    data: [Option<TouchSample>; N],

    /// Index where the next write will occur, wraps at N
    write_pos: usize,

    /// Current number of valid samples
    len: usize,
}

impl<const N: usize> SampleBuffer<N> {
    /// Creates a new empty buffer.
    ///
    /// Const, so buffers can live in statics on embedded targets.
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Adds a sample, overwriting the oldest when full.
    pub fn push(&mut self, sample: TouchSample) {
        self.data[self.write_pos] = Some(sample);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&TouchSample> {
        if self.is_empty() {
            return None;
        }

        // Most recent is one before write position
        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };

        self.data[idx].as_ref()
    }

    /// Sample by logical index (0 = oldest, `len - 1` = newest).
    ///
    /// When the buffer is not full, logical and physical indices match; when
    /// full, the oldest element sits at `write_pos` and the index is offset:
    ///
    /// ```text
    /// Physical:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical:   [A, B, C, D, E]
    /// logical[0] = physical[(2 + 0) % 5] = A
    /// ```
    pub fn get(&self, index: usize) -> Option<&TouchSample> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual_index].as_ref()
    }

    /// Iterate over samples from oldest to newest
    pub fn iter(&self) -> SampleBufferIter<N> {
        SampleBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Clear all samples
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }
}

/// Iterator over buffer contents, oldest to newest
pub struct SampleBufferIter<'a, const N: usize> {
    buffer: &'a SampleBuffer<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for SampleBufferIter<'a, N> {
    type Item = &'a TouchSample;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Point;

    fn sample(x: f32, ts: u64) -> TouchSample {
        TouchSample::new(Point::new(x, 0.0), ts, 0)
    }

    #[test]
    fn empty_buffer() {
        let buffer: SampleBuffer<5> = SampleBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.last().is_none());
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = SampleBuffer::<5>::new();

        buffer.push(sample(25.0, 1000));
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());

        let last = buffer.last().unwrap();
        assert_eq!(last.position.x, 25.0);
        assert_eq!(last.timestamp, 1000);
    }

    #[test]
    fn circular_overwrite() {
        let mut buffer = SampleBuffer::<3>::new();

        for i in 0..5 {
            buffer.push(sample(i as f32, i as u64 * 1000));
        }

        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());

        // Oldest two were overwritten; 2, 3, 4 remain in order
        let xs: heapless::Vec<f32, 3> = buffer.iter().map(|s| s.position.x).collect();
        assert_eq!(xs.as_slice(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn logical_indexing_after_wrap() {
        let mut buffer = SampleBuffer::<4>::new();

        for i in 0..6 {
            buffer.push(sample(i as f32, i as u64));
        }

        assert_eq!(buffer.get(0).unwrap().timestamp, 2);
        assert_eq!(buffer.get(3).unwrap().timestamp, 5);
        assert!(buffer.get(4).is_none());
    }

    #[test]
    fn clear_resets() {
        let mut buffer = SampleBuffer::<4>::new();
        buffer.push(sample(1.0, 1));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.last().is_none());
    }
}
