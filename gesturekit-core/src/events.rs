//! Touch Event and Gesture Data Model
//!
//! ## Overview
//!
//! This module defines the plain data types flowing through the gesture
//! engine: raw touch events as delivered by the host, immutable samples
//! recorded into history buffers, and the derived gesture/intent values the
//! engine exposes to consumers.
//!
//! ## Memory Model
//!
//! Everything here is stack-friendly and heap-free:
//! - Touch lists are bounded `heapless` vectors (max [`MAX_TOUCHES`])
//! - Identifiers use a small inline string rather than `String`
//! - Derived values (`PredictedTouch`, `IntentPrediction`) are `Copy` and
//!   recomputed rather than shared
//!
//! ## Ownership
//!
//! A [`TouchSample`] is immutable once created and owned exclusively by the
//! predictor or bypasser instance that recorded it. Derived values are
//! ephemeral snapshots: each recognition pass *replaces* the previous
//! `IntentPrediction`, it never merges into it.

use crate::constants::MAX_TOUCHES;
use crate::geometry::Velocity;
use crate::time::Timestamp;
use core::fmt;
use heapless::Vec;

/// Maximum length for inline identifiers (snap point ids)
pub const MAX_INLINE_ID: usize = 15;

/// A 2D position in surface coordinates (pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate in pixels
    pub x: f32,
    /// Vertical coordinate in pixels
    pub y: f32,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displacement vector from `other` to `self`.
    pub fn offset_from(&self, other: Point) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Translate by a vector.
    pub fn translate(&self, v: Vec2) -> Point {
        Point {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }
}

/// A 2D displacement (delta) in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Horizontal component in pixels
    pub x: f32,
    /// Vertical component in pixels
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One touch contact as reported by the host event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Stable identifier for this contact across its lifetime
    pub id: u32,
    /// Horizontal position in pixels
    pub x: f32,
    /// Vertical position in pixels
    pub y: f32,
}

impl TouchPoint {
    /// Position of this contact.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A raw touch event: the standard `touches` / `changedTouches` shape.
///
/// The engine reads only positions, identifiers and the timestamp - no
/// pointer-event or coalesced-event APIs are required of the host.
#[derive(Debug, Clone, Default)]
pub struct TouchEvent {
    /// All contacts currently on the surface
    pub touches: Vec<TouchPoint, MAX_TOUCHES>,
    /// Contacts that changed in this event
    pub changed: Vec<TouchPoint, MAX_TOUCHES>,
    /// Event timestamp in milliseconds
    pub timestamp: Timestamp,
}

impl TouchEvent {
    /// Create an empty event at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            touches: Vec::new(),
            changed: Vec::new(),
            timestamp,
        }
    }

    /// Add an active contact (also recorded as changed). Contacts beyond
    /// [`MAX_TOUCHES`] are ignored.
    pub fn with_touch(mut self, id: u32, x: f32, y: f32) -> Self {
        let point = TouchPoint { id, x, y };
        let _ = self.touches.push(point);
        let _ = self.changed.push(point);
        self
    }

    /// Record a lifted contact (changed but no longer active).
    pub fn with_lifted(mut self, id: u32, x: f32, y: f32) -> Self {
        let _ = self.changed.push(TouchPoint { id, x, y });
        self
    }

    /// First active contact, if any.
    pub fn first_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}

/// One recorded observation of a touch trajectory.
///
/// Immutable once created; appended to a bounded ring buffer with oldest
/// eviction on overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    /// Observed position
    pub position: Point,
    /// Observation timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Contact pressure in [0, 1]; hosts without pressure report 1.0
    pub pressure: f32,
    /// Contact identifier the sample belongs to
    pub identifier: u32,
}

impl TouchSample {
    /// Sample with default pressure from a position and timestamp.
    pub fn new(position: Point, timestamp: Timestamp, identifier: u32) -> Self {
        Self {
            position,
            timestamp,
            pressure: 1.0,
            identifier,
        }
    }
}

/// Coarse gesture class, decided once at gesture start.
///
/// Two or more simultaneous touches at start mean pinch, otherwise pan. The
/// class never changes mid-gesture even if the touch count later does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum GestureType {
    /// Single-contact translation gesture
    #[default]
    Pan = 0,
    /// Multi-contact scale/rotation gesture
    Pinch = 1,
}

/// Bit flags selecting which gesture classes the bypasser processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureMask(u8);

impl GestureMask {
    /// Pan gestures enabled
    pub const PAN: Self = Self(1 << 0);
    /// Pinch gestures enabled
    pub const PINCH: Self = Self(1 << 1);

    /// No gestures enabled.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All gesture classes enabled.
    pub const fn all() -> Self {
        Self(0b11)
    }

    /// Enable the classes in `other`.
    pub fn set(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Whether every class in `other` is enabled.
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether a concrete gesture class is enabled.
    pub const fn allows(&self, gesture: GestureType) -> bool {
        match gesture {
            GestureType::Pan => self.contains(Self::PAN),
            GestureType::Pinch => self.contains(Self::PINCH),
        }
    }
}

impl Default for GestureMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Classified high-level gesture intent.
///
/// A closed set: consumers may match exhaustively. The recognition cascade
/// emits `Tap`, `DoubleTap`, `LongPress`, the four swipes, `Pan` and
/// `Unknown`; the pinch/rotate variants are reserved for multi-touch
/// recognizers layered on the bypasser's gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GestureIntent {
    /// Brief stationary contact
    Tap = 0,
    /// Two taps within the intent window
    DoubleTap = 1,
    /// Stationary contact held past the long-press threshold
    LongPress = 2,
    /// Fast leftward displacement
    SwipeLeft = 3,
    /// Fast rightward displacement
    SwipeRight = 4,
    /// Fast upward displacement
    SwipeUp = 5,
    /// Fast downward displacement
    SwipeDown = 6,
    /// Contacts converging
    PinchIn = 7,
    /// Contacts diverging
    PinchOut = 8,
    /// Contacts rotating about their midpoint
    Rotate = 9,
    /// Sustained displacement below swipe speed
    Pan = 10,
    /// No classification cleared the cascade
    Unknown = 11,
}

impl GestureIntent {
    /// Human-readable name (stable, used as cache/debug keys).
    pub const fn name(&self) -> &'static str {
        match self {
            GestureIntent::Tap => "tap",
            GestureIntent::DoubleTap => "doubleTap",
            GestureIntent::LongPress => "longPress",
            GestureIntent::SwipeLeft => "swipeLeft",
            GestureIntent::SwipeRight => "swipeRight",
            GestureIntent::SwipeUp => "swipeUp",
            GestureIntent::SwipeDown => "swipeDown",
            GestureIntent::PinchIn => "pinchIn",
            GestureIntent::PinchOut => "pinchOut",
            GestureIntent::Rotate => "rotate",
            GestureIntent::Pan => "pan",
            GestureIntent::Unknown => "unknown",
        }
    }
}

/// Live multi-touch gesture state maintained by the bypasser.
///
/// Created on the first touch-down, mutated on every move, and cleared back
/// to defaults when the gesture fully resolves (all touches lifted and any
/// momentum finished), on explicit cancel, or on detach.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureState {
    /// Whether a gesture is currently in progress
    pub is_active: bool,
    /// Gesture class, fixed at gesture start
    pub gesture: GestureType,
    /// First-touch position at gesture start
    pub start_position: Point,
    /// Most recent first-touch position
    pub current_position: Point,
    /// Displacement of the first touch since gesture start
    pub delta: Vec2,
    /// Inter-touch distance ratio vs gesture start (1.0 for single touch)
    pub scale: f32,
    /// Inter-touch angle change vs gesture start, degrees
    pub rotation_deg: f32,
    /// First-touch velocity over the trailing sample window
    pub velocity: Velocity,
    /// Number of contacts currently down
    pub touch_count: usize,
}

impl GestureState {
    /// Inactive state with identity scale.
    pub fn idle() -> Self {
        Self {
            scale: 1.0,
            ..Self::default()
        }
    }
}

/// Kalman-derived position prediction for a tracked touch.
///
/// Ephemeral - recomputed on every processed sample.
#[derive(Debug, Clone, Copy)]
pub struct PredictedTouch {
    /// Predicted position at `predicted_time`
    pub position: Point,
    /// Velocity estimate backing the prediction (px/s)
    pub velocity: Velocity,
    /// Acceleration estimate (px/s²)
    pub acceleration: Vec2,
    /// Confidence in [0, 1]; decays with lookahead distance
    pub confidence: f32,
    /// The absolute time the prediction targets (ms)
    pub predicted_time: Timestamp,
}

/// Recognized gesture intent with its supporting estimates.
///
/// One active instance at a time per tracked touch; replaced, never merged.
#[derive(Debug, Clone, Copy)]
pub struct IntentPrediction {
    /// Classified intent
    pub intent: GestureIntent,
    /// Recognition confidence in [0, 1]
    pub confidence: f32,
    /// Where the gesture is expected to finish, when extrapolable
    pub target_position: Option<Point>,
    /// Estimated time until the gesture completes (ms)
    pub estimated_completion_ms: u32,
}

/// Inline string for snap point identifiers
///
/// Avoids heap allocation for common id lengths
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InlineString {
    len: u8,
    data: [u8; MAX_INLINE_ID],
}

impl InlineString {
    /// Create from string slice. Returns `None` when longer than
    /// [`MAX_INLINE_ID`] bytes.
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_INLINE_ID {
            return None;
        }

        let mut data = [0u8; MAX_INLINE_ID];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        // Only valid UTF-8 is stored by new(), so this cannot fail
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_state_idle_defaults() {
        let state = GestureState::idle();
        assert!(!state.is_active);
        assert_eq!(state.gesture, GestureType::Pan);
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.delta, Vec2::ZERO);
        assert_eq!(state.touch_count, 0);
    }

    #[test]
    fn gesture_mask_filtering() {
        let pan_only = GestureMask::PAN;
        assert!(pan_only.allows(GestureType::Pan));
        assert!(!pan_only.allows(GestureType::Pinch));
        assert!(GestureMask::all().allows(GestureType::Pinch));
        assert!(!GestureMask::empty().allows(GestureType::Pan));
    }

    #[test]
    fn touch_event_builder() {
        let event = TouchEvent::new(1000)
            .with_touch(0, 100.0, 100.0)
            .with_touch(1, 200.0, 100.0);

        assert_eq!(event.touches.len(), 2);
        assert_eq!(event.first_touch().unwrap().id, 0);
        assert_eq!(event.timestamp, 1000);
    }

    #[test]
    fn inline_string_round_trip() {
        let id = InlineString::new("left-edge").unwrap();
        assert_eq!(id.as_str(), "left-edge");

        // Too long for inline storage
        assert!(InlineString::new("an-identifier-way-over-limit").is_none());
    }

    #[test]
    fn intent_names_stable() {
        assert_eq!(GestureIntent::SwipeLeft.name(), "swipeLeft");
        assert_eq!(GestureIntent::LongPress.name(), "longPress");
        assert_eq!(GestureIntent::Unknown.name(), "unknown");
    }
}
