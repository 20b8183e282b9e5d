//! Snap Points and End-Position Extrapolation
//!
//! ## Overview
//!
//! A snap point is a designated coordinate that attracts a settling gesture
//! within its radius - the gesture equivalent of magnetized grid positions.
//! This module owns the bounded snap point store and the friction-decay
//! extrapolation shared by the bypasser's prediction path and its momentum
//! settle logic.
//!
//! Membership is mutated only through explicit add/remove/clear calls; the
//! physics loop reads but never modifies the store.

use crate::constants::{FRAMES_PER_SECOND, MAX_SNAP_POINTS};
use crate::errors::{GestureError, GestureResult};
use crate::events::{InlineString, Point, MAX_INLINE_ID};
use crate::geometry::{distance, Velocity};
use heapless::Vec;

/// A snap target: a coordinate with an attraction radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    /// Caller-assigned identifier
    pub id: InlineString,
    /// Target x coordinate, px
    pub x: f32,
    /// Target y coordinate, px
    pub y: f32,
    /// Attraction radius, px
    pub radius: f32,
}

impl SnapPoint {
    /// Build a snap point. Fails only when the id exceeds the inline limit.
    pub fn new(id: &str, x: f32, y: f32, radius: f32) -> GestureResult<Self> {
        let id = InlineString::new(id).ok_or(GestureError::IdTooLong { max: MAX_INLINE_ID })?;
        Ok(Self { id, x, y, radius })
    }

    /// Target position as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Bounded, unordered snap point store.
#[derive(Debug, Clone, Default)]
pub struct SnapPoints {
    points: Vec<SnapPoint, MAX_SNAP_POINTS>,
}

impl SnapPoints {
    /// Empty store.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Add a snap point; replaces an existing point with the same id.
    pub fn add(&mut self, point: SnapPoint) -> GestureResult<()> {
        if let Some(existing) = self.points.iter_mut().find(|p| p.id == point.id) {
            *existing = point;
            return Ok(());
        }
        self.points
            .push(point)
            .map_err(|_| GestureError::SnapCapacityExceeded {
                capacity: MAX_SNAP_POINTS,
            })
    }

    /// Remove by id; returns whether a point was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id.as_str() != id);
        self.points.len() != before
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over stored points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SnapPoint> {
        self.points.iter()
    }

    /// Nearest snap point within `radius` of `position`.
    ///
    /// The search radius is the *caller's* (the configured snap radius); the
    /// per-point radius is honored as an additional cap so a point can opt
    /// into a tighter attraction zone.
    pub fn nearest_within(&self, position: Point, radius: f32) -> Option<&SnapPoint> {
        let mut best: Option<(&SnapPoint, f32)> = None;

        for point in self.points.iter() {
            let d = distance(position, point.position());
            if d > radius || d > point.radius {
                continue;
            }
            match best {
                Some((_, best_d)) if best_d <= d => {}
                _ => best = Some((point, d)),
            }
        }

        best.map(|(p, _)| p)
    }
}

/// Extrapolate where a moving point settles under per-frame friction decay.
///
/// The decay is expressed in 60 fps-equivalent frames regardless of the real
/// frame cadence: the end position is
/// `current + v · t · friction^(t · 60)`
/// with `t` the horizon in seconds. This mirrors the momentum loop's fixed
/// 1/60 s integration step, so predicted and simulated end positions agree.
pub fn extrapolate_end_position(
    current: Point,
    velocity: Velocity,
    horizon_s: f32,
    friction: f32,
) -> Point {
    if horizon_s <= 0.0 {
        return current;
    }

    let frames = horizon_s * FRAMES_PER_SECOND;
    let decay = libm::powf(friction, frames);

    Point::new(
        current.x + velocity.vx * horizon_s * decay,
        current.y + velocity.vy * horizon_s * decay,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(points: &[(&str, f32, f32, f32)]) -> SnapPoints {
        let mut store = SnapPoints::new();
        for (id, x, y, r) in points {
            store.add(SnapPoint::new(id, *x, *y, *r).unwrap()).unwrap();
        }
        store
    }

    #[test]
    fn nearest_respects_radius() {
        let store = store_with(&[("a", 100.0, 100.0, 50.0), ("b", 300.0, 100.0, 50.0)]);

        // Within range of "a" only
        let hit = store.nearest_within(Point::new(110.0, 100.0), 40.0).unwrap();
        assert_eq!(hit.id.as_str(), "a");

        // Outside every radius
        assert!(store.nearest_within(Point::new(200.0, 100.0), 40.0).is_none());
    }

    #[test]
    fn nearest_picks_closest() {
        let store = store_with(&[("far", 0.0, 0.0, 100.0), ("near", 30.0, 0.0, 100.0)]);
        let hit = store.nearest_within(Point::new(25.0, 0.0), 100.0).unwrap();
        assert_eq!(hit.id.as_str(), "near");
    }

    #[test]
    fn per_point_radius_caps_search() {
        // Point has a tight radius even though the search radius is wide
        let store = store_with(&[("tight", 0.0, 0.0, 5.0)]);
        assert!(store.nearest_within(Point::new(10.0, 0.0), 100.0).is_none());
        assert!(store.nearest_within(Point::new(3.0, 0.0), 100.0).is_some());
    }

    #[test]
    fn add_replaces_same_id() {
        let mut store = store_with(&[("a", 1.0, 1.0, 10.0)]);
        store.add(SnapPoint::new("a", 9.0, 9.0, 10.0).unwrap()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().unwrap().x, 9.0);
    }

    #[test]
    fn capacity_enforced() {
        let mut store = SnapPoints::new();
        for i in 0..MAX_SNAP_POINTS {
            let mut id = heapless::String::<15>::new();
            let _ = core::fmt::write(&mut id, format_args!("p{}", i));
            store
                .add(SnapPoint::new(&id, i as f32, 0.0, 10.0).unwrap())
                .unwrap();
        }
        let overflow = store.add(SnapPoint::new("extra", 0.0, 0.0, 10.0).unwrap());
        assert_eq!(
            overflow,
            Err(GestureError::SnapCapacityExceeded {
                capacity: MAX_SNAP_POINTS
            })
        );
    }

    #[test]
    fn remove_and_clear() {
        let mut store = store_with(&[("a", 0.0, 0.0, 10.0), ("b", 5.0, 0.0, 10.0)]);
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.len(), 1);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn extrapolation_decays_with_horizon() {
        let v = Velocity::from_components(600.0, 0.0);
        let start = Point::new(0.0, 0.0);

        let short = extrapolate_end_position(start, v, 0.05, 0.95);
        let long = extrapolate_end_position(start, v, 0.2, 0.95);

        // Both move rightward
        assert!(short.x > 0.0);
        assert!(long.x > short.x);

        // Friction caps the reach well below the undamped projection
        assert!(long.x < 600.0 * 0.2);
    }

    #[test]
    fn extrapolation_zero_horizon() {
        let v = Velocity::from_components(600.0, 0.0);
        let p = Point::new(42.0, 7.0);
        assert_eq!(extrapolate_end_position(p, v, 0.0, 0.95), p);
    }
}
