//! Gesture Latency Bypasser
//!
//! ## Overview
//!
//! The bypasser routes touch input straight to visual feedback, skipping the
//! host's full event-dispatch and layout path. Touch handlers update gesture
//! state and apply a style transform synchronously inside the handler;
//! momentum continues the motion after release through the host's frame
//! callback.
//!
//! ```text
//!  touch events          frame callbacks
//!       │                      │
//!       ▼                      ▼
//!  ┌─────────────────────────────────┐
//!  │          GestureBypasser        │
//!  │  state ── velocity ── momentum  │
//!  └───────┬─────────────────┬───────┘
//!          │ StyleUpdate     │ request/cancel
//!          ▼                 ▼
//!      StyleSink        FrameScheduler
//! ```
//!
//! ## Host Seams
//!
//! Two traits decouple the engine from any particular host:
//!
//! - [`StyleSink`] receives transform updates; on a web host this is an
//!   element's transform style plus capture-phase listener management, in
//!   tests a recording mock
//! - [`FrameScheduler`] requests animation frames for the momentum loop;
//!   the bypasser keeps at most one request outstanding
//!
//! ## Lifecycle Invariants
//!
//! - Gesture class (pan vs pinch) is fixed at touch-start and never changes
//!   mid-gesture, even when the touch count does
//! - Moves arriving without an active gesture are dropped silently and
//!   counted, never processed
//! - Gesture state survives release while momentum glides and is cleared
//!   only when momentum settles (or immediately when no momentum starts)
//! - Detach cancels momentum *before* releasing the sink, so no style
//!   update can fire against a released sink
//! - Re-attaching releases the previous sink first; a bypasser holds at
//!   most one capture at a time

use crate::buffer::SampleBuffer;
use crate::config::BypassConfig;
use crate::constants::{FRAMES_PER_SECOND, VELOCITY_SAMPLE_CAPACITY};
use crate::events::{GestureState, GestureType, Point, TouchEvent, TouchSample, Vec2};
use crate::geometry::{angle_deg, distance, window_velocity, Velocity};
use crate::metrics::BypassMetrics;
use crate::snap::{extrapolate_end_position, SnapPoint, SnapPoints};
use crate::time::{MonotonicTime, TimeSource};

/// Options the bypasser passes to a sink when it begins capturing input.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Register listeners as passive (host never waits on the handler)
    pub passive: bool,
}

/// One visual transform snapshot, applied as a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleUpdate {
    /// Accumulated translation since gesture start, pixels
    pub translate: Vec2,
    /// Scale factor relative to gesture start (1.0 = unchanged)
    pub scale: f32,
    /// Rotation relative to gesture start, degrees
    pub rotation_deg: f32,
}

/// Receiver of synchronous style updates.
///
/// `begin_capture` / `end_capture` bracket the period the bypasser owns the
/// sink; `apply` is called from inside touch handlers and momentum frames
/// and must not block.
pub trait StyleSink {
    /// The bypasser is taking ownership of this sink's input.
    fn begin_capture(&mut self, options: CaptureOptions);

    /// Apply a transform snapshot. Called synchronously on the touch path.
    fn apply(&mut self, update: &StyleUpdate);

    /// The bypasser is releasing the sink (detach, or replacement by a
    /// newer attach).
    fn end_capture(&mut self);
}

/// Frame callback scheduling for the momentum loop.
///
/// The bypasser guarantees at most one outstanding request; the host calls
/// [`GestureBypasser::on_frame`] when the frame fires.
pub trait FrameScheduler {
    /// Request one frame callback.
    fn request_frame(&mut self);

    /// Cancel the outstanding request, if any.
    fn cancel_frame(&mut self);
}

/// In-memory scheduler for tests and headless hosts.
///
/// Records requests; the driver checks [`has_pending`](Self::has_pending)
/// and calls `on_frame` itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    /// Total frames requested over the scheduler's lifetime
    pub requests: u32,
}

impl ManualScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame request is outstanding.
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Consume the outstanding request before driving a frame.
    pub fn take_pending(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }
}

/// Predicted gesture end position, resolved against snap points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndPrediction {
    /// Predicted settle position
    pub position: Point,
    /// Prediction confidence; higher when a snap point captures the end
    pub confidence: f32,
    /// Whether a snap point captured the prediction
    pub snapped: bool,
}

/// Geometry of a pinch at gesture start, the reference for scale/rotation.
#[derive(Debug, Clone, Copy)]
struct PinchRef {
    distance: f32,
    angle_deg: f32,
}

/// Touch-to-style bypass engine with momentum physics and snap points.
///
/// Generic over the style sink `S`, the frame scheduler `F` and the latency
/// clock `C` (defaulting to [`MonotonicTime`]). Single-threaded by design:
/// the host delivers events and frames from one loop, so no interior locking
/// exists anywhere on the touch path.
pub struct GestureBypasser<S, F, C = MonotonicTime>
where
    S: StyleSink,
    F: FrameScheduler,
    C: TimeSource,
{
    config: BypassConfig,
    sink: Option<S>,
    scheduler: F,
    clock: C,
    state: GestureState,
    samples: SampleBuffer<VELOCITY_SAMPLE_CAPACITY>,
    pinch_ref: Option<PinchRef>,
    momentum: Option<Vec2>,
    frame_pending: bool,
    snaps: SnapPoints,
    predicted_end: Option<EndPrediction>,
    metrics: BypassMetrics,
}

impl<S, F> GestureBypasser<S, F, MonotonicTime>
where
    S: StyleSink,
    F: FrameScheduler,
{
    /// Create a bypasser with the default monotonic latency clock.
    pub fn new(config: BypassConfig, scheduler: F) -> Self {
        Self::with_clock(config, scheduler, MonotonicTime::new())
    }
}

impl<S, F, C> GestureBypasser<S, F, C>
where
    S: StyleSink,
    F: FrameScheduler,
    C: TimeSource,
{
    /// Create a bypasser with an explicit latency clock.
    pub fn with_clock(config: BypassConfig, scheduler: F, clock: C) -> Self {
        let mut snaps = SnapPoints::new();
        for point in config.snap_points.iter() {
            // Config capacity equals snap capacity, so this cannot overflow
            let _ = snaps.add(*point);
        }

        Self {
            config,
            sink: None,
            scheduler,
            clock,
            state: GestureState::idle(),
            samples: SampleBuffer::new(),
            pinch_ref: None,
            momentum: None,
            frame_pending: false,
            snaps,
            predicted_end: None,
            metrics: BypassMetrics::default(),
        }
    }

    /// Take ownership of a sink, releasing any previously attached one
    /// first. Any gesture or momentum running against the old sink is
    /// cancelled before the handover.
    pub fn attach(&mut self, mut sink: S) {
        self.detach();
        sink.begin_capture(CaptureOptions {
            passive: self.config.passive_listeners,
        });
        self.sink = Some(sink);
    }

    /// Release the current sink, if any. Idempotent.
    ///
    /// Momentum is stopped before the sink is released so no style update
    /// can land after `end_capture`.
    pub fn detach(&mut self) -> Option<S> {
        self.stop_momentum();
        self.state = GestureState::idle();
        self.samples.clear();
        self.pinch_ref = None;
        self.predicted_end = None;

        let mut sink = self.sink.take()?;
        sink.end_capture();
        Some(sink)
    }

    /// Handle a touch-down event.
    ///
    /// Starts a gesture when the event's class passes the configured mask;
    /// any running momentum is interrupted (the user grabbed the glide).
    /// While a gesture is active, further touch-downs only update the touch
    /// count; class, anchor and delta stay fixed.
    pub fn on_touch_start(&mut self, event: &TouchEvent) {
        if self.sink.is_none() {
            return;
        }
        self.stop_momentum();

        let Some(first) = event.first_touch() else {
            return;
        };

        if self.state.is_active {
            // Additional fingers join the gesture; class, anchor and
            // accumulated delta are fixed for the gesture's lifetime
            self.state.touch_count = event.touches.len();
            return;
        }

        let gesture = if event.touches.len() >= 2 {
            GestureType::Pinch
        } else {
            GestureType::Pan
        };
        if !self.config.gestures.allows(gesture) {
            gk_trace!("gesture {:?} filtered by mask", gesture);
            self.state = GestureState::idle();
            return;
        }

        let start = first.position();
        self.state = GestureState {
            is_active: true,
            gesture,
            start_position: start,
            current_position: start,
            delta: Vec2::ZERO,
            scale: 1.0,
            rotation_deg: 0.0,
            velocity: Velocity::ZERO,
            touch_count: event.touches.len(),
        };

        self.pinch_ref = match (gesture, event.touches.first(), event.touches.get(1)) {
            (GestureType::Pinch, Some(a), Some(b)) => Some(PinchRef {
                distance: distance(a.position(), b.position()),
                angle_deg: angle_deg(a.position(), b.position()),
            }),
            _ => None,
        };

        self.samples.clear();
        self.samples
            .push(TouchSample::new(start, event.timestamp, first.id));
        self.predicted_end = None;
    }

    /// Handle a touch-move event.
    ///
    /// Updates gesture state and applies the style transform synchronously.
    /// Moves without an active gesture are dropped and counted.
    pub fn on_touch_move(&mut self, event: &TouchEvent) {
        if !self.state.is_active {
            self.metrics.moves_ignored += 1;
            gk_trace!("move ignored: no active gesture");
            return;
        }
        let Some(first) = event.first_touch() else {
            return;
        };

        let current = first.position();
        self.state.current_position = current;
        self.state.delta = current.offset_from(self.state.start_position);
        self.state.touch_count = event.touches.len();

        if self.state.gesture == GestureType::Pinch {
            if let (Some(reference), Some(a), Some(b)) =
                (self.pinch_ref, event.touches.first(), event.touches.get(1))
            {
                let d = distance(a.position(), b.position());
                if reference.distance > 0.0 {
                    self.state.scale = d / reference.distance;
                }
                self.state.rotation_deg =
                    angle_deg(a.position(), b.position()) - reference.angle_deg;
            }
        }

        if self.config.track_velocity {
            self.samples
                .push(TouchSample::new(current, event.timestamp, first.id));
            self.state.velocity = window_velocity(&self.samples, self.config.velocity_samples);
        }

        self.apply_style_update();

        if self.config.enable_prediction && self.samples.len() >= 2 {
            let free_end = extrapolate_end_position(
                current,
                self.state.velocity,
                self.config.prediction_horizon_ms as f32 / 1000.0,
                self.config.momentum_friction,
            );
            self.predicted_end = Some(self.resolve_end_prediction(free_end));
        }
    }

    /// Handle a touch-up event.
    ///
    /// The gesture resolves once all touches lift: momentum starts when the
    /// release velocity clears the threshold, otherwise the state clears
    /// immediately.
    pub fn on_touch_end(&mut self, event: &TouchEvent) {
        if !self.state.is_active {
            return;
        }

        if !event.touches.is_empty() {
            // Contacts remain; the gesture continues with its class fixed
            self.state.touch_count = event.touches.len();
            return;
        }

        self.state.is_active = false;
        self.metrics.gestures_processed += 1;

        let launch = self.config.enable_momentum
            && self.state.velocity.speed > self.config.momentum_threshold;

        if launch {
            self.momentum = Some(Vec2::new(self.state.velocity.vx, self.state.velocity.vy));
            self.request_frame();
        } else {
            self.settle();
        }
    }

    /// Handle a touch-cancel event. Shares the touch-end path: the host
    /// wires both callbacks to the same resolution logic.
    pub fn on_touch_cancel(&mut self, event: &TouchEvent) {
        self.on_touch_end(event);
    }

    /// Advance the momentum simulation by one fixed 1/60 s step.
    ///
    /// The host calls this from its frame callback. Velocity decays by the
    /// friction factor, the delta advances by `v / 60`, and a style update
    /// fires. Below the velocity threshold the glide settles, resolving
    /// against snap points. Hosts running at other refresh rates should use
    /// [`on_frame_dt`](Self::on_frame_dt) with the measured frame delta.
    pub fn on_frame(&mut self) {
        self.on_frame_dt(1.0 / FRAMES_PER_SECOND);
    }

    /// Frame-delta-corrected momentum step.
    ///
    /// The friction constant is calibrated per 60 fps-equivalent frame, so
    /// a `dt_s` of one real frame at 120 Hz applies half a frame's worth of
    /// decay. Non-positive deltas are ignored.
    pub fn on_frame_dt(&mut self, dt_s: f32) {
        self.frame_pending = false;
        let Some(mut v) = self.momentum else {
            return;
        };
        if dt_s <= 0.0 {
            self.request_frame();
            return;
        }

        let decay = libm::powf(self.config.momentum_friction, dt_s * FRAMES_PER_SECOND);
        v.x *= decay;
        v.y *= decay;
        let speed = libm::sqrtf(v.x * v.x + v.y * v.y);

        if speed < self.config.momentum_threshold {
            self.momentum = None;
            self.settle();
            return;
        }

        self.state.delta.x += v.x * dt_s;
        self.state.delta.y += v.y * dt_s;
        self.state.current_position = self.state.start_position.translate(self.state.delta);
        self.momentum = Some(v);

        self.apply_style_update();
        self.metrics.momentum_frames += 1;
        self.request_frame();
    }

    /// Abort the current gesture and any momentum, clearing state without a
    /// final style update.
    pub fn cancel_gesture(&mut self) {
        self.stop_momentum();
        self.state = GestureState::idle();
        self.samples.clear();
        self.pinch_ref = None;
        self.predicted_end = None;
    }

    /// Stop the momentum glide, cancelling the outstanding frame request.
    pub fn stop_momentum(&mut self) {
        self.momentum = None;
        if self.frame_pending {
            self.scheduler.cancel_frame();
            self.frame_pending = false;
        }
    }

    /// Register a snap point, replacing any existing point with the same id.
    pub fn add_snap_point(&mut self, point: SnapPoint) -> crate::errors::GestureResult<()> {
        self.snaps.add(point)
    }

    /// Remove a snap point by id. Returns whether one was removed.
    pub fn remove_snap_point(&mut self, id: &str) -> bool {
        self.snaps.remove(id)
    }

    /// Remove all snap points.
    pub fn clear_snap_points(&mut self) {
        self.snaps.clear();
    }

    /// Current gesture state snapshot.
    pub fn gesture(&self) -> &GestureState {
        &self.state
    }

    /// Whether a momentum glide is in progress.
    pub fn is_momentum_active(&self) -> bool {
        self.momentum.is_some()
    }

    /// Predicted settle position from the latest move, when prediction is
    /// enabled.
    pub fn predicted_end(&self) -> Option<EndPrediction> {
        self.predicted_end
    }

    /// Metrics snapshot.
    pub fn metrics(&self) -> &BypassMetrics {
        &self.metrics
    }

    /// Reset counters and the latency window.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Active configuration.
    pub fn config(&self) -> &BypassConfig {
        &self.config
    }

    /// Scheduler access for hosts that drive frames through the bypasser.
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Fold snap points into a free end-position estimate. A capturing
    /// snap point raises the confidence: the gesture will land there.
    fn resolve_end_prediction(&self, free_end: Point) -> EndPrediction {
        if self.config.enable_snap_points {
            if let Some(snap) = self.snaps.nearest_within(free_end, self.config.snap_radius) {
                return EndPrediction {
                    position: snap.position(),
                    confidence: crate::constants::SNAPPED_PREDICTION_CONFIDENCE,
                    snapped: true,
                };
            }
        }
        EndPrediction {
            position: free_end,
            confidence: crate::constants::END_PREDICTION_CONFIDENCE,
            snapped: false,
        }
    }

    /// Finish a gesture: resolve snap points, emit the final update if a
    /// snap landed, then clear state back to idle.
    fn settle(&mut self) {
        if self.config.enable_snap_points {
            if let Some(snap) = self
                .snaps
                .nearest_within(self.state.current_position, self.config.snap_radius)
            {
                let target = snap.position();
                self.state.current_position = target;
                self.state.delta = target.offset_from(self.state.start_position);
                self.apply_style_update();
                self.metrics.snaps_triggered += 1;
            }
        }

        self.state = GestureState::idle();
        self.samples.clear();
        self.pinch_ref = None;
        self.predicted_end = None;
    }

    /// Push the current transform to the sink, measuring callback latency.
    fn apply_style_update(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let update = StyleUpdate {
            translate: self.state.delta,
            scale: self.state.scale,
            rotation_deg: self.state.rotation_deg,
        };

        let before = self.clock.now_micros();
        sink.apply(&update);
        let after = self.clock.now_micros();

        self.metrics.record_latency(after.saturating_sub(before) as f32 / 1_000.0);
        self.metrics.bypassed_updates += 1;
    }

    fn request_frame(&mut self) {
        if !self.frame_pending {
            self.scheduler.request_frame();
            self.frame_pending = true;
        }
    }
}
