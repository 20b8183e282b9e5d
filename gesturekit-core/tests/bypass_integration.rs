//! End-to-end bypasser scenarios: gesture lifecycles driven through the
//! public API with a recording sink, a manual frame scheduler and a fixed
//! clock.

use gesturekit_core::{
    bypass::ManualScheduler,
    snap::SnapPoint,
    time::FixedTime,
    BypassConfig, CaptureOptions, GestureBypasser, GestureMask, StyleSink, StyleUpdate,
    TouchEvent, Vec2,
};

/// Style sink recording every applied transform and capture transition.
#[derive(Debug, Default)]
struct RecordingSink {
    captures: u32,
    releases: u32,
    passive: Option<bool>,
    applied: Vec<StyleUpdate>,
}

impl StyleSink for RecordingSink {
    fn begin_capture(&mut self, options: CaptureOptions) {
        self.captures += 1;
        self.passive = Some(options.passive);
    }

    fn apply(&mut self, update: &StyleUpdate) {
        self.applied.push(*update);
    }

    fn end_capture(&mut self) {
        self.releases += 1;
    }
}

type Bypasser = GestureBypasser<RecordingSink, ManualScheduler, FixedTime>;

fn attached(config: BypassConfig) -> Bypasser {
    let mut bypasser =
        GestureBypasser::with_clock(config, ManualScheduler::new(), FixedTime::new(0));
    bypasser.attach(RecordingSink::default());
    bypasser
}

/// Drive the momentum loop to completion, returning the frame count.
fn run_momentum(bypasser: &mut Bypasser) -> u32 {
    let mut frames = 0;
    while bypasser.scheduler_mut().take_pending() {
        bypasser.on_frame();
        frames += 1;
        assert!(frames < 2000, "momentum failed to settle");
    }
    frames
}

#[test]
fn pan_applies_delta_synchronously() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 150.0, 120.0));

    // The transform landed inside the move handler, before any frame
    assert_eq!(bypasser.metrics().bypassed_updates, 1);
    assert_eq!(bypasser.gesture().delta, Vec2::new(50.0, 20.0));

    let sink = bypasser.detach().unwrap();
    assert_eq!(sink.applied.len(), 1);
    assert_eq!(sink.applied[0].translate, Vec2::new(50.0, 20.0));
    assert_eq!(sink.applied[0].scale, 1.0);
}

#[test]
fn pinch_doubles_scale_when_contacts_spread_twofold() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(
        &TouchEvent::new(0)
            .with_touch(0, 100.0, 100.0)
            .with_touch(1, 200.0, 100.0),
    );
    bypasser.on_touch_move(
        &TouchEvent::new(16)
            .with_touch(0, 50.0, 100.0)
            .with_touch(1, 250.0, 100.0),
    );

    assert!((bypasser.gesture().scale - 2.0).abs() < 1e-5);

    let sink = bypasser.detach().unwrap();
    assert!((sink.applied[0].scale - 2.0).abs() < 1e-5);
}

#[test]
fn pinch_rotation_tracks_angle_change() {
    let mut bypasser = attached(BypassConfig::default());

    // Horizontal pair rotating to vertical: 90° in surface coordinates
    bypasser.on_touch_start(
        &TouchEvent::new(0)
            .with_touch(0, 100.0, 100.0)
            .with_touch(1, 200.0, 100.0),
    );
    bypasser.on_touch_move(
        &TouchEvent::new(16)
            .with_touch(0, 150.0, 50.0)
            .with_touch(1, 150.0, 150.0),
    );

    assert!((bypasser.gesture().rotation_deg - 90.0).abs() < 0.5);
}

#[test]
fn momentum_glides_and_settles() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 200.0, 100.0));
    bypasser.on_touch_end(&TouchEvent::new(20).with_lifted(0, 200.0, 100.0));

    assert!(bypasser.is_momentum_active());
    let frames = run_momentum(&mut bypasser);
    assert!(frames > 10);

    assert!(!bypasser.is_momentum_active());
    assert!(!bypasser.gesture().is_active);
    assert_eq!(bypasser.metrics().gestures_processed, 1);
    assert!(bypasser.metrics().momentum_frames > 0);

    // The glide carried the transform well past the release delta
    let sink = bypasser.detach().unwrap();
    let last = sink.applied.last().unwrap();
    assert!(last.translate.x > 100.0);
}

#[test]
fn momentum_decelerates_monotonically() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 0.0, 0.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 100.0, 0.0));
    bypasser.on_touch_end(&TouchEvent::new(20).with_lifted(0, 100.0, 0.0));

    run_momentum(&mut bypasser);

    let sink = bypasser.detach().unwrap();
    // Per-frame advances shrink: each successive delta step is smaller
    let steps: Vec<f32> = sink
        .applied
        .windows(2)
        .map(|w| w[1].translate.x - w[0].translate.x)
        .collect();
    assert!(steps.len() > 2);
    for pair in steps.windows(2) {
        assert!(pair[1] < pair[0] + 1e-3);
    }
}

#[test]
fn snap_point_catches_settling_gesture() {
    let config = BypassConfig::default()
        .without_momentum()
        .with_snap_points(40.0)
        .with_snap_point(SnapPoint::new("left-edge", 0.0, 100.0, 40.0).unwrap())
        .with_snap_point(SnapPoint::new("right-edge", 400.0, 100.0, 40.0).unwrap());
    let mut bypasser = attached(config);

    // Slow drag ending 30 px from the right edge
    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 300.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(200).with_touch(0, 370.0, 100.0));
    bypasser.on_touch_end(&TouchEvent::new(220).with_lifted(0, 370.0, 100.0));

    assert_eq!(bypasser.metrics().snaps_triggered, 1);
    let sink = bypasser.detach().unwrap();
    // Final transform lands exactly on the snap target
    assert_eq!(sink.applied.last().unwrap().translate, Vec2::new(100.0, 0.0));
}

#[test]
fn distant_snap_points_do_not_trigger() {
    let config = BypassConfig::default()
        .without_momentum()
        .with_snap_points(40.0)
        .with_snap_point(SnapPoint::new("far", 1000.0, 1000.0, 40.0).unwrap());
    let mut bypasser = attached(config);

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(200).with_touch(0, 110.0, 100.0));
    bypasser.on_touch_end(&TouchEvent::new(220).with_lifted(0, 110.0, 100.0));

    assert_eq!(bypasser.metrics().snaps_triggered, 0);
}

#[test]
fn latency_window_caps_at_one_hundred_samples() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 0.0, 0.0));
    for i in 1..=120u64 {
        bypasser.on_touch_move(&TouchEvent::new(16 * i).with_touch(0, i as f32, 0.0));
    }

    assert_eq!(bypasser.metrics().bypassed_updates, 120);
    assert_eq!(bypasser.metrics().latency_samples(), 100);
}

#[test]
fn moves_before_start_are_counted_not_processed() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_move(&TouchEvent::new(0).with_touch(0, 50.0, 50.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 60.0, 50.0));

    assert_eq!(bypasser.metrics().moves_ignored, 2);
    assert_eq!(bypasser.metrics().bypassed_updates, 0);

    let sink = bypasser.detach().unwrap();
    assert!(sink.applied.is_empty());
}

#[test]
fn gesture_mask_blocks_disabled_classes() {
    let mut bypasser = attached(BypassConfig::default().with_gestures(GestureMask::PINCH));

    // Single-touch pan is filtered out by the mask
    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    assert!(!bypasser.gesture().is_active);

    // Two-touch pinch passes
    bypasser.on_touch_start(
        &TouchEvent::new(100)
            .with_touch(0, 100.0, 100.0)
            .with_touch(1, 200.0, 100.0),
    );
    assert!(bypasser.gesture().is_active);
}

#[test]
fn capture_options_carry_passive_flag() {
    let mut bypasser = attached(BypassConfig::default());
    let sink = bypasser.detach().unwrap();
    assert_eq!(sink.passive, Some(true));
}

#[test]
fn reattach_releases_previous_capture() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.attach(RecordingSink::default());
    let second = bypasser.detach().unwrap();
    // The replacement sink went through exactly one capture/release cycle
    assert_eq!(second.captures, 1);
    assert_eq!(second.releases, 1);
    assert!(bypasser.detach().is_none());
}

#[test]
fn detach_during_momentum_cancels_cleanly() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 200.0, 100.0));
    bypasser.on_touch_end(&TouchEvent::new(20).with_lifted(0, 200.0, 100.0));
    assert!(bypasser.is_momentum_active());

    let sink = bypasser.detach().unwrap();
    assert!(!bypasser.is_momentum_active());
    assert!(!bypasser.scheduler_mut().has_pending());
    assert_eq!(sink.releases, 1);

    // A stray frame after detach is a no-op
    bypasser.on_frame();
    assert_eq!(bypasser.metrics().momentum_frames, 0);
}

#[test]
fn prediction_disabled_yields_no_end_estimate() {
    let mut config = BypassConfig::default();
    config.enable_prediction = false;
    let mut bypasser = attached(config);

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 200.0, 100.0));
    assert!(bypasser.predicted_end().is_none());
}

#[test]
fn scheduler_keeps_one_request_outstanding() {
    let mut bypasser = attached(BypassConfig::default());

    bypasser.on_touch_start(&TouchEvent::new(0).with_touch(0, 100.0, 100.0));
    bypasser.on_touch_move(&TouchEvent::new(16).with_touch(0, 200.0, 100.0));
    bypasser.on_touch_end(&TouchEvent::new(20).with_lifted(0, 200.0, 100.0));

    // One request per frame driven, never more
    let requests_after_launch = bypasser.scheduler_mut().requests;
    assert_eq!(requests_after_launch, 1);
    assert!(bypasser.scheduler_mut().take_pending());
    bypasser.on_frame();
    assert_eq!(bypasser.scheduler_mut().requests, 2);
}
