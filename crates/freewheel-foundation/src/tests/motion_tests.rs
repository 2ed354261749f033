use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use freewheel_animation::{ExponentialDecay, MotionSpec, SplineDecay, TweenSpec};
use freewheel_core::{DefaultScheduler, Runtime};

use crate::scroll::AxisState;

const FRAME_NANOS: u64 = 16_666_667;

fn runtime() -> Runtime {
    Runtime::new(Arc::new(DefaultScheduler))
}

/// Pumps frames until no driver is armed, returning the frame count.
fn pump_until_idle(runtime: &Runtime, max_frames: u32) -> u32 {
    let mut frames = 0;
    let mut frame_time = 0u64;
    while runtime.needs_frame() {
        frames += 1;
        assert!(frames <= max_frames, "motion did not settle within {} frames", max_frames);
        frame_time += FRAME_NANOS;
        runtime.drain_frame_callbacks(frame_time);
    }
    frames
}

#[test]
fn animate_to_reaches_target_and_reports_consumed() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(0.0);
    axis.set_max_value(400.0);

    let consumed = Rc::new(Cell::new(None));
    let consumed_slot = Rc::clone(&consumed);
    axis.animate_to(
        250.0,
        MotionSpec::Tween(TweenSpec::linear(120)),
        &clock,
        move |total| consumed_slot.set(Some(total)),
    );

    pump_until_idle(&runtime, 60);

    assert!((axis.value() - 250.0).abs() < 0.01);
    let total = consumed.get().expect("animation should end");
    assert!((total - 250.0).abs() < 0.01, "consumed {}", total);
}

#[test]
fn animate_to_clamps_target_at_launch() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(50.0);
    axis.set_max_value(100.0);

    let consumed = Rc::new(Cell::new(None));
    let consumed_slot = Rc::clone(&consumed);
    axis.animate_to(
        900.0,
        MotionSpec::Tween(TweenSpec::linear(100)),
        &clock,
        move |total| consumed_slot.set(Some(total)),
    );

    pump_until_idle(&runtime, 60);

    assert!((axis.value() - 100.0).abs() < 0.01);
    let total = consumed.get().expect("animation should end");
    assert!((total - 50.0).abs() < 0.01, "consumed {}", total);
}

#[test]
fn animate_to_current_position_ends_immediately() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(70.0);
    axis.set_max_value(100.0);

    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);
    axis.animate_to(70.0, MotionSpec::default(), &clock, move |_| {
        ended_slot.set(true)
    });

    assert!(ended.get());
    assert!(!runtime.needs_frame());
}

#[test]
fn instant_scroll_supersedes_running_animation() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(0.0);
    axis.set_max_value(400.0);

    axis.animate_to(
        300.0,
        MotionSpec::Tween(TweenSpec::linear(200)),
        &clock,
        |_| {},
    );

    // A few frames in, a programmatic jump claims the axis.
    runtime.drain_frame_callbacks(FRAME_NANOS);
    runtime.drain_frame_callbacks(2 * FRAME_NANOS);
    axis.scroll_to(50.0);

    pump_until_idle(&runtime, 10);
    assert_eq!(axis.value(), 50.0);
}

#[test]
fn superseded_animation_still_resolves_its_callback() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(0.0);
    axis.set_max_value(400.0);

    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);
    axis.animate_to(
        300.0,
        MotionSpec::Tween(TweenSpec::linear(200)),
        &clock,
        move |_| ended_slot.set(true),
    );

    runtime.drain_frame_callbacks(FRAME_NANOS);
    axis.scroll_to(50.0);
    pump_until_idle(&runtime, 10);

    assert!(ended.get());
}

#[test]
fn fling_terminates_early_at_bound() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(90.0);
    axis.set_max_value(100.0);

    let curve = SplineDecay::new(1.0);
    let natural_duration_ms = {
        use freewheel_animation::DecayCurve;
        curve.duration_ms(3000.0)
    };
    let natural_frames = (natural_duration_ms as u64 * 1_000_000 / FRAME_NANOS) as u32;

    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);
    axis.fling(3000.0, Rc::new(curve), &clock, move || ended_slot.set(true));

    let frames = pump_until_idle(&runtime, natural_frames + 10);

    assert_eq!(axis.value(), 100.0);
    assert!(ended.get());
    assert!(
        frames < natural_frames / 2,
        "expected early termination, used {} of {} frames",
        frames,
        natural_frames
    );
}

#[test]
fn fling_runs_curve_to_rest_in_open_space() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(0.0);
    axis.set_max_value(100_000.0);

    axis.fling(2000.0, Rc::new(ExponentialDecay::default()), &clock, || {});
    pump_until_idle(&runtime, 1000);

    // Exponential decay covers v0 / lambda pixels in total.
    let expected = 2000.0 / 4.2;
    assert!(
        (axis.value() - expected).abs() < 5.0,
        "expected ~{}, got {}",
        expected,
        axis.value()
    );
}

#[test]
fn below_threshold_fling_is_a_no_op() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(40.0);
    axis.set_max_value(100.0);

    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);
    // 50 px/sec is 0.05 px/ms, below the 0.1 px/ms launch threshold.
    axis.fling(50.0, Rc::new(SplineDecay::new(1.0)), &clock, move || {
        ended_slot.set(true)
    });

    assert!(ended.get());
    assert!(!runtime.needs_frame());
    assert_eq!(axis.value(), 40.0);
}

#[test]
fn below_threshold_fling_does_not_cancel_running_motion() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(0.0);
    axis.set_max_value(400.0);

    axis.animate_to(
        200.0,
        MotionSpec::Tween(TweenSpec::linear(100)),
        &clock,
        |_| {},
    );
    axis.fling(50.0, Rc::new(SplineDecay::new(1.0)), &clock, || {});

    pump_until_idle(&runtime, 60);
    assert!((axis.value() - 200.0).abs() < 0.01);
}

#[test]
fn new_fling_supersedes_running_fling() {
    let runtime = runtime();
    let clock = runtime.handle().frame_clock();

    let axis = AxisState::new(500.0);
    axis.set_max_value(10_000.0);

    axis.fling(4000.0, Rc::new(ExponentialDecay::default()), &clock, || {});
    runtime.drain_frame_callbacks(FRAME_NANOS);
    runtime.drain_frame_callbacks(2 * FRAME_NANOS);
    let after_first_frames = axis.value();

    // Opposite-direction fling claims the axis; the first run must stop.
    axis.fling(-4000.0, Rc::new(ExponentialDecay::default()), &clock, || {});
    pump_until_idle(&runtime, 1000);

    assert!(
        axis.value() < after_first_frames,
        "second fling should pull the axis back, got {} after {}",
        axis.value(),
        after_first_frames
    );
}
