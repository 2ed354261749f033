//! End-to-end pipeline: layout report, diagonal drag, concurrent two-axis
//! fling, then an animated return — all through the public API.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use freewheel_animation::{MotionSpec, TweenSpec};
use freewheel_core::{DefaultScheduler, Runtime};
use freewheel_foundation::{
    DragChange, FreeScrollConfig, FreeScrollNode, FreeScrollState, Offset, Point, Size,
};

const FRAME_NANOS: u64 = 16_666_667;

#[test]
fn drag_fling_and_animated_return() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let state = FreeScrollState::new();
    state.update_bounds(Size::new(2000.0, 2000.0), Size::new(400.0, 400.0));
    let node = FreeScrollNode::new(state.clone(), FreeScrollConfig::default(), runtime.handle());

    // Diagonal drag: ten 10 ms steps of (-5, -5), finger pinned to content.
    node.on_drag_start();
    for step in 1..=10i64 {
        node.on_drag(&DragChange::new(
            step * 10,
            Point::new(200.0, 200.0),
            Offset::new(-5.0, -5.0),
        ));
    }
    assert_eq!(state.x_value(), 50.0);
    assert_eq!(state.y_value(), 50.0);

    node.on_drag_end();
    assert!(runtime.needs_frame(), "release at speed must fling");

    // Both axes must decay together, not one after the other.
    let mut frame_time = 0u64;
    let mut frames = 0;
    let mut both_moving = false;
    while runtime.needs_frame() {
        frames += 1;
        assert!(frames < 400, "fling did not settle");
        frame_time += FRAME_NANOS;
        runtime.drain_frame_callbacks(frame_time);

        let x = state.x_value();
        let y = state.y_value();
        if x > 51.0 && y > 51.0 && runtime.needs_frame() {
            both_moving = true;
        }
    }
    assert!(both_moving, "axes should fling simultaneously");

    let rest = (state.x_value(), state.y_value());
    assert!(rest.0 > 55.0 && rest.1 > 55.0);
    assert!(rest.0 <= 1600.0 && rest.1 <= 1600.0);

    // Animated return to the origin resolves once both axes are done.
    let finished = Rc::new(Cell::new(None));
    let finished_slot = Rc::clone(&finished);
    let clock = runtime.handle().frame_clock();
    state.animate_scroll_to(
        0.0,
        0.0,
        MotionSpec::Tween(TweenSpec::default()),
        &clock,
        move |consumed| finished_slot.set(Some(consumed)),
    );

    while runtime.needs_frame() {
        frames += 1;
        assert!(frames < 800, "return animation did not settle");
        frame_time += FRAME_NANOS;
        runtime.drain_frame_callbacks(frame_time);
    }

    assert!(state.x_value().abs() < 0.01);
    assert!(state.y_value().abs() < 0.01);

    let consumed = finished.get().expect("compound completion fires");
    assert!((consumed.x + rest.0).abs() < 0.01);
    assert!((consumed.y + rest.1).abs() < 0.01);
}
