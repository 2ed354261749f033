use super::*;

const FRAME_NANOS: u64 = 16_666_667; // ~60 FPS

#[test]
fn easing_endpoints_are_exact() {
    for easing in [
        Easing::LinearEasing,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowInEasing,
        Easing::LinearOutSlowInEasing,
        Easing::FastOutLinearEasing,
    ] {
        assert_eq!(easing.transform(0.0), 0.0);
        assert_eq!(easing.transform(1.0), 1.0);
    }
}

#[test]
fn easing_is_monotonic_for_material_curves() {
    let mut prev = 0.0;
    for i in 0..=100 {
        let value = Easing::FastOutSlowInEasing.transform(i as f32 / 100.0);
        assert!(value >= prev - 1e-4, "easing regressed at step {}", i);
        prev = value;
    }
}

#[test]
fn tween_reaches_target_at_duration() {
    let mut anim = TargetAnimation::new(0.0, 200.0, MotionSpec::Tween(TweenSpec::linear(100)));

    anim.tick(0);
    assert!(!anim.is_finished());

    let mid = anim.tick(50_000_000);
    assert!(mid > 0.0 && mid < 200.0, "midpoint out of range: {}", mid);

    let end = anim.tick(100_000_000);
    assert_eq!(end, 200.0);
    assert!(anim.is_finished());
}

#[test]
fn tween_interpolates_linearly() {
    let mut anim = TargetAnimation::new(100.0, 300.0, MotionSpec::Tween(TweenSpec::linear(200)));
    anim.tick(0);
    let half = anim.tick(100_000_000);
    assert!((half - 200.0).abs() < 1.0, "expected ~200, got {}", half);
}

#[test]
fn spring_settles_at_target() {
    let mut anim = TargetAnimation::new(0.0, 400.0, MotionSpec::Spring(SpringSpec::default()));

    let mut frame_time = 0u64;
    let mut saw_midpoint = false;
    for _ in 0..240 {
        frame_time += FRAME_NANOS;
        let value = anim.tick(frame_time);
        if value > 0.0 && value < 400.0 {
            saw_midpoint = true;
        }
        if anim.is_finished() {
            break;
        }
    }

    assert!(saw_midpoint, "spring should report intermediate values");
    assert!(anim.is_finished(), "spring should settle within four seconds");
    assert_eq!(anim.value(), 400.0);
}

#[test]
fn zero_distance_animation_is_finished_immediately() {
    let anim = TargetAnimation::new(50.0, 50.0, MotionSpec::default());
    assert!(anim.is_finished());
    assert_eq!(anim.value(), 50.0);
}

#[test]
fn first_tick_latches_start_time() {
    let mut anim = TargetAnimation::new(0.0, 100.0, MotionSpec::Tween(TweenSpec::linear(100)));

    // Driven with a large absolute frame time: elapsed must count from the
    // first observed frame, not from zero.
    let value = anim.tick(5_000_000_000);
    assert_eq!(value, 0.0);

    let end = anim.tick(5_100_000_000);
    assert_eq!(end, 100.0);
    assert!(anim.is_finished());
}
