//! Frame-driven motion on a single axis.
//!
//! Two drivers, both cooperative state machines re-armed once per frame on
//! the host clock: `TargetDriver` runs an animated reposition, `DecayDriver`
//! runs an inertial fling. Each checks the axis generation every frame, so a
//! newer operation on the axis silently retires it.
//!
//! A driver is kept alive by its own pending frame callback: the closure
//! owns the driver, the driver owns the registration. When the run ends the
//! driver simply does not re-arm and the whole chain drops.

use std::cell::RefCell;
use std::rc::Rc;

use freewheel_animation::{DecayCurve, MotionSpec, TargetAnimation};
use freewheel_core::{FrameCallbackRegistration, FrameClock};

use crate::gesture_constants::MIN_FLING_VELOCITY;
use crate::scroll::AxisState;

/// Unconsumed distance (px) in one frame that counts as hitting a bound.
const BOUNDARY_EPSILON: f32 = 0.5;

/// Per-frame deltas below this are rounding residue, not motion.
const FRAME_DELTA_EPSILON: f32 = 0.001;

pub(crate) fn animate_axis_to(
    state: &AxisState,
    target: f32,
    spec: MotionSpec,
    clock: &FrameClock,
    on_end: Box<dyn FnOnce(f32)>,
) {
    let generation = state.claim_generation();

    let upper = state.max_value().unwrap_or(f32::INFINITY);
    let animation = TargetAnimation::new(state.value(), target.clamp(0.0, upper), spec);
    if animation.is_finished() {
        on_end(0.0);
        return;
    }

    let driver = Rc::new(RefCell::new(TargetDriver {
        state: state.clone(),
        generation,
        animation,
        consumed: 0.0,
        registration: None,
        on_end: Some(on_end),
    }));
    TargetDriver::schedule(&driver, clock);
}

struct TargetDriver {
    state: AxisState,
    generation: u64,
    animation: TargetAnimation,
    consumed: f32,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<Box<dyn FnOnce(f32)>>,
}

impl TargetDriver {
    fn schedule(this: &Rc<RefCell<TargetDriver>>, clock: &FrameClock) {
        let clock_for_frame = clock.clone();
        let this_for_frame = Rc::clone(this);
        let registration = clock.with_frame_nanos(move |frame_time_nanos| {
            TargetDriver::on_frame(&this_for_frame, &clock_for_frame, frame_time_nanos);
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<TargetDriver>>, clock: &FrameClock, frame_time_nanos: u64) {
        let finished = {
            let mut driver = this.borrow_mut();
            driver.registration = None;

            if !driver.state.is_current(driver.generation) {
                true
            } else {
                let previous = driver.animation.value();
                let next = driver.animation.tick(frame_time_nanos);
                let delta = next - previous;
                if delta.abs() > FRAME_DELTA_EPSILON {
                    let consumed = driver.state.dispatch_raw_delta(delta);
                    driver.consumed += consumed;
                }
                driver.animation.is_finished()
            }
        };

        if finished {
            let (on_end, consumed) = {
                let mut driver = this.borrow_mut();
                (driver.on_end.take(), driver.consumed)
            };
            if let Some(on_end) = on_end {
                on_end(consumed);
            }
        } else {
            Self::schedule(this, clock);
        }
    }
}

pub(crate) fn fling_axis(
    state: &AxisState,
    initial_velocity: f32,
    curve: Rc<dyn DecayCurve>,
    clock: &FrameClock,
    on_end: Box<dyn FnOnce()>,
) {
    if initial_velocity.abs() < MIN_FLING_VELOCITY {
        on_end();
        return;
    }

    log::trace!("fling launched at {} px/sec", initial_velocity);

    let generation = state.claim_generation();
    let driver = Rc::new(RefCell::new(DecayDriver {
        state: state.clone(),
        generation,
        curve,
        initial_velocity,
        start_time_nanos: None,
        last_displacement: 0.0,
        registration: None,
        on_end: Some(on_end),
    }));
    DecayDriver::schedule(&driver, clock);
}

struct DecayDriver {
    state: AxisState,
    generation: u64,
    curve: Rc<dyn DecayCurve>,
    /// px/sec at launch; the curve is evaluated against it every frame.
    initial_velocity: f32,
    /// Latched on the first frame so the curve runs on host frame time.
    start_time_nanos: Option<u64>,
    last_displacement: f32,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<Box<dyn FnOnce()>>,
}

impl DecayDriver {
    fn schedule(this: &Rc<RefCell<DecayDriver>>, clock: &FrameClock) {
        let clock_for_frame = clock.clone();
        let this_for_frame = Rc::clone(this);
        let registration = clock.with_frame_nanos(move |frame_time_nanos| {
            DecayDriver::on_frame(&this_for_frame, &clock_for_frame, frame_time_nanos);
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<DecayDriver>>, clock: &FrameClock, frame_time_nanos: u64) {
        let finished = {
            let mut driver = this.borrow_mut();
            driver.registration = None;

            if !driver.state.is_current(driver.generation) {
                true
            } else {
                let start = *driver.start_time_nanos.get_or_insert(frame_time_nanos);
                let play_time_ms = (frame_time_nanos.saturating_sub(start) / 1_000_000) as i64;

                let displacement = driver
                    .curve
                    .displacement_at(play_time_ms, driver.initial_velocity);
                let delta = displacement - driver.last_displacement;
                driver.last_displacement = displacement;

                let consumed = if delta.abs() > FRAME_DELTA_EPSILON {
                    driver.state.dispatch_raw_delta(delta)
                } else {
                    delta
                };

                // An unconsumed remainder means the axis is pinned at a
                // bound; running the rest of the curve would be wasted work.
                let hit_bound = (delta - consumed).abs() > BOUNDARY_EPSILON;

                let settled = play_time_ms >= driver.curve.duration_ms(driver.initial_velocity)
                    || driver
                        .curve
                        .velocity_at(play_time_ms, driver.initial_velocity)
                        .abs()
                        < driver.curve.velocity_threshold();

                hit_bound || settled
            }
        };

        if finished {
            let on_end = this.borrow_mut().on_end.take();
            if let Some(on_end) = on_end {
                on_end();
            }
        } else {
            Self::schedule(this, clock);
        }
    }
}

#[cfg(test)]
#[path = "tests/motion_tests.rs"]
mod tests;
