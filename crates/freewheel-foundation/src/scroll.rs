//! Per-axis scroll state.
//!
//! `AxisState` holds one axis's offset and bound. Every mutation funnels
//! through [`AxisState::dispatch_raw_delta`] / [`AxisState::scroll_to`] so
//! clamping and consumed-delta reporting are uniform whether the caller is a
//! drag frame, a decay frame, or application code.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use freewheel_animation::{DecayCurve, MotionSpec};
use freewheel_core::FrameClock;

use crate::motion;

/// Deltas smaller than this are not applied, avoiding callback churn from
/// rounding residue.
const DELTA_EPSILON: f32 = 0.001;

/// State for one scrollable axis.
///
/// Cloning is shallow: clones share the same offset, bound, and operation
/// generation.
#[derive(Clone)]
pub struct AxisState {
    inner: Rc<AxisStateInner>,
}

struct AxisStateInner {
    /// Current offset in pixels, always within `[0, max]` once max is known.
    value: Cell<f32>,
    /// Upper bound; `None` until the host's first layout report, which reads
    /// as unbounded for clamping.
    max_value: Cell<Option<f32>>,
    /// Identity of the operation currently allowed to drive this axis.
    /// Frame-driven motion checks it each frame and stops when superseded.
    generation: Cell<u64>,
    /// Host callbacks invalidated whenever the offset changes.
    change_callbacks: RefCell<HashMap<u64, Box<dyn Fn()>>>,
}

impl Default for AxisState {
    fn default() -> Self {
        AxisState::new(0.0)
    }
}

impl AxisState {
    pub fn new(initial: f32) -> Self {
        Self {
            inner: Rc::new(AxisStateInner {
                value: Cell::new(initial.max(0.0)),
                max_value: Cell::new(None),
                generation: Cell::new(0),
                change_callbacks: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Current offset in pixels.
    pub fn value(&self) -> f32 {
        self.inner.value.get()
    }

    /// Maximum offset, or `None` while layout has not reported extents yet.
    pub fn max_value(&self) -> Option<f32> {
        self.inner.max_value.get()
    }

    /// Updates the bound from the host layout pass. A shrinking bound
    /// re-clamps the current offset immediately.
    pub fn set_max_value(&self, max: f32) {
        if max < 0.0 {
            log::warn!("negative scroll bound {} clamped to 0", max);
        }
        let max = max.max(0.0);
        self.inner.max_value.set(Some(max));

        let value = self.inner.value.get();
        if value > max {
            self.inner.value.set(max);
            self.notify_changed();
        }
    }

    /// Applies `delta` to the offset, clamped to the bound, and returns the
    /// signed amount actually applied. This is the single raw write path for
    /// drag frames, animation frames, and decay frames; it does not claim
    /// the axis.
    pub fn dispatch_raw_delta(&self, delta: f32) -> f32 {
        let current = self.inner.value.get();
        let upper = self.inner.max_value.get().unwrap_or(f32::INFINITY);
        let new_value = (current + delta).clamp(0.0, upper);
        let consumed = new_value - current;

        if consumed.abs() > DELTA_EPSILON {
            self.inner.value.set(new_value);
            self.notify_changed();
        }

        consumed
    }

    /// Jumps to `target` instantly, cancelling any in-flight motion on this
    /// axis. Returns the signed consumed delta, which falls short of the
    /// request at the bounds.
    pub fn scroll_to(&self, target: f32) -> f32 {
        self.claim_generation();

        let current = self.inner.value.get();
        let upper = self.inner.max_value.get().unwrap_or(f32::INFINITY);
        let new_value = target.clamp(0.0, upper);
        let consumed = new_value - current;

        if consumed.abs() > DELTA_EPSILON {
            self.inner.value.set(new_value);
            self.notify_changed();
        }

        consumed
    }

    /// Applies `delta` instantly as a fresh operation (cancels in-flight
    /// motion first). Returns the consumed delta.
    pub fn scroll_by(&self, delta: f32) -> f32 {
        self.claim_generation();
        self.dispatch_raw_delta(delta)
    }

    /// Cancels any in-flight motion without moving.
    pub fn interrupt(&self) {
        self.claim_generation();
    }

    /// Animates toward `target` (clamped at launch) on the given clock.
    /// `on_end` receives the total consumed delta; it also fires if the run
    /// is superseded by a newer operation.
    pub fn animate_to(
        &self,
        target: f32,
        spec: MotionSpec,
        clock: &FrameClock,
        on_end: impl FnOnce(f32) + 'static,
    ) {
        motion::animate_axis_to(self, target, spec, clock, Box::new(on_end));
    }

    /// Launches an inertial decay run from `initial_velocity` (px/sec).
    /// No-op below [`crate::MIN_FLING_VELOCITY`]; terminates early when the
    /// axis hits a bound.
    pub fn fling(
        &self,
        initial_velocity: f32,
        curve: Rc<dyn DecayCurve>,
        clock: &FrameClock,
        on_end: impl FnOnce() + 'static,
    ) {
        motion::fling_axis(self, initial_velocity, curve, clock, Box::new(on_end));
    }

    /// Registers a host callback fired whenever the offset changes, returning
    /// its id.
    pub fn add_change_callback(&self, callback: Box<dyn Fn()>) -> u64 {
        static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed);
        self.inner.change_callbacks.borrow_mut().insert(id, callback);
        id
    }

    pub fn remove_change_callback(&self, id: u64) {
        self.inner.change_callbacks.borrow_mut().remove(&id);
    }

    /// Claims the axis for a new operation, invalidating every older one.
    pub(crate) fn claim_generation(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.get() == generation
    }

    fn notify_changed(&self) {
        for callback in self.inner.change_callbacks.borrow().values() {
            callback();
        }
    }
}
