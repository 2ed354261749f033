//! Drag and transform gesture handling for free scrolling.
//!
//! `FreeScrollNode` sits between the host's gesture detector and a
//! [`FreeScrollState`]: move events feed the velocity tracker and apply raw
//! deltas to both axes; release reads the tracker and launches one
//! independent fling per axis.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

use freewheel_animation::{DecayCurve, SplineDecay};
use freewheel_core::{FrameClock, RuntimeHandle};

use crate::free_scroll::FreeScrollState;
use crate::geometry::{Offset, Point};
use crate::velocity_tracker::VelocityTracker;

/// One historical sub-sample of a move event.
#[derive(Clone, Copy, Debug)]
pub struct PointerSample {
    pub time_ms: i64,
    pub position: Point,
}

/// A drag move event from the host's gesture detector.
///
/// `position` is the pointer position in the gesture node's coordinate
/// space; `historical` carries any sub-frame samples batched into this
/// event, oldest first.
#[derive(Clone, Debug)]
pub struct DragChange {
    pub time_ms: i64,
    pub position: Point,
    /// Raw screen-space delta since the previous event.
    pub delta: Offset,
    pub historical: SmallVec<[PointerSample; 4]>,
}

impl DragChange {
    pub fn new(time_ms: i64, position: Point, delta: Offset) -> Self {
        Self {
            time_ms,
            position,
            delta,
            historical: SmallVec::new(),
        }
    }

    pub fn with_historical(
        mut self,
        samples: impl IntoIterator<Item = PointerSample>,
    ) -> Self {
        self.historical.extend(samples);
        self
    }
}

/// One frame of a multi-touch transform gesture.
#[derive(Clone, Copy, Debug)]
pub struct TransformChange {
    pub time_ms: i64,
    pub centroid: Point,
    /// Pan component, same screen-space convention as [`DragChange::delta`].
    pub pan: Offset,
    pub zoom: f32,
    pub rotation: f32,
    /// Set when the pointer driving the gesture changed identity (a finger
    /// lifted and another took over). Velocity tracking restarts.
    pub pointer_changed: bool,
}

/// Pass-through observer for the transform variant: `(centroid, pan, zoom,
/// rotation)` per frame.
pub type GestureCallback = Rc<dyn Fn(Point, Offset, f32, f32)>;

/// Configuration for an attached free-scroll behavior. Immutable for the
/// node's lifetime; the host re-creates the node to change it.
#[derive(Clone)]
pub struct FreeScrollConfig {
    /// When false, no pointer handling occurs at all; the state stays
    /// readable and scrollable programmatically.
    pub enabled: bool,
    /// Flips the sign mapping between drag direction and offset change.
    pub reverse_horizontal: bool,
    pub reverse_vertical: bool,
    /// Forwarded to the host's multi-touch detector, uninterpreted here.
    pub pan_zoom_lock: bool,
    /// Decay strategy for flings.
    pub fling: Rc<dyn DecayCurve>,
    pub on_gesture: Option<GestureCallback>,
}

impl Default for FreeScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reverse_horizontal: false,
            reverse_vertical: false,
            pan_zoom_lock: false,
            fling: Rc::new(SplineDecay::new(1.0)),
            on_gesture: None,
        }
    }
}

impl std::fmt::Debug for FreeScrollConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreeScrollConfig")
            .field("enabled", &self.enabled)
            .field("reverse_horizontal", &self.reverse_horizontal)
            .field("reverse_vertical", &self.reverse_vertical)
            .field("pan_zoom_lock", &self.pan_zoom_lock)
            .field("on_gesture", &self.on_gesture.is_some())
            .finish()
    }
}

/// Gesture controller driving a [`FreeScrollState`].
pub struct FreeScrollNode {
    state: FreeScrollState,
    config: FreeScrollConfig,
    clock: FrameClock,
    tracker: RefCell<VelocityTracker>,
    dragging: Cell<bool>,
}

impl FreeScrollNode {
    pub fn new(state: FreeScrollState, config: FreeScrollConfig, runtime: RuntimeHandle) -> Self {
        Self {
            state,
            config,
            clock: runtime.frame_clock(),
            tracker: RefCell::new(VelocityTracker::new()),
            dragging: Cell::new(false),
        }
    }

    pub fn state(&self) -> &FreeScrollState {
        &self.state
    }

    pub fn config(&self) -> &FreeScrollConfig {
        &self.config
    }

    /// Whether this node intercepts the pointer stream at all.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn on_drag_start(&self) {
        if !self.config.enabled {
            return;
        }
        log::trace!("drag start");
        self.begin_interaction();
    }

    pub fn on_drag(&self, change: &DragChange) {
        if !self.config.enabled || !self.dragging.get() {
            return;
        }

        {
            let mut tracker = self.tracker.borrow_mut();
            for sample in &change.historical {
                self.track_sample(&mut tracker, sample.time_ms, sample.position);
            }
            self.track_sample(&mut tracker, change.time_ms, change.position);
        }

        self.apply_drag_delta(change.delta);
    }

    pub fn on_drag_end(&self) {
        if !self.config.enabled || !self.dragging.get() {
            return;
        }
        self.dragging.set(false);

        let velocity = {
            let mut tracker = self.tracker.borrow_mut();
            let velocity = tracker.velocity();
            tracker.reset();
            velocity
        };

        let x_velocity = flipped(-velocity.x, self.config.reverse_horizontal);
        let y_velocity = flipped(-velocity.y, self.config.reverse_vertical);
        log::trace!("drag end, fling ({}, {}) px/sec", x_velocity, y_velocity);

        // Launched separately so both axes decay simultaneously; one axis
        // reaching its bound never stops the other.
        self.state
            .horizontal()
            .fling(x_velocity, Rc::clone(&self.config.fling), &self.clock, || {});
        self.state
            .vertical()
            .fling(y_velocity, Rc::clone(&self.config.fling), &self.clock, || {});
    }

    /// Abandons the gesture without a fling.
    pub fn on_drag_cancel(&self) {
        if !self.dragging.get() {
            return;
        }
        self.dragging.set(false);
        self.tracker.borrow_mut().reset();
    }

    pub fn on_transform_start(&self) {
        if !self.config.enabled {
            return;
        }
        log::trace!("transform start");
        self.begin_interaction();
    }

    /// Transform-gesture variant: the pan component drives the same delta
    /// and velocity pipeline as a drag, everything else is passed through.
    pub fn on_transform(&self, change: &TransformChange) {
        if !self.config.enabled || !self.dragging.get() {
            return;
        }

        if change.pointer_changed {
            // Velocity across a pointer substitution is meaningless.
            self.tracker.borrow_mut().reset();
        }

        {
            let mut tracker = self.tracker.borrow_mut();
            self.track_sample(&mut tracker, change.time_ms, change.centroid);
        }

        self.apply_drag_delta(change.pan);

        if let Some(on_gesture) = &self.config.on_gesture {
            on_gesture(change.centroid, change.pan, change.zoom, change.rotation);
        }
    }

    pub fn on_transform_end(&self) {
        self.on_drag_end();
    }

    fn begin_interaction(&self) {
        self.dragging.set(true);
        self.tracker.borrow_mut().reset();
        // A fresh gesture claims both axes, retiring any in-flight fling or
        // animation.
        self.state.stop();
    }

    /// Feeds one pointer sample in content space: the scroll offset is
    /// subtracted (on top of a per-axis sign flip for reversed axes) so the
    /// estimate reflects motion relative to the content even while the
    /// content is scrolling under the pointer.
    fn track_sample(&self, tracker: &mut VelocityTracker, time_ms: i64, position: Point) {
        let x = flipped(
            position.x - self.state.x_value(),
            self.config.reverse_horizontal,
        );
        let y = flipped(
            position.y - self.state.y_value(),
            self.config.reverse_vertical,
        );
        tracker.add_position(time_ms, Point::new(x, y));
    }

    /// Dragging the content left reveals content on the right: the offset
    /// moves opposite to the pointer unless the axis is reversed.
    fn apply_drag_delta(&self, delta: Offset) {
        let dx = flipped(-delta.x, self.config.reverse_horizontal);
        let dy = flipped(-delta.y, self.config.reverse_vertical);
        self.state.horizontal().dispatch_raw_delta(dx);
        self.state.vertical().dispatch_raw_delta(dy);
    }
}

#[inline]
fn flipped(value: f32, reverse: bool) -> f32 {
    if reverse {
        -value
    } else {
        value
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
