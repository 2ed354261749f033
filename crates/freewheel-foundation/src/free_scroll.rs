//! Two-axis scroll state.
//!
//! `FreeScrollState` composes a horizontal and a vertical [`AxisState`] into
//! one coordinate. Compound operations touch both axes in the same instant —
//! neither axis ever waits for the other to finish first, which is what
//! keeps diagonal motion diagonal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use freewheel_animation::MotionSpec;
use freewheel_core::FrameClock;

use crate::geometry::{Offset, Size};
use crate::scroll::AxisState;

/// Scroll state for content that pans freely in both dimensions.
///
/// Clones share the same underlying axes.
#[derive(Clone, Default)]
pub struct FreeScrollState {
    horizontal: AxisState,
    vertical: AxisState,
}

impl FreeScrollState {
    pub fn new() -> Self {
        Self::with_initial(0.0, 0.0)
    }

    /// State starting at the given offsets (clamped to `>= 0`).
    pub fn with_initial(x: f32, y: f32) -> Self {
        Self {
            horizontal: AxisState::new(x),
            vertical: AxisState::new(y),
        }
    }

    pub fn horizontal(&self) -> &AxisState {
        &self.horizontal
    }

    pub fn vertical(&self) -> &AxisState {
        &self.vertical
    }

    /// Current horizontal offset in pixels.
    pub fn x_value(&self) -> f32 {
        self.horizontal.value()
    }

    /// Current vertical offset in pixels.
    pub fn y_value(&self) -> f32 {
        self.vertical.value()
    }

    /// Maximum horizontal offset, or `None` before the first layout report.
    pub fn x_max_value(&self) -> Option<f32> {
        self.horizontal.max_value()
    }

    /// Maximum vertical offset, or `None` before the first layout report.
    pub fn y_max_value(&self) -> Option<f32> {
        self.vertical.max_value()
    }

    /// Layout entry point: derives each axis bound as
    /// `(content − viewport).max(0)`.
    pub fn update_bounds(&self, content: Size, viewport: Size) {
        self.horizontal
            .set_max_value((content.width - viewport.width).max(0.0));
        self.vertical
            .set_max_value((content.height - viewport.height).max(0.0));
    }

    /// Jumps both axes by `offset` instantly. Returns the jointly-consumed
    /// offset, which falls short of the request at the bounds.
    pub fn scroll_by(&self, offset: Offset) -> Offset {
        Offset::new(
            self.horizontal.scroll_by(offset.x),
            self.vertical.scroll_by(offset.y),
        )
    }

    /// Jumps both axes to `(x, y)` instantly. Returns the jointly-consumed
    /// offset.
    pub fn scroll_to(&self, x: f32, y: f32) -> Offset {
        Offset::new(self.horizontal.scroll_to(x), self.vertical.scroll_to(y))
    }

    /// Animates both axes by `offset`. Both axis runs are launched before
    /// this returns; `on_finished` fires once both have ended (completion,
    /// bound, or supersession), with the jointly-consumed offset.
    pub fn animate_scroll_by(
        &self,
        offset: Offset,
        spec: MotionSpec,
        clock: &FrameClock,
        on_finished: impl FnOnce(Offset) + 'static,
    ) {
        self.animate_scroll_to(
            self.horizontal.value() + offset.x,
            self.vertical.value() + offset.y,
            spec,
            clock,
            on_finished,
        );
    }

    /// Animates both axes to `(x, y)`. Same launch and completion contract
    /// as [`FreeScrollState::animate_scroll_by`].
    pub fn animate_scroll_to(
        &self,
        x: f32,
        y: f32,
        spec: MotionSpec,
        clock: &FrameClock,
        on_finished: impl FnOnce(Offset) + 'static,
    ) {
        let consumed = Rc::new(Cell::new(Offset::ZERO));
        let remaining = Rc::new(Cell::new(2u8));
        let on_finished: Rc<RefCell<Option<Box<dyn FnOnce(Offset)>>>> =
            Rc::new(RefCell::new(Some(Box::new(on_finished))));

        let join = |axis_is_x: bool| {
            let consumed = Rc::clone(&consumed);
            let remaining = Rc::clone(&remaining);
            let on_finished = Rc::clone(&on_finished);
            move |axis_consumed: f32| {
                let mut total = consumed.get();
                if axis_is_x {
                    total.x = axis_consumed;
                } else {
                    total.y = axis_consumed;
                }
                consumed.set(total);

                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 {
                    if let Some(callback) = on_finished.borrow_mut().take() {
                        callback(consumed.get());
                    }
                }
            }
        };

        self.horizontal.animate_to(x, spec, clock, join(true));
        self.vertical.animate_to(y, spec, clock, join(false));
    }

    /// Cancels any in-flight motion on both axes without moving.
    pub fn stop(&self) {
        self.horizontal.interrupt();
        self.vertical.interrupt();
    }
}

#[cfg(test)]
#[path = "tests/free_scroll_tests.rs"]
mod tests;
