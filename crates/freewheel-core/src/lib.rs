//! Runtime services for freewheel.
//!
//! The host UI framework owns the render loop; this crate owns the queue of
//! one-shot frame callbacks that motion drivers register between frames.
//! The host pumps the queue once per frame with
//! [`Runtime::drain_frame_callbacks`], passing the frame time in nanoseconds.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

pub mod frame_clock;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};

pub type FrameCallbackId = u64;

/// Notified whenever a callback is queued for the next frame, so the host
/// can keep its render loop awake while motion is in flight.
pub trait FrameScheduler {
    fn request_frame(&self);
}

/// Scheduler for hosts that pump frames on their own cadence (and for tests).
pub struct DefaultScheduler;

impl FrameScheduler for DefaultScheduler {
    fn request_frame(&self) {}
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64)>>,
}

struct RuntimeInner {
    scheduler: Arc<dyn FrameScheduler>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<FrameCallbackId>,
    draining: Cell<bool>,
}

impl RuntimeInner {
    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64)>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.scheduler.request_frame();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if self.draining.replace(true) {
            log::warn!("re-entrant frame drain ignored");
            return;
        }

        // Snapshot the queue first: callbacks registered while draining
        // (drivers re-arming themselves) belong to the next frame.
        let mut pending: Vec<Box<dyn FnOnce(u64)>> = Vec::new();
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            pending.reserve(callbacks.len());
            while let Some(mut entry) = callbacks.pop_front() {
                if let Some(callback) = entry.callback.take() {
                    pending.push(callback);
                }
            }
        }
        for callback in pending {
            callback(frame_time_nanos);
        }

        self.draining.set(false);
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }
}

/// Owner of the frame-callback queue. Lives for the lifetime of the attached
/// behavior; everything else holds a [`RuntimeHandle`].
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                scheduler,
                frame_callbacks: RefCell::new(VecDeque::new()),
                next_frame_callback_id: Cell::new(1),
                draining: Cell::new(false),
            }),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether any driver is waiting on the next frame.
    pub fn needs_frame(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    /// Runs every callback queued before this call with the given frame time.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }
}

/// Weak, cloneable reference to a [`Runtime`]. Registrations against a
/// dropped runtime are inert.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.has_frame_callbacks())
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}
