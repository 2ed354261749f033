//! Two-dimensional free-direction scrolling.
//!
//! A content surface draggable in any direction: drag deltas and programmatic
//! scroll calls funnel through the same per-axis clamping, release velocity
//! feeds an inertial fling per axis, and animated repositioning rides the
//! host's frame clock.

pub mod free_scroll;
pub mod geometry;
pub mod gesture;
pub mod gesture_constants;
pub mod motion;
pub mod scroll;
pub mod velocity_tracker;

pub use free_scroll::FreeScrollState;
pub use geometry::{Offset, Point, Size, Velocity};
pub use gesture::{DragChange, FreeScrollConfig, FreeScrollNode, PointerSample, TransformChange};
pub use gesture_constants::{MAX_FLING_VELOCITY, MIN_FLING_VELOCITY};
pub use scroll::AxisState;
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};
