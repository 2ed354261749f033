//! Motion math for freewheel.
//!
//! Pure curve evaluation, no runtime dependency: the scroll drivers in
//! `freewheel-foundation` own the frame loop and pull values from here.

pub mod animation;
pub mod decay;

pub use animation::{Easing, MotionSpec, SpringSpec, TargetAnimation, TweenSpec};
pub use decay::{DecayCurve, ExponentialDecay, SplineDecay};
