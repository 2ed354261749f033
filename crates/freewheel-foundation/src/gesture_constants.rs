//! Shared gesture constants for consistent touch/pointer handling.
//!
//! These values are in logical pixels. For very high-density touch screens,
//! consider scaling by the device's DPI factor.

/// Minimum release velocity, in pixels per second, for a fling to start.
///
/// Releases below this (0.1 px/ms) stop dead: no decay animation is
/// scheduled at all, so a slow lift of the finger never produces a crawl.
pub const MIN_FLING_VELOCITY: f32 = 100.0;

/// Maximum fling velocity in pixels per second.
///
/// Matches the platform default maximum on a baseline density. Velocity
/// estimates above this are clamped before a fling launches.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
