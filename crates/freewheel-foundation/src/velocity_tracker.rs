//! Velocity estimation for fling gestures.
//!
//! Impulse-strategy estimator: velocity is derived from the kinetic energy
//! the pointer samples impart, which weights recent motion without letting a
//! single noisy sample dominate.

use crate::geometry::{Point, Velocity};
use crate::gesture_constants::MAX_FLING_VELOCITY;

/// Ring buffer capacity for tracked samples.
const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: i64 = 100;

/// A gap this long between consecutive samples means the pointer stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// Single-axis tracker over absolute positions.
///
/// Feed it `(timestamp, position)` pairs during a drag and ask for the
/// velocity at release. Returns 0.0 with fewer than two usable samples or
/// when the pointer has stopped moving.
#[derive(Clone)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records a position at the given time in milliseconds.
    pub fn add_sample(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// Estimated velocity in px/sec.
    pub fn velocity(&self) -> f32 {
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;

        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        // Walk backwards from the newest sample, stopping at the horizon or
        // at a gap long enough to mean the pointer was held still.
        let mut index = self.index;
        let mut previous_time = newest.time_ms;
        while let Some(sample) = self.samples[index] {
            let age = (newest.time_ms - sample.time_ms) as f32;
            let gap = (previous_time - sample.time_ms).abs() as f32;
            previous_time = sample.time_ms;

            if age > HORIZON_MS as f32 || gap > ASSUME_STOPPED_MS as f32 {
                break;
            }

            positions[count] = sample.position;
            times[count] = -age;

            index = if index == 0 { HISTORY_SIZE - 1 } else { index - 1 };
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions, &times, count) * 1000.0
    }

    /// Estimated velocity clamped to `[-max_velocity, max_velocity]`.
    pub fn velocity_capped(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    /// Clears all tracked samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Impulse-strategy velocity over samples ordered newest-first, with `times`
/// holding negative ages in milliseconds. Returns px/ms.
fn impulse_velocity(positions: &[f32; HISTORY_SIZE], times: &[f32; HISTORY_SIZE], count: usize) -> f32 {
    let mut kinetic_energy = 0.0f32;
    // Accumulate from the oldest pair forward; the oldest contribution is
    // halved, matching the trapezoid start of the impulse integral.
    for i in (1..count).rev() {
        let dt = times[i] - times[i - 1];
        if dt == 0.0 {
            continue;
        }
        let segment_velocity = (positions[i] - positions[i - 1]) / dt;
        let previous_velocity = velocity_from_energy(kinetic_energy);
        kinetic_energy += (segment_velocity - previous_velocity) * segment_velocity.abs();
        if i == count - 1 {
            kinetic_energy *= 0.5;
        }
    }
    velocity_from_energy(kinetic_energy)
}

/// E = v^2 / 2 with unit mass, preserving sign.
#[inline]
fn velocity_from_energy(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

/// Two independent single-axis trackers fed from one pointer stream.
#[derive(Clone, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a 2D position at the given time in milliseconds.
    pub fn add_position(&mut self, time_ms: i64, position: Point) {
        self.x.add_sample(time_ms, position.x);
        self.y.add_sample(time_ms, position.y);
    }

    /// Per-axis velocity in px/sec, capped at [`MAX_FLING_VELOCITY`].
    pub fn velocity(&self) -> Velocity {
        Velocity::new(
            self.x.velocity_capped(MAX_FLING_VELOCITY),
            self.y.velocity_capped(MAX_FLING_VELOCITY),
        )
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}
