//! Decay curves for fling motion.
//!
//! A decay curve has no target: it starts with a velocity and bleeds it off,
//! reaching zero velocity in bounded time. The curve is queried for the
//! signed displacement from the fling origin, so the caller can difference
//! consecutive frames into per-frame deltas.

use std::sync::LazyLock;

/// Swappable fling strategy.
pub trait DecayCurve {
    /// Velocity magnitude (px/sec) below which the curve counts as settled.
    fn velocity_threshold(&self) -> f32;

    /// Signed displacement from the fling origin after `play_time_ms`.
    fn displacement_at(&self, play_time_ms: i64, initial_velocity: f32) -> f32;

    /// Instantaneous velocity (px/sec) after `play_time_ms`.
    fn velocity_at(&self, play_time_ms: i64, initial_velocity: f32) -> f32;

    /// Time until the curve settles, in milliseconds.
    fn duration_ms(&self, initial_velocity: f32) -> i64;

    /// Signed displacement once fully settled.
    fn target_displacement(&self, initial_velocity: f32) -> f32;
}

// ---------------------------------------------------------------------------
// Spline-based decay (Android scroller physics)
// ---------------------------------------------------------------------------

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const SPLINE_SAMPLES: usize = 100;

struct SplineTable {
    distance: [f32; SPLINE_SAMPLES + 1],
    velocity_basis: [f32; SPLINE_SAMPLES + 1],
}

static SPLINE_TABLE: LazyLock<SplineTable> = LazyLock::new(|| {
    let mut distance = [0.0f32; SPLINE_SAMPLES + 1];
    let mut velocity_basis = [0.0f32; SPLINE_SAMPLES + 1];

    let mut x_min = 0.0f32;
    let mut y_min = 0.0f32;

    for i in 0..SPLINE_SAMPLES {
        let alpha = i as f32 / SPLINE_SAMPLES as f32;

        // Invert the tension bezier: find x with bezier_x(x) = alpha.
        let mut x_max = 1.0f32;
        let (x, coef_x) = loop {
            let mid = x_min + (x_max - x_min) / 2.0;
            let c = 3.0 * mid * (1.0 - mid);
            let tx = c * ((1.0 - mid) * P1 + mid * P2) + mid * mid * mid;
            if (tx - alpha).abs() < 1e-5 {
                break (mid, c);
            }
            if tx > alpha {
                x_max = mid;
            } else {
                x_min = mid;
            }
        };
        distance[i] = coef_x * ((1.0 - x) * START_TENSION + x) + x * x * x;

        let mut y_max = 1.0f32;
        let (y, coef_y) = loop {
            let mid = y_min + (y_max - y_min) / 2.0;
            let c = 3.0 * mid * (1.0 - mid);
            let dy = c * ((1.0 - mid) * START_TENSION + mid) + mid * mid * mid;
            if (dy - alpha).abs() < 1e-5 {
                break (mid, c);
            }
            if dy > alpha {
                y_max = mid;
            } else {
                y_min = mid;
            }
        };
        velocity_basis[i] = coef_y * ((1.0 - y) * P1 + y * P2) + y * y * y;
    }

    distance[SPLINE_SAMPLES] = 1.0;
    velocity_basis[SPLINE_SAMPLES] = 1.0;

    SplineTable {
        distance,
        velocity_basis,
    }
});

/// Samples the fling spline at `time` in [0, 1], returning the distance
/// fraction covered so far and the instantaneous velocity coefficient.
fn spline_position(time: f32) -> (f32, f32) {
    let clamped = time.clamp(0.0, 1.0);
    let index = (SPLINE_SAMPLES as f32 * clamped) as usize;
    if index >= SPLINE_SAMPLES {
        return (1.0, 0.0);
    }

    let t_inf = index as f32 / SPLINE_SAMPLES as f32;
    let t_sup = (index + 1) as f32 / SPLINE_SAMPLES as f32;
    let d_inf = SPLINE_TABLE.distance[index];
    let d_sup = SPLINE_TABLE.distance[index + 1];
    let velocity_coef = (d_sup - d_inf) / (t_sup - t_inf);
    (d_inf + (clamped - t_inf) * velocity_coef, velocity_coef)
}

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// abs(ln(0.78) / ln(0.9)), from the Android scroller.
const DECELERATION_RATE: f32 = 2.358_201_6;

/// Spline-based decay matching the Android scroller fling feel.
#[derive(Debug, Clone, Copy)]
pub struct SplineDecay {
    friction: f32,
    physical_coefficient: f32,
}

impl SplineDecay {
    /// Default scroll friction, matching the Android platform value.
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// Curve for the given screen density (1.0 = baseline) with default
    /// friction.
    pub fn new(density: f32) -> Self {
        Self::with_friction(Self::DEFAULT_FRICTION, density)
    }

    /// Higher friction decelerates faster.
    pub fn with_friction(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64
            / (self.friction * self.physical_coefficient) as f64)
            .ln()
    }

    fn distance(&self, velocity: f32) -> f32 {
        if velocity.abs() < f32::EPSILON {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE as f64 - 1.0;
        self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE as f64 / decel_minus_one * l).exp() as f32
    }
}

impl DecayCurve for SplineDecay {
    fn velocity_threshold(&self) -> f32 {
        0.0
    }

    fn displacement_at(&self, play_time_ms: i64, initial_velocity: f32) -> f32 {
        let duration = self.duration_ms(initial_velocity);
        let fraction = if duration > 0 {
            play_time_ms as f32 / duration as f32
        } else {
            1.0
        };
        let (distance_coef, _) = spline_position(fraction);
        self.distance(initial_velocity) * initial_velocity.signum() * distance_coef
    }

    fn velocity_at(&self, play_time_ms: i64, initial_velocity: f32) -> f32 {
        let duration = self.duration_ms(initial_velocity);
        if duration <= 0 {
            return 0.0;
        }
        let fraction = play_time_ms as f32 / duration as f32;
        let (_, velocity_coef) = spline_position(fraction);
        velocity_coef * self.distance(initial_velocity) * initial_velocity.signum()
            / duration as f32
            * 1000.0
    }

    fn duration_ms(&self, initial_velocity: f32) -> i64 {
        if initial_velocity.abs() < f32::EPSILON {
            return 0;
        }
        let l = self.spline_deceleration(initial_velocity);
        let decel_minus_one = DECELERATION_RATE as f64 - 1.0;
        (1000.0 * (l / decel_minus_one).exp()) as i64
    }

    fn target_displacement(&self, initial_velocity: f32) -> f32 {
        self.distance(initial_velocity) * initial_velocity.signum()
    }
}

// ---------------------------------------------------------------------------
// Exponential decay
// ---------------------------------------------------------------------------

/// Friction constant for exponential decay, per second.
const EXPONENTIAL_FRICTION: f32 = 4.2;

/// Exponential decay: v(t) = v0 * e^(-lambda * t). Cheaper than the spline
/// and tunable with a single multiplier.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDecay {
    friction_multiplier: f32,
    velocity_threshold: f32,
}

impl ExponentialDecay {
    pub fn new(friction_multiplier: f32) -> Self {
        Self {
            friction_multiplier,
            velocity_threshold: 0.1,
        }
    }

    fn lambda(&self) -> f32 {
        EXPONENTIAL_FRICTION * self.friction_multiplier
    }
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DecayCurve for ExponentialDecay {
    fn velocity_threshold(&self) -> f32 {
        self.velocity_threshold
    }

    fn displacement_at(&self, play_time_ms: i64, initial_velocity: f32) -> f32 {
        let seconds = play_time_ms as f32 / 1000.0;
        initial_velocity / self.lambda() * (1.0 - (-self.lambda() * seconds).exp())
    }

    fn velocity_at(&self, play_time_ms: i64, initial_velocity: f32) -> f32 {
        let seconds = play_time_ms as f32 / 1000.0;
        initial_velocity * (-self.lambda() * seconds).exp()
    }

    fn duration_ms(&self, initial_velocity: f32) -> i64 {
        if initial_velocity.abs() <= self.velocity_threshold {
            return 0;
        }
        let seconds = (initial_velocity.abs() / self.velocity_threshold).ln() / self.lambda();
        (seconds * 1000.0) as i64
    }

    fn target_displacement(&self, initial_velocity: f32) -> f32 {
        initial_velocity / self.lambda()
    }
}
