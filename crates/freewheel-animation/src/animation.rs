//! Target-directed animation: easing curves, tween and spring specs, and a
//! stateful stepper the scroll drivers advance once per frame.

/// Easing functions for tween animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    LinearEasing,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Fast out, slow in (material design standard).
    FastOutSlowInEasing,
    LinearOutSlowInEasing,
    FastOutLinearEasing,
}

impl Easing {
    /// Apply the easing function to a linear fraction in [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve evaluation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric t matching the x fraction, with a
    // binary-subdivision fallback when the derivative degenerates.
    let mut t = fraction;
    let mut converged = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            converged = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !converged {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Fixed-duration tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    pub easing: Easing,
}

impl TweenSpec {
    pub fn new(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::new(duration_millis, Easing::LinearEasing)
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self::new(300, Easing::FastOutSlowInEasing)
    }
}

/// Spring configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 bouncy, > 1.0 over-damped.
    pub damping_ratio: f32,
    /// Higher stiffness settles faster.
    pub stiffness: f32,
    /// Progress-space velocity below which the spring is at rest.
    pub velocity_threshold: f32,
    /// Progress-space distance to target below which the spring snaps to it.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::default_spring()
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// How an animated scroll moves toward its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSpec {
    Tween(TweenSpec),
    Spring(SpringSpec),
}

impl Default for MotionSpec {
    fn default() -> Self {
        MotionSpec::Spring(SpringSpec::default())
    }
}

/// Integration substep for the spring stepper, ~one 60 Hz frame.
const SPRING_SUBSTEP_SECONDS: f32 = 0.016;

/// Stateful start-to-target animation, advanced by [`TargetAnimation::tick`]
/// with the frame time of each new frame.
pub struct TargetAnimation {
    start: f32,
    target: f32,
    spec: MotionSpec,
    value: f32,
    /// Spring velocity in progress space (fraction of start→target per second).
    progress_velocity: f32,
    start_time_nanos: Option<u64>,
    last_time_nanos: Option<u64>,
    finished: bool,
}

impl TargetAnimation {
    pub fn new(start: f32, target: f32, spec: MotionSpec) -> Self {
        Self {
            start,
            target,
            spec,
            value: start,
            progress_velocity: 0.0,
            start_time_nanos: None,
            last_time_nanos: None,
            finished: (target - start).abs() < f32::EPSILON,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the animation to `frame_time_nanos` and returns the new value.
    /// The first tick latches the start time, so the curve is driven by the
    /// host's frame timestamps rather than a wall clock.
    pub fn tick(&mut self, frame_time_nanos: u64) -> f32 {
        if self.finished {
            return self.value;
        }

        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);

        match self.spec {
            MotionSpec::Tween(spec) => {
                let duration_nanos = (spec.duration_millis * 1_000_000).max(1);
                let linear = (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0);
                let progress = spec.easing.transform(linear);
                self.value = lerp(self.start, self.target, progress);
                if linear >= 1.0 {
                    self.value = self.target;
                    self.finished = true;
                }
            }
            MotionSpec::Spring(spec) => {
                let last_time = *self.last_time_nanos.get_or_insert(frame_time_nanos);
                let dt = frame_time_nanos.saturating_sub(last_time) as f32 / 1_000_000_000.0;

                // Semi-implicit Euler over fixed substeps for stability.
                let stiffness = spec.stiffness;
                let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();
                let mut progress = (self.value - self.start) / (self.target - self.start);
                let mut integrated = 0.0f32;
                while integrated < dt {
                    let step = SPRING_SUBSTEP_SECONDS.min(dt - integrated);
                    let displacement = progress - 1.0;
                    let acceleration =
                        -stiffness * displacement - damping * self.progress_velocity;
                    self.progress_velocity += acceleration * step;
                    progress += self.progress_velocity * step;
                    integrated += step;
                }
                self.value = lerp(self.start, self.target, progress);

                let at_rest = self.progress_velocity.abs() < spec.velocity_threshold;
                let near_target = (progress - 1.0).abs() < spec.position_threshold;
                if at_rest && near_target {
                    self.value = self.target;
                    self.finished = true;
                }
            }
        }

        self.last_time_nanos = Some(frame_time_nanos);
        self.value
    }
}

fn lerp(start: f32, stop: f32, fraction: f32) -> f32 {
    start + (stop - start) * fraction
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
