//! Frame-driven animators used by the layout strategies.
//!
//! Both animators start their clock on the first `update` call, so a strategy
//! can create one inside an interaction hook (which has no timestamp) and let
//! the next frame anchor it.

use std::time::Duration;

/// Duration of page-turn, snap-back and zoom-toggle animations.
pub const SNAP_DURATION: Duration = Duration::from_millis(250);

/// Minimum velocity (in px/sec) for a fling to do anything.
pub const MIN_FLING_VELOCITY: f32 = 50.0;

/// Velocity (in px/sec) below which a decaying fling stops.
const FLING_STOP_VELOCITY: f32 = 20.0;

/// Time constant of the exponential fling decay, in seconds.
const FLING_TIME_CONSTANT: f32 = 0.325;

fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Eased interpolation between two values over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimation {
    from: f32,
    to: f32,
    duration: Duration,
    start: Option<Duration>,
}

impl SnapAnimation {
    /// Animate from `from` to `to` over `duration`.
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            start: None,
        }
    }

    /// Value the animation ends on.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Value at `now` and whether the animation has finished.
    pub fn update(&mut self, now: Duration) -> (f32, bool) {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.from + (self.to - self.from) * ease_out_cubic(t), false)
    }
}

/// Exponentially decaying fling along one axis.
///
/// Position follows `v0 * tau * (1 - e^(-t / tau))`; the fling stops once the
/// instantaneous velocity drops below a small threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingAnimation {
    velocity: f32,
    start: Option<Duration>,
    travelled: f32,
}

impl FlingAnimation {
    /// Fling with initial `velocity` in px/sec.
    pub fn new(velocity: f32) -> Self {
        Self {
            velocity,
            start: None,
            travelled: 0.0,
        }
    }

    /// Total distance the fling will cover if nothing stops it.
    pub fn projected_distance(&self) -> f32 {
        self.velocity * FLING_TIME_CONSTANT
    }

    /// Instantaneous velocity as of the last update, in px/sec.
    pub fn velocity(&self) -> f32 {
        self.velocity - self.travelled / FLING_TIME_CONSTANT
    }

    /// Distance moved since the previous update and whether the fling continues.
    pub fn update(&mut self, now: Duration) -> (f32, bool) {
        let start = *self.start.get_or_insert(now);
        let t = now.saturating_sub(start).as_secs_f32();
        let decay = (-t / FLING_TIME_CONSTANT).exp();
        let position = self.velocity * FLING_TIME_CONSTANT * (1.0 - decay);
        let delta = position - self.travelled;
        self.travelled = position;
        let running = (self.velocity * decay).abs() > FLING_STOP_VELOCITY;
        (delta, running)
    }
}
