/// OrbitControl: rotates a transform around a pivot point.
///
/// Two motion modes share one controller and exclude each other:
/// - manual `rotate(axis, degrees)` (drag input)
/// - continuous 1-degree steps, each one `1000 / speed` ms after the frame
///   that ran the previous one, started with `start_continuous` and
///   advanced from the frame loop with `advance`
///
/// Every proposed position goes through the registered restrictions before
/// the transform moves.

use std::time::Duration;
use glam::{Quat, Vec3};
use crate::scene::Transform;
use super::repeating_timer::RepeatingTimer;

/// Restriction predicate: `(proposed, current) -> (accept, position)`.
///
/// Returning `(true, p)` accepts the move, possibly clamped to `p`.
pub type Restriction = Box<dyn Fn(Vec3, Vec3) -> (bool, Vec3)>;

/// Angle of one continuous step, in degrees
pub const CONTINUOUS_STEP_DEGREES: f32 = 1.0;

/// Delay between two continuous steps at `degrees_per_second`.
///
/// `None` when the speed is not positive and finite, or when the delay does
/// not fit in a `Duration`.
pub fn step_interval(degrees_per_second: f32) -> Option<Duration> {
    if !degrees_per_second.is_finite() || degrees_per_second <= 0.0 {
        return None;
    }
    let seconds = CONTINUOUS_STEP_DEGREES as f64 / degrees_per_second as f64;
    Duration::try_from_secs_f64(seconds).ok()
}

struct ContinuousMotion {
    axis: Vec3,
    epoch: u64,
}

pub struct OrbitControl {
    pivot: Vec3,
    up: Vec3,
    restrictions: Vec<Restriction>,
    timer: RepeatingTimer,
    continuous: Option<ContinuousMotion>,
}

impl OrbitControl {
    pub fn new(pivot: Vec3) -> Self {
        Self {
            pivot,
            up: Vec3::Y,
            restrictions: Vec::new(),
            timer: RepeatingTimer::new(),
            continuous: None,
        }
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
    }

    /// Up hint used when re-orienting toward the pivot
    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    /// Append a restriction. Restrictions run in registration order.
    pub fn add_restriction<F>(&mut self, restriction: F)
    where
        F: Fn(Vec3, Vec3) -> (bool, Vec3) + 'static,
    {
        self.restrictions.push(Box::new(restriction));
    }

    pub fn restriction_count(&self) -> usize {
        self.restrictions.len()
    }

    /// True while continuous motion runs
    pub fn is_running(&self) -> bool {
        self.continuous.is_some()
    }

    /// Rotate `transform` about `axis` through the pivot by `degrees`.
    ///
    /// Ignored while continuous motion runs. Returns whether the transform moved.
    pub fn rotate(&self, transform: &mut Transform, axis: Vec3, degrees: f32) -> bool {
        if self.is_running() {
            crate::engine_trace!("vitrine::OrbitControl", "Manual rotate ignored during continuous motion");
            return false;
        }
        self.orbit(transform, axis, degrees)
    }

    /// Begin continuous rotation about `axis` at `degrees_per_second`.
    ///
    /// No-op (returns false) if already running or `step_interval` rejects
    /// the speed.
    pub fn start_continuous(&mut self, axis: Vec3, degrees_per_second: f32, now: Duration) -> bool {
        if self.is_running() {
            return false;
        }
        let Some(interval) = step_interval(degrees_per_second) else {
            crate::engine_debug!("vitrine::OrbitControl",
                "Continuous orbit speed {} rejected", degrees_per_second);
            return false;
        };

        let epoch = self.timer.start(interval, now);
        self.continuous = Some(ContinuousMotion { axis, epoch });
        crate::engine_debug!("vitrine::OrbitControl",
            "Continuous orbit started ({} deg/s, step every {:?})", degrees_per_second, interval);
        true
    }

    /// Stop continuous motion. Steps scheduled before the call are dropped.
    pub fn stop(&mut self) {
        if self.continuous.take().is_some() {
            self.timer.cancel();
            crate::engine_debug!("vitrine::OrbitControl", "Continuous orbit stopped");
        }
    }

    /// Run the continuous step due at `now`, if any. Returns how many steps
    /// moved the transform (0 or 1).
    pub fn advance(&mut self, transform: &mut Transform, now: Duration) -> usize {
        let Some(tick) = self.timer.poll(now) else {
            return 0;
        };
        // Stale ticks belong to a cancelled schedule
        let Some(motion) = &self.continuous else { return 0 };
        if tick.epoch != motion.epoch {
            return 0;
        }
        usize::from(self.orbit(transform, motion.axis, CONTINUOUS_STEP_DEGREES))
    }

    /// Rotate, filter through restrictions, move and face the pivot.
    ///
    /// Each restriction sees the original proposal. The first rejection
    /// cancels the move; otherwise the last restriction's position wins.
    fn orbit(&self, transform: &mut Transform, axis: Vec3, degrees: f32) -> bool {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO || !degrees.is_finite() {
            return false;
        }

        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        let current = transform.position;
        let proposed = self.pivot + rotation * (current - self.pivot);

        let mut destination = proposed;
        for restriction in &self.restrictions {
            let (accept, position) = restriction(proposed, current);
            if !accept {
                return false;
            }
            destination = position;
        }

        transform.position = destination;
        transform.look_at(self.pivot, self.up);
        true
    }
}

#[cfg(test)]
#[path = "orbit_control_tests.rs"]
mod tests;
