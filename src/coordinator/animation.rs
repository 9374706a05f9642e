//! Spring description of the inset transition

use crate::config::AnimationPreferences;
use std::time::Duration;

/// Rate at which the spring's envelope decays, in units of 1/duration.
/// At this rate a critically damped spring is within 0.1% of its target
/// when `duration` has elapsed.
const SETTLE_RATE: f64 = 9.233;

/// Spring-driven transition applied when a settled inset is committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringAnimation {
    /// Nominal length of the transition
    pub duration: Duration,
    /// Wait before the transition starts
    pub delay: Duration,
    /// 1.0 is critically damped (no overshoot); below 1.0 oscillates
    pub damping_ratio: f64,
    /// Starting velocity, in transition lengths per second
    pub initial_velocity: f64,
}

impl Default for SpringAnimation {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            delay: Duration::ZERO,
            damping_ratio: 1.0,
            initial_velocity: 0.0,
        }
    }
}

impl From<&AnimationPreferences> for SpringAnimation {
    fn from(prefs: &AnimationPreferences) -> Self {
        Self {
            duration: prefs.duration(),
            delay: Duration::ZERO,
            damping_ratio: prefs.damping_ratio,
            initial_velocity: prefs.initial_velocity,
        }
    }
}

impl SpringAnimation {
    /// Fraction of the way from the old inset to the new one after `elapsed`.
    ///
    /// Starts at 0 once `delay` has passed and approaches 1; underdamped
    /// springs may briefly exceed it. A zero duration jumps straight to 1.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let Some(t) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }

        let t = t.as_secs_f64();
        let omega = SETTLE_RATE / self.duration.as_secs_f64();
        let zeta = self.damping_ratio;
        let v0 = self.initial_velocity;

        // Displacement from the target, starting at 1 and moving at -v0
        let remaining = if (zeta - 1.0).abs() < 1e-6 {
            (1.0 + (omega - v0) * t) * (-omega * t).exp()
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (zeta * omega - v0) / omega_d;
            (-zeta * omega * t).exp() * ((omega_d * t).cos() + b * (omega_d * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c1 = (-v0 - r2) / (r1 - r2);
            let c2 = 1.0 - c1;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        };

        1.0 - remaining
    }

    /// Inset to show at `elapsed` while moving from `from` to `to`
    pub fn interpolate(&self, from: f64, to: f64, elapsed: Duration) -> f64 {
        from + (to - from) * self.progress(elapsed)
    }
}
