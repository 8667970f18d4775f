//! Closed-form damped-spring response.
//!
//! A [`Spring`] converts elapsed time since a trigger into the displacement
//! of a unit mass, without integrating any state: the response is a pure
//! function of time, so it can be re-evaluated at any frame timestamp. Two
//! presets cover the disc animation: a bouncy open and a snappy close.

use crate::constants::{
    CLOSE_SPRING_DAMPING, CLOSE_SPRING_RESPONSE, OPEN_SPRING_DAMPING, OPEN_SPRING_RESPONSE,
    SETTLE_TOLERANCE,
};

#[derive(Clone, Copy, Debug)]
pub struct Spring {
    /// Approximate duration of one oscillation period, in seconds.
    pub response: f64,
    /// Damping ratio; below 1 oscillates, at 1 settles monotonically.
    pub damping_ratio: f64,
}

impl Spring {
    /// Underdamped open spring; overshoots a few percent before settling.
    pub const fn bouncy() -> Self {
        Self {
            response: OPEN_SPRING_RESPONSE,
            damping_ratio: OPEN_SPRING_DAMPING,
        }
    }

    /// Critically damped close spring; rises monotonically to the target.
    pub const fn snappy() -> Self {
        Self {
            response: CLOSE_SPRING_RESPONSE,
            damping_ratio: CLOSE_SPRING_DAMPING,
        }
    }

    fn natural_frequency(&self) -> f64 {
        std::f64::consts::TAU / self.response
    }

    /// Displacement toward `target` after `time` seconds.
    ///
    /// Negative `time` clamps to zero, so sampling before the trigger never
    /// produces a pre-trigger value.
    pub fn value(&self, target: f64, time: f64) -> f64 {
        let t = time.max(0.0);
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio;
        if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            target * (1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin()))
        } else {
            let decay = (-omega * t).exp();
            target * (1.0 - decay * (1.0 + omega * t))
        }
    }

    /// Elapsed time after which the output stays within 0.1% of the target.
    pub fn settling_duration(&self) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio;
        if zeta < 1.0 {
            // Oscillation envelope: e^(-zeta*omega*t) / sqrt(1 - zeta^2)
            (1.0 / (SETTLE_TOLERANCE * (1.0 - zeta * zeta).sqrt())).ln() / (zeta * omega)
        } else {
            // Critical envelope e^(-u)(1 + u) = tol, solved by fixed point
            let mut u = (1.0 / SETTLE_TOLERANCE).ln();
            for _ in 0..8 {
                u = ((1.0 + u) / SETTLE_TOLERANCE).ln();
            }
            u / omega
        }
    }
}
