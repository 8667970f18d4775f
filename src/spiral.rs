//! Logarithmic-spiral trajectory solver.
//!
//! Solves `r(theta) = a * exp(b * theta)` for the unique rotation offset
//! that makes the spiral pass exactly through a runtime-chosen target point,
//! then exposes position and center distance as a function of normalized
//! progress. Progress 0 is the outer end (the target itself); progress 1 has
//! wound all the way in toward the center.

use glam::DVec2;
use std::f64::consts::TAU;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SpiralError {
    #[error("spiral growth rate must be positive, got {0}")]
    FlatGrowth(f64),
    #[error("spiral shape scale must be positive, got {0}")]
    FlatShape(f64),
    #[error("target coincides with the spiral center")]
    DegenerateTarget,
}

/// An immutable solved spiral: `r(i) = a * r1 * exp(b * i)`, with the angle
/// range `[0, end_theta]` covering one full wind from target to center.
#[derive(Clone, Debug)]
pub struct Spiral {
    a: f64,
    b: f64,
    center: DVec2,
    rotation_theta: f64,
    end_theta: f64,
    r1: f64,
}

impl Spiral {
    pub fn new(a: f64, b: f64, center: DVec2, target: DVec2) -> Result<Self, SpiralError> {
        if b <= 0.0 {
            return Err(SpiralError::FlatGrowth(b));
        }
        if a <= 0.0 {
            return Err(SpiralError::FlatShape(a));
        }
        let radius = target.distance(center);
        if radius <= f64::EPSILON {
            return Err(SpiralError::DegenerateTarget);
        }

        let theta = (radius / a).ln() / b;

        // Polar angle of the target around the center. Screen y grows
        // downward, so the y offset is flipped before the arctangent; the
        // result is normalized into [0, 2pi).
        let x = target.x - center.x;
        let y = center.y - target.y;
        let mut target_theta = y.atan2(x).rem_euclid(TAU);

        // Wind outward by whole revolutions until the spiral radius at the
        // target angle has reached the target; a nearby angle on an inner
        // revolution would otherwise be chosen.
        while a * (b * target_theta).exp() < radius {
            target_theta += TAU;
        }

        let rotation_theta = target_theta - theta;
        Ok(Self {
            a,
            b,
            center,
            rotation_theta,
            end_theta: target_theta,
            r1: (-b * rotation_theta).exp(),
        })
    }

    pub fn end_theta(&self) -> f64 {
        self.end_theta
    }

    pub fn rotation_theta(&self) -> f64 {
        self.rotation_theta
    }

    /// Point on the spiral and its distance from the center.
    ///
    /// `progress` maps linearly onto the angle range with the direction
    /// inverted: 0 evaluates at `end_theta` (exactly the target), 1 at angle
    /// zero next to the center. Values past 1 keep winding inward.
    pub fn value(&self, progress: f64) -> (DVec2, f64) {
        let i = self.end_theta * (1.0 - progress);
        let r = self.a * self.r1 * (self.b * i).exp();
        let point = self.center + DVec2::new(r * (-i).cos(), r * (-i).sin());
        (point, point.distance(self.center))
    }
}
