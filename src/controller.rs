//! Drop animation state machine.
//!
//! Sequences the whole effect: idle → opening (disc warps in) → either a
//! close-without-drop or a drop that spirals into the center, a star finale,
//! and a settle back to idle. All timestamps come from one caller-supplied
//! monotonic timeline in seconds; input events are expected to be applied
//! between frame ticks.

use glam::DVec2;
use thiserror::Error;

use crate::constants::{
    AMBIENT_SEED_SEC, CAPTURE_DISTANCE_FRACTION, DISC_RADIUS, FINALE_DURATION_SEC, MIN_DROP_RADIUS,
    PROGRESS_EPSILON, SPIRAL_GROWTH, SPIRAL_SHAPE, STAR_SEED_SEC,
};
use crate::field::{BlendMode, FieldConfig, FieldError, Particle, ParticleField};
use crate::platform::ImageHandle;
use crate::spiral::{Spiral, SpiralError};
use crate::spring::Spring;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("disc radius must be positive, got {0}")]
    FlatDisc(f64),
    #[error(transparent)]
    Spiral(#[from] SpiralError),
    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Disc center in screen points.
    pub center: DVec2,
    pub disc_radius: f64,
    pub spiral_shape: f64,
    pub spiral_growth: f64,
    pub star_seed_duration: f64,
    pub ambient_seed_duration: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            center: DVec2::ZERO,
            disc_radius: DISC_RADIUS,
            spiral_shape: SPIRAL_SHAPE,
            spiral_growth: SPIRAL_GROWTH,
            star_seed_duration: STAR_SEED_SEC,
            ambient_seed_duration: AMBIENT_SEED_SEC,
        }
    }
}

/// Which part of the sequence currently holds. Exactly one at a time; the
/// sum type makes combinations like "dragging while settling" unrepresentable.
enum Phase {
    Idle,
    Opening {
        since: f64,
    },
    Closing {
        since: f64,
        epoch: u64,
    },
    Dropped {
        released_at: f64,
        spiral: Spiral,
        image: ImageHandle,
        finale_since: Option<f64>,
    },
    Settling {
        since: f64,
        epoch: u64,
    },
}

/// Discriminant-only view of the current phase, mostly for tests and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Opening,
    Closing,
    Dropped,
    Settling,
}

/// Per-frame render data for the dropped item while it is in flight.
#[derive(Clone, Debug)]
pub struct DropVisual {
    pub point: DVec2,
    /// Distance from the center over the disc radius; shrinks toward zero.
    pub scale: f64,
    /// Fades out as spiral progress approaches 1.
    pub opacity: f64,
    pub image: ImageHandle,
}

/// One particle field as the renderer sees it.
pub struct FieldView<'a> {
    pub particles: &'a [Particle],
    pub mode: BlendMode,
}

/// Everything a renderer needs for one frame.
pub struct FrameOutput<'a> {
    /// How far the disc has warped open, in `[0, 1]` while closing and
    /// spring-shaped (may overshoot 1) while opening.
    pub open_progress: f64,
    pub background: Option<ImageHandle>,
    pub ambient: FieldView<'a>,
    pub star: FieldView<'a>,
    pub drop: Option<DropVisual>,
    /// Star finale progress in `[0, 1]` while the finale transition runs.
    pub finale: Option<f64>,
}

pub struct DropController {
    config: ControllerConfig,
    open_spring: Spring,
    close_spring: Spring,
    star: ParticleField,
    ambient: ParticleField,
    phase: Phase,
    background: Option<ImageHandle>,
    /// Timestamp of the drag that opened the disc; the open spring keeps
    /// running from here through a drop.
    drag_started_at: f64,
    /// Bumped on every accepted drag/drop; pending resets compare against it
    /// at fire time so a superseded reset never clears fresh state.
    epoch: u64,
}

impl DropController {
    pub fn new(config: ControllerConfig, seed: u64) -> Result<Self, ControllerError> {
        if config.disc_radius <= 0.0 {
            return Err(ControllerError::FlatDisc(config.disc_radius));
        }
        if config.spiral_growth <= 0.0 {
            return Err(SpiralError::FlatGrowth(config.spiral_growth).into());
        }
        if config.spiral_shape <= 0.0 {
            return Err(SpiralError::FlatShape(config.spiral_shape).into());
        }
        // Derive per-field RNGs from the base seed so the fields stay
        // independent of each other
        let star = ParticleField::new(
            FieldConfig::star(),
            seed ^ 0x9E37_79B9_7F4A_7C15,
        )?;
        let ambient = ParticleField::new(
            FieldConfig::ambient(),
            seed ^ 2u64.wrapping_mul(0x9E37_79B9_7F4A_7C15),
        )?;
        Ok(Self {
            config,
            open_spring: Spring::bouncy(),
            close_spring: Spring::snappy(),
            star,
            ambient,
            phase: Phase::Idle,
            background: None,
            drag_started_at: 0.0,
            epoch: 0,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Opening { .. } => PhaseKind::Opening,
            Phase::Closing { .. } => PhaseKind::Closing,
            Phase::Dropped { .. } => PhaseKind::Dropped,
            Phase::Settling { .. } => PhaseKind::Settling,
        }
    }

    /// Store (or clear) the captured desktop backdrop. Capture is
    /// best-effort; a missing background just renders nothing behind the
    /// disc.
    pub fn set_background(&mut self, image: Option<ImageHandle>) {
        self.background = image;
    }

    /// A drag with a valid payload began. Returns whether the drag was
    /// accepted; a drop already in flight keeps the state unchanged.
    pub fn drag_started(&mut self, now: f64) -> bool {
        match self.phase {
            // Drag notifications repeat while the mouse moves; anything
            // already engaged stays engaged
            Phase::Opening { .. } | Phase::Dropped { .. } => false,
            Phase::Idle => {
                // Coming out of idle the fields have been paused; pre-roll
                // them so the backdrop is not empty on the first frame
                self.star.seed(now, self.config.star_seed_duration);
                self.ambient.seed(now, self.config.ambient_seed_duration);
                self.begin_opening(now);
                true
            }
            Phase::Closing { .. } | Phase::Settling { .. } => {
                self.begin_opening(now);
                true
            }
        }
    }

    fn begin_opening(&mut self, now: f64) {
        log::debug!("drag start, opening at t={now:.3}");
        self.epoch += 1;
        self.drag_started_at = now;
        self.phase = Phase::Opening { since: now };
    }

    /// The drag ended without a drop landing here.
    pub fn drag_released(&mut self, now: f64) {
        match self.phase {
            Phase::Opening { .. } => {
                log::debug!("drag released, closing at t={now:.3}");
                self.phase = Phase::Closing {
                    since: now,
                    epoch: self.epoch,
                };
            }
            // A release with no active drag is a no-op
            _ => log::debug!("ignoring release with no active drag"),
        }
    }

    /// A file was dropped at `location`. Returns whether the drop was
    /// accepted; a second drop while one is in flight is rejected, and the
    /// state stays unchanged.
    ///
    /// `image` is the resolved preview; `None` substitutes the generic icon
    /// so a failed preview never loses the animation.
    pub fn drop_received(
        &mut self,
        now: f64,
        location: DVec2,
        image: Option<ImageHandle>,
    ) -> bool {
        match self.phase {
            Phase::Dropped { .. } => {
                log::debug!("rejecting drop while one is in flight");
                false
            }
            Phase::Idle | Phase::Settling { .. } => {
                log::debug!("rejecting drop with no drag context");
                false
            }
            Phase::Opening { .. } | Phase::Closing { .. } => {
                let target = self.solvable_target(location);
                let spiral = match Spiral::new(
                    self.config.spiral_shape,
                    self.config.spiral_growth,
                    self.config.center,
                    target,
                ) {
                    Ok(s) => s,
                    Err(e) => {
                        // Cannot happen for validated config and a nudged
                        // target, but a lost drop beats a poisoned state
                        log::warn!("drop at {location:?} unsolvable: {e}");
                        return false;
                    }
                };
                log::debug!("drop accepted at {location:?}, t={now:.3}");
                self.epoch += 1;
                self.phase = Phase::Dropped {
                    released_at: now,
                    spiral,
                    image: image.unwrap_or(ImageHandle::GenericIcon),
                    finale_since: None,
                };
                true
            }
        }
    }

    /// A drop exactly on the center pixel has no polar angle; nudge it out
    /// to a sub-point radius instead of refusing the gesture.
    fn solvable_target(&self, location: DVec2) -> DVec2 {
        if location.distance(self.config.center) < MIN_DROP_RADIUS {
            self.config.center + DVec2::new(MIN_DROP_RADIUS, 0.0)
        } else {
            location
        }
    }

    /// Advance one display frame and report what to draw.
    pub fn frame(&mut self, now: f64, dt: f64) -> FrameOutput<'_> {
        let (drop, finale) = self.step_phase(now);

        if !matches!(self.phase, Phase::Idle) {
            self.star.update(now, dt);
            self.ambient.update(now, dt);
        }

        FrameOutput {
            open_progress: self.open_progress(now),
            background: self.background.clone(),
            ambient: FieldView {
                particles: self.ambient.particles(),
                mode: self.ambient.mode(),
            },
            star: FieldView {
                particles: self.star.particles(),
                mode: self.star.mode(),
            },
            drop,
            finale,
        }
    }

    fn step_phase(&mut self, now: f64) -> (Option<DropVisual>, Option<f64>) {
        match &mut self.phase {
            Phase::Dropped {
                released_at,
                spiral,
                image,
                finale_since,
            } => {
                let progress =
                    (now - *released_at) / spiral.end_theta().max(f64::EPSILON) + PROGRESS_EPSILON;
                let (point, distance) = spiral.value(progress);
                let scale = distance / self.config.disc_radius;

                if scale < CAPTURE_DISTANCE_FRACTION && finale_since.is_none() {
                    log::debug!("drop captured, finale starts at t={now:.3}");
                    *finale_since = Some(now);
                }

                let visual = DropVisual {
                    point,
                    scale,
                    opacity: 1.0 - progress,
                    image: image.clone(),
                };

                match *finale_since {
                    Some(t0) if now - t0 >= FINALE_DURATION_SEC => {
                        // Finale done: drop the captured state right away and
                        // let the disc snap shut over the starfield
                        log::debug!("finale complete, settling at t={now:.3}");
                        self.background = None;
                        self.phase = Phase::Settling {
                            since: now,
                            epoch: self.epoch,
                        };
                        (None, None)
                    }
                    Some(t0) => {
                        let finale = ((now - t0) / FINALE_DURATION_SEC).clamp(0.0, 1.0);
                        (Some(visual), Some(finale))
                    }
                    None => (Some(visual), None),
                }
            }
            Phase::Closing { since, epoch } | Phase::Settling { since, epoch } => {
                // The deferred return to idle; superseded epochs never fire
                if now - *since >= self.close_spring.settling_duration() && *epoch == self.epoch {
                    log::debug!("settled, idle at t={now:.3}");
                    self.background = None;
                    self.phase = Phase::Idle;
                }
                (None, None)
            }
            _ => (None, None),
        }
    }

    fn open_progress(&self, now: f64) -> f64 {
        match &self.phase {
            Phase::Idle => 0.0,
            Phase::Opening { since } => self.open_spring.value(1.0, now - since),
            // The drop keeps the disc held open by the same spring that
            // opened it
            Phase::Dropped { .. } => self.open_spring.value(1.0, now - self.drag_started_at),
            Phase::Closing { since, .. } | Phase::Settling { since, .. } => {
                (1.0 - self.close_spring.value(1.0, now - since).min(1.0)).clamp(0.0, 1.0)
            }
        }
    }

    /// Settling duration of the close spring: how long the deferred
    /// idle-reset waits after a drag ends.
    pub fn reset_delay(&self) -> f64 {
        self.close_spring.settling_duration()
    }
}
