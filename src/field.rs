//! Continuous particle emitter and integrator.
//!
//! A [`ParticleField`] maintains an open-ended population of particles over a
//! normalized unit square. Each live tick spawns at most one particle (gated
//! by the configured probability) and advances every particle by simple
//! Euler integration; the population is bounded only by the out-of-bounds
//! cull. Opacity follows a two-segment attack/release envelope while size
//! interpolates over the particle's total lifespan; the two envelopes are
//! deliberately independent and the visuals are calibrated around that.

use glam::DVec2;
use rand::prelude::*;
use std::f64::consts::TAU;
use thiserror::Error;

use crate::constants::SEED_STEP_SEC;

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("color palette must not be empty")]
    EmptyPalette,
    #[error("spawn probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),
    #[error("vary amounts must be non-negative, got {0}")]
    NegativeVary(f64),
}

/// Compositing mode the renderer applies when drawing a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    #[default]
    Color,
    Multiply,
}

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Normalized unit-square coordinates; may drift slightly outside.
    pub position: DVec2,
    pub velocity: DVec2,
    pub birth_time: f64,
    pub lifespan: f64,
    pub start_size: f64,
    pub size: f64,
    /// Recomputed each advance; values at or below zero mean invisible.
    pub opacity: f64,
    pub attack: f64,
    pub release: f64,
    pub color: [f32; 3],
}

/// Immutable emission parameters for one field instance.
#[derive(Clone, Debug)]
pub struct FieldConfig {
    pub position: DVec2,
    pub spawn_radius: f64,

    pub lifespan: f64,
    pub speed: f64,
    pub size: f64,
    pub attack: f64,
    pub release: f64,

    pub max_opacity: f64,

    pub speed_vary: f64,
    pub life_vary: f64,
    pub size_vary: f64,
    pub attack_vary: f64,
    pub release_vary: f64,

    /// Chance of emitting one particle per tick.
    pub probability: f64,

    /// Size multiplier reached at the end of the lifespan.
    pub death_size: f64,

    pub palette: Vec<[f32; 3]>,
    pub mode: BlendMode,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            position: DVec2::new(0.5, 0.5),
            spawn_radius: 0.0,
            lifespan: 1.0,
            speed: 1.0,
            size: 1.0,
            attack: 1.5,
            release: 4.0,
            max_opacity: 1.0,
            speed_vary: 0.0,
            life_vary: 0.0,
            size_vary: 0.0,
            attack_vary: 0.2,
            release_vary: 1.0,
            probability: 1.0,
            death_size: 1.0,
            palette: vec![[1.0, 1.0, 1.0]],
            mode: BlendMode::default(),
        }
    }
}

impl FieldConfig {
    /// Dense white pinpricks streaming out of the disc center.
    pub fn star() -> Self {
        Self {
            speed: 0.1,
            speed_vary: 0.1,
            size: 0.1,
            size_vary: 0.1,
            lifespan: 2.0,
            life_vary: 0.5,
            ..Self::default()
        }
    }

    /// Slow deep-violet clouds drifting behind the stars.
    pub fn ambient() -> Self {
        Self {
            probability: 0.1,
            spawn_radius: 0.2,
            size: 4.0,
            size_vary: 2.0,
            speed: 0.01,
            speed_vary: 0.1,
            max_opacity: 0.6,
            lifespan: 5.0,
            life_vary: 0.5,
            attack: 10.0,
            attack_vary: 2.0,
            release: 10.0,
            release_vary: 3.0,
            palette: vec![
                [0.20, 0.01, 0.46],
                [0.16, 0.08, 0.58],
                [0.17, 0.01, 0.25],
                [0.29, 0.16, 0.35],
                [0.04, 0.03, 0.21],
                [0.04, 0.02, 0.46],
            ],
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.palette.is_empty() {
            return Err(FieldError::EmptyPalette);
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(FieldError::ProbabilityOutOfRange(self.probability));
        }
        for vary in [
            self.speed_vary,
            self.life_vary,
            self.size_vary,
            self.attack_vary,
            self.release_vary,
        ] {
            if vary < 0.0 {
                return Err(FieldError::NegativeVary(vary));
            }
        }
        Ok(())
    }
}

/// Symmetric random perturbation: uniform in `[-x/2, x/2]`, exactly 0 for 0.
pub fn spread(rng: &mut impl Rng, x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        rng.gen_range(-x / 2.0..=x / 2.0)
    }
}

#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: FieldConfig, seed: u64) -> Result<Self, FieldError> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn mode(&self) -> BlendMode {
        self.config.mode
    }

    /// Possibly emit one particle born at `now`.
    pub fn spawn_tick(&mut self, now: f64) {
        self.spawn(now, false);
    }

    fn spawn(&mut self, now: f64, seeding: bool) {
        let cfg = &self.config;
        if self.rng.gen::<f64>() > cfg.probability {
            return;
        }

        let launch_angle = self.rng.gen::<f64>() * TAU;
        let launch_speed = cfg.speed + spread(&mut self.rng, cfg.speed_vary);
        let lifespan = cfg.lifespan + spread(&mut self.rng, cfg.life_vary);
        let size = cfg.size + spread(&mut self.rng, cfg.size_vary);

        // Area-uniform position inside the spawn disc
        let r = cfg.spawn_radius * self.rng.gen::<f64>().sqrt();
        let theta = self.rng.gen::<f64>() * TAU;
        let origin = cfg.position + DVec2::new(r * theta.cos(), r * theta.sin());

        let attack = cfg.attack + spread(&mut self.rng, cfg.attack_vary);
        let release = cfg.release + spread(&mut self.rng, cfg.release_vary);
        let color = *cfg
            .palette
            .choose(&mut self.rng)
            .unwrap_or(&[1.0, 1.0, 1.0]);

        self.particles.push(Particle {
            position: origin,
            velocity: DVec2::new(launch_angle.cos(), launch_angle.sin()) * launch_speed,
            // Seeded particles are born mid-attack so a pre-rolled field
            // does not fade in from black all at once
            birth_time: if seeding { now - attack } else { now },
            lifespan,
            start_size: size,
            size,
            opacity: 0.0,
            attack,
            release,
            color,
        });
    }

    /// Integrate every live particle and drop the ones that left the padded
    /// unit square.
    pub fn advance(&mut self, now: f64, dt: f64) {
        let max_opacity = self.config.max_opacity;
        let death_size = self.config.death_size;
        self.particles.retain_mut(|p| {
            p.position += p.velocity * dt;

            let age = now - p.birth_time;
            p.opacity = if age < p.attack {
                (age / p.attack) * max_opacity
            } else {
                (1.0 - (age - p.attack) / p.release) * max_opacity
            };

            if p.position.x >= 1.1 || p.position.x <= -0.1 || p.position.y >= 1.1 || p.position.y <= -0.1 {
                return false;
            }

            // Size runs over the whole lifespan, independent of the
            // attack/release opacity envelope
            let progress = age / p.lifespan;
            let target_size = p.start_size * death_size;
            p.size = p.start_size + (target_size - p.start_size) * progress;
            true
        });
    }

    /// One live frame tick: spawn, then integrate.
    pub fn update(&mut self, now: f64, dt: f64) {
        self.spawn_tick(now);
        self.advance(now, dt);
    }

    /// Pre-run the field offline so playback starts warmed up rather than
    /// empty. Runs `duration` seconds of simulated time at a fixed 1/60 step
    /// ending at `now`, with every spawn born mid-attack.
    pub fn seed(&mut self, now: f64, duration: f64) {
        let mut t = now - duration;
        while t < now {
            self.spawn(t, true);
            self.advance(t, SEED_STEP_SEC);
            t += SEED_STEP_SEC;
        }
    }
}
