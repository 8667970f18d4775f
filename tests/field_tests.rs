// Integration tests for the particle field emitter/integrator.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vortex_core::{spread, BlendMode, FieldConfig, FieldError, ParticleField};

fn still_config() -> FieldConfig {
    // Motionless particles: nothing ever leaves the bounds
    FieldConfig {
        speed: 0.0,
        speed_vary: 0.0,
        ..FieldConfig::default()
    }
}

#[test]
fn spread_of_zero_is_always_zero() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        assert_eq!(spread(&mut rng, 0.0), 0.0);
    }
}

#[test]
fn spread_stays_within_half_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let v = spread(&mut rng, 2.0);
        assert!((-1.0..=1.0).contains(&v), "spread(2.0) out of range: {v}");
    }
}

#[test]
fn zero_probability_spawns_nothing() {
    let config = FieldConfig {
        probability: 0.0,
        ..FieldConfig::default()
    };
    let mut field = ParticleField::new(config, 42).expect("valid config");
    for step in 1..=100 {
        field.update(step as f64 / 60.0, 1.0 / 60.0);
    }
    assert!(field.particles().is_empty());
}

#[test]
fn particles_leaving_the_padded_square_are_removed() {
    // Default speed 1.0 carries a particle out of bounds within a second
    let mut field = ParticleField::new(FieldConfig::default(), 3).expect("valid config");
    field.spawn_tick(0.0);
    assert_eq!(field.particles().len(), 1);

    field.advance(0.5, 0.5);
    assert_eq!(
        field.particles().len(),
        1,
        "particle should still be inside after half a second"
    );

    let mut t = 0.5;
    while t < 2.5 {
        t += 1.0 / 60.0;
        field.advance(t, 1.0 / 60.0);
    }
    assert!(
        field.particles().is_empty(),
        "particle must be culled once it leaves [-0.1, 1.1] on either axis"
    );
}

#[test]
fn age_alone_never_kills_a_particle() {
    let mut field = ParticleField::new(still_config(), 5).expect("valid config");
    field.spawn_tick(0.0);

    // Far past lifespan, attack, and release
    field.advance(60.0, 1.0 / 60.0);
    assert_eq!(
        field.particles().len(),
        1,
        "an in-bounds particle outlives its envelopes"
    );
    assert!(
        field.particles()[0].opacity < 0.0,
        "opacity past full decay goes negative and the caller treats it as invisible"
    );
}

#[test]
fn opacity_rises_linearly_through_the_attack() {
    let mut field = ParticleField::new(still_config(), 11).expect("valid config");
    field.spawn_tick(0.0);
    field.advance(0.5, 0.5);

    let p = field.particles()[0];
    assert!(0.5 < p.attack, "attack window still open at age 0.5");
    let expected = 0.5 / p.attack;
    assert!(
        (p.opacity - expected).abs() < 1e-9,
        "opacity {} should be age/attack = {expected}",
        p.opacity
    );
}

#[test]
fn opacity_falls_through_the_release_after_attack() {
    let mut field = ParticleField::new(still_config(), 11).expect("valid config");
    field.spawn_tick(0.0);

    let age = 3.0;
    field.advance(age, 1.0 / 60.0);
    let p = field.particles()[0];
    assert!(age > p.attack);
    let expected = 1.0 - (age - p.attack) / p.release;
    assert!(
        (p.opacity - expected).abs() < 1e-9,
        "opacity {} should decay to {expected}",
        p.opacity
    );
}

#[test]
fn size_interpolates_over_total_lifespan_not_the_envelope() {
    let config = FieldConfig {
        speed: 0.0,
        speed_vary: 0.0,
        lifespan: 2.0,
        life_vary: 0.0,
        size_vary: 0.0,
        death_size: 0.5,
        ..FieldConfig::default()
    };
    let mut field = ParticleField::new(config, 9).expect("valid config");
    field.spawn_tick(0.0);

    // Halfway through the lifespan the size is halfway to start * death_size,
    // regardless of where the attack/release envelope sits
    field.advance(1.0, 1.0 / 60.0);
    let p = field.particles()[0];
    let expected = p.start_size + (p.start_size * 0.5 - p.start_size) * 0.5;
    assert!(
        (p.size - expected).abs() < 1e-9,
        "size {} should be {expected} at half lifespan",
        p.size
    );
}

#[test]
fn seeding_warms_the_field_up() {
    let mut field = ParticleField::new(FieldConfig::star(), 21).expect("valid config");
    assert!(field.particles().is_empty());

    field.seed(0.0, 2.0);
    assert!(
        field.particles().len() > 60,
        "two seconds of 60 Hz seeding should leave a dense field, got {}",
        field.particles().len()
    );
    assert!(
        field.particles().iter().any(|p| p.opacity > 0.0),
        "seeded particles are born mid-attack and already visible"
    );
}

#[test]
fn seeded_particles_are_born_mid_attack() {
    let mut field = ParticleField::new(still_config(), 33).expect("valid config");
    field.seed(10.0, 0.1);

    for p in field.particles() {
        assert!(
            p.birth_time < 10.0 - 0.05,
            "seeded birth time {} should be backdated by the attack",
            p.birth_time
        );
    }
}

#[test]
fn spawn_position_stays_inside_the_spawn_disc() {
    let config = FieldConfig {
        spawn_radius: 0.2,
        speed: 0.0,
        speed_vary: 0.0,
        ..FieldConfig::default()
    };
    let mut field = ParticleField::new(config, 13).expect("valid config");
    for step in 0..200 {
        field.spawn_tick(step as f64 / 60.0);
    }
    for p in field.particles() {
        let r = p.position.distance(DVec2::new(0.5, 0.5));
        assert!(r <= 0.2 + 1e-9, "spawn origin {r} outside the spawn disc");
    }
}

#[test]
fn same_seed_gives_identical_fields() {
    let mut a = ParticleField::new(FieldConfig::star(), 77).expect("valid config");
    let mut b = ParticleField::new(FieldConfig::star(), 77).expect("valid config");
    for step in 0..120 {
        let now = step as f64 / 60.0;
        a.update(now, 1.0 / 60.0);
        b.update(now, 1.0 / 60.0);
    }
    assert_eq!(a.particles().len(), b.particles().len());
    for (pa, pb) in a.particles().iter().zip(b.particles()) {
        assert_eq!(pa.position, pb.position);
        assert_eq!(pa.lifespan, pb.lifespan);
        assert_eq!(pa.color, pb.color);
    }
}

#[test]
fn config_validation_rejects_bad_parameters() {
    let empty_palette = FieldConfig {
        palette: Vec::new(),
        ..FieldConfig::default()
    };
    assert_eq!(
        ParticleField::new(empty_palette, 1).unwrap_err(),
        FieldError::EmptyPalette
    );

    let bad_probability = FieldConfig {
        probability: 1.5,
        ..FieldConfig::default()
    };
    assert_eq!(
        ParticleField::new(bad_probability, 1).unwrap_err(),
        FieldError::ProbabilityOutOfRange(1.5)
    );

    let negative_vary = FieldConfig {
        size_vary: -0.25,
        ..FieldConfig::default()
    };
    assert_eq!(
        ParticleField::new(negative_vary, 1).unwrap_err(),
        FieldError::NegativeVary(-0.25)
    );
}

#[test]
fn presets_match_their_calibration() {
    let star = FieldConfig::star();
    assert_eq!(star.speed, 0.1);
    assert_eq!(star.lifespan, 2.0);
    assert_eq!(star.probability, 1.0);
    assert_eq!(star.palette.len(), 1);
    assert_eq!(star.mode, BlendMode::Color);

    let ambient = FieldConfig::ambient();
    assert_eq!(ambient.probability, 0.1);
    assert_eq!(ambient.spawn_radius, 0.2);
    assert_eq!(ambient.max_opacity, 0.6);
    assert_eq!(ambient.attack, 10.0);
    assert_eq!(ambient.palette.len(), 6);
}
