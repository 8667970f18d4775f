// Integration tests for the closed-form spring evaluator.

use vortex_core::constants::SETTLE_TOLERANCE;
use vortex_core::Spring;

#[test]
fn spring_starts_at_rest() {
    for spring in [Spring::bouncy(), Spring::snappy()] {
        assert_eq!(spring.value(1.0, 0.0), 0.0);
        assert_eq!(spring.value(5.0, 0.0), 0.0);
    }
}

#[test]
fn negative_time_clamps_to_trigger() {
    for spring in [Spring::bouncy(), Spring::snappy()] {
        for t in [-0.001, -1.0, -100.0] {
            assert_eq!(
                spring.value(1.0, t),
                0.0,
                "pre-trigger sample at t={t} must not move"
            );
        }
    }
}

#[test]
fn snappy_is_monotonic_non_decreasing() {
    let spring = Spring::snappy();
    let mut prev = 0.0;
    for step in 0..=3000 {
        let t = step as f64 * 0.001;
        let v = spring.value(1.0, t);
        assert!(
            v + 1e-12 >= prev,
            "snappy output decreased at t={t}: {prev} -> {v}"
        );
        prev = v;
    }
}

#[test]
fn bouncy_overshoots_then_settles() {
    let spring = Spring::bouncy();
    let peak = (0..=2000)
        .map(|step| spring.value(1.0, step as f64 * 0.001))
        .fold(f64::MIN, f64::max);
    assert!(
        peak > 1.01,
        "bouncy spring should overshoot its target, peak was {peak}"
    );

    let settled = spring.value(1.0, spring.settling_duration());
    assert!(
        (settled - 1.0).abs() <= 2.0 * SETTLE_TOLERANCE,
        "bouncy spring not settled at its settling duration: {settled}"
    );
}

#[test]
fn converges_to_target_at_settling_duration() {
    for spring in [Spring::bouncy(), Spring::snappy()] {
        for target in [0.25, 1.0, 3.0, -2.0] {
            let settle = spring.settling_duration();
            let v = spring.value(target, settle);
            assert!(
                (v - target).abs() <= target.abs() * 2.0 * SETTLE_TOLERANCE,
                "target {target} not reached at settling duration: {v}"
            );
        }
    }
}

#[test]
fn stays_settled_after_settling_duration() {
    for spring in [Spring::bouncy(), Spring::snappy()] {
        let settle = spring.settling_duration();
        for extra in [0.0, 0.05, 0.5, 5.0] {
            let v = spring.value(1.0, settle + extra);
            assert!(
                (v - 1.0).abs() <= 2.0 * SETTLE_TOLERANCE,
                "output left the tolerance band {extra}s after settling: {v}"
            );
        }
    }
}

#[test]
fn close_preset_settles_faster_than_open() {
    assert!(Spring::snappy().settling_duration() < Spring::bouncy().settling_duration());
}

#[test]
fn response_scales_linearly_with_target() {
    let spring = Spring::bouncy();
    for step in 1..50 {
        let t = step as f64 * 0.02;
        let unit = spring.value(1.0, t);
        let tripled = spring.value(3.0, t);
        assert!(
            (tripled - 3.0 * unit).abs() < 1e-9,
            "spring response must be linear in the target at t={t}"
        );
    }
}
