use rand::prelude::*;
use strip_core::*;

#[test]
fn tick_moves_alpha_of_the_remaining_distance() {
    let mut t = TimelineTracker::new(0.02);
    let p = t.tick(0.5, 20.0);
    assert!((p - 0.2).abs() < 1e-6, "expected 10 * 0.02, got {p}");
    let p2 = t.tick(0.5, 20.0);
    assert!((p2 - (0.2 + (10.0 - 0.2) * 0.02)).abs() < 1e-6);
    let state = t.state();
    assert_eq!(state.raw_position, 0.5);
    assert_eq!(state.sequence_length, 20.0);
    assert!((state.target() - 10.0).abs() < 1e-6);
}

#[test]
fn default_tracker_uses_reference_smoothing() {
    let t = TimelineTracker::default();
    assert_eq!(t.alpha(), SMOOTH_FACTOR);
    assert_eq!(t.position(), 0.0);
}

#[test]
fn converges_toward_target_without_overshoot() {
    let mut t = TimelineTracker::new(0.02);
    let mut prev = t.position();
    for _ in 0..2000 {
        let p = t.tick(1.0, 20.0);
        assert!(p >= prev, "position must never move away from the target");
        assert!(p <= 20.0, "position overshot the target: {p}");
        prev = p;
    }
    assert!((20.0 - prev) < 1e-3, "should have nearly converged, got {prev}");
}

// Property: for any alpha in (0,1) and any target sequence, each tick lands
// strictly between the previous value and the target (or on it if already there).
#[test]
fn each_tick_lies_between_previous_and_target() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let alpha: f32 = rng.gen_range(0.01..0.99);
        let len: f32 = rng.gen_range(1.0..50.0);
        let mut t = TimelineTracker::new(alpha);
        for _ in 0..200 {
            let raw: f32 = rng.gen_range(0.0..=1.0);
            let before = t.position();
            let target = raw * len;
            let after = t.tick(raw, len);
            let (lo, hi) = if before <= target {
                (before, target)
            } else {
                (target, before)
            };
            assert!(
                after >= lo - 1e-5 && after <= hi + 1e-5,
                "alpha={alpha} before={before} target={target} after={after}"
            );
            if (target - before).abs() > 0.1 {
                assert!(after != before, "tick made no progress");
                assert!(after != target, "tick jumped straight to the target");
            }
        }
    }
}

#[test]
fn non_finite_input_keeps_previous_position() {
    let mut t = TimelineTracker::new(0.5);
    let p = t.tick(1.0, 10.0);
    assert_eq!(t.tick(f32::NAN, 10.0), p);
    assert_eq!(t.tick(0.5, f32::INFINITY), p);
    assert!(t.position().is_finite());
}
