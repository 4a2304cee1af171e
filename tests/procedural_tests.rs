// Host-side tests for the procedural scene content generators.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use starlit_journey::core::procedural::*;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

const EPS: f32 = 1e-5;

#[test]
fn heart_curve_hits_known_points() {
    let top = heart_curve(0.0);
    assert!(top.x.abs() < EPS);
    assert!((top.y - 5.0 / 16.0).abs() < EPS);

    let side = heart_curve(FRAC_PI_2);
    assert!((side.x - 1.0).abs() < EPS);
    assert!((side.y - 0.25).abs() < EPS);
}

#[test]
fn heart_outline_is_mirror_symmetric() {
    let pts = heart_outline(64);
    assert_eq!(pts.len(), 64);
    // The lower tip dips to -17/16.
    assert!(pts.iter().all(|p| p.x.abs() <= 1.0 + EPS && p.y.abs() <= 17.0 / 16.0 + EPS));
    // t and TAU - t mirror across the y axis.
    let a = heart_curve(0.7);
    let b = heart_curve(TAU - 0.7);
    assert!((a.x + b.x).abs() < 1e-4);
    assert!((a.y - b.y).abs() < 1e-4);
    assert!(heart_outline(0).is_empty());
}

#[test]
fn starfield_is_seeded_and_bounded() {
    let a = starfield(&mut StdRng::seed_from_u64(7), 200, 10.0, 40.0);
    let b = starfield(&mut StdRng::seed_from_u64(7), 200, 10.0, 40.0);
    assert_eq!(a, b);
    assert_eq!(a.len(), 200);
    for p in &a {
        let r = p.length();
        assert!((10.0 - 1e-3..40.0 + 1e-3).contains(&r), "radius {r}");
    }

    // Swapped bounds behave like ordered ones.
    let swapped = starfield(&mut StdRng::seed_from_u64(1), 50, 40.0, 10.0);
    assert!(swapped.iter().all(|p| p.length() >= 10.0 - 1e-3));
}

#[test]
fn petals_spawn_above_the_view_and_fall() {
    let petals = petal_spawns(&mut StdRng::seed_from_u64(3), 100, 8.0, 6.0);
    assert_eq!(petals.len(), 100);
    for p in &petals {
        assert!(p.position.y >= 3.0);
        assert!(p.position.x.abs() <= 4.0);
        assert!(p.fall_speed > 0.0);
        assert!(p.drift.abs() <= 0.3);
    }
}

#[test]
fn orbit_positions_sit_on_a_flat_ring() {
    let ring = orbit_positions(6, 2.5, 0.0);
    assert_eq!(ring.len(), 6);
    assert!((ring[0] - Vec3::new(2.5, 0.0, 0.0)).length() < EPS);
    for p in &ring {
        assert_eq!(p.y, 0.0);
        assert!((p.length() - 2.5).abs() < 1e-4);
    }
}

#[test]
fn stagger_delays_step_evenly() {
    let delays = stagger_delays(4, Duration::from_millis(200), Duration::from_millis(150));
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(200),
            Duration::from_millis(350),
            Duration::from_millis(500),
            Duration::from_millis(650),
        ]
    );
    assert!(stagger_delays(0, Duration::ZERO, Duration::from_secs(1)).is_empty());
}
