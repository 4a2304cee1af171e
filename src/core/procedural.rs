//! Deterministic content generators shared by the scene components.
//!
//! Everything that needs randomness takes the caller's RNG so scenes can seed
//! per visit and replay identically.

use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;
use std::time::Duration;

/// Point on the classic parametric heart for `t` in radians, roughly in [-1, 1].
///
/// x = 16 sin^3 t, y = 13 cos t - 5 cos 2t - 2 cos 3t - cos 4t, both scaled by 1/16.
pub fn heart_curve(t: f32) -> Vec2 {
    let s = t.sin();
    let x = 16.0 * s * s * s;
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Vec2::new(x, y) / 16.0
}

/// `count` points evenly spaced along the heart outline.
pub fn heart_outline(count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| heart_curve(i as f32 / count.max(1) as f32 * TAU))
        .collect()
}

/// Points scattered in a spherical shell between `inner` and `outer` radius.
pub fn starfield<R: Rng>(rng: &mut R, count: usize, inner: f32, outer: f32) -> Vec<Vec3> {
    let (lo, hi) = if inner <= outer {
        (inner, outer)
    } else {
        (outer, inner)
    };
    (0..count)
        .map(|_| {
            // Uniform direction: z uniform in [-1, 1], azimuth uniform.
            let z: f32 = rng.gen_range(-1.0..=1.0);
            let phi: f32 = rng.gen_range(0.0..TAU);
            let r_xy = (1.0 - z * z).max(0.0).sqrt();
            let dir = Vec3::new(r_xy * phi.cos(), r_xy * phi.sin(), z);
            let radius = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            dir * radius
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PetalSpawn {
    pub position: Vec3,
    /// Sideways drift per second.
    pub drift: f32,
    /// Fall speed per second, always positive.
    pub fall_speed: f32,
    pub spin: f32,
}

/// Petals starting just above a `width` x `height` view centered on the origin.
pub fn petal_spawns<R: Rng>(rng: &mut R, count: usize, width: f32, height: f32) -> Vec<PetalSpawn> {
    let half_w = (width * 0.5).abs().max(f32::EPSILON);
    let top = height.abs() * 0.5;
    (0..count)
        .map(|_| PetalSpawn {
            position: Vec3::new(
                rng.gen_range(-half_w..half_w),
                top + rng.gen_range(0.0..height.abs().max(f32::EPSILON) * 0.5),
                rng.gen_range(-1.0..1.0),
            ),
            drift: rng.gen_range(-0.3..0.3),
            fall_speed: rng.gen_range(0.2..0.6),
            spin: rng.gen_range(-TAU..TAU),
        })
        .collect()
}

/// `count` positions on a horizontal ring, rotated by `phase` radians.
pub fn orbit_positions(count: usize, radius: f32, phase: f32) -> Vec<Vec3> {
    let step = TAU / count.max(1) as f32;
    (0..count)
        .map(|i| {
            let a = phase + i as f32 * step;
            Vec3::new(radius * a.cos(), 0.0, radius * a.sin())
        })
        .collect()
}

/// Start offsets for revealing `count` items one after another.
pub fn stagger_delays(count: usize, base: Duration, step: Duration) -> Vec<Duration> {
    (0..count).map(|i| base + step * i as u32).collect()
}
