//! Random star-shaped rings (radial jitter + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic sampler of simple polygons for property
//!   tests and benches. Draws are reproducible from a `(seed, index)` token.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, and connect the points in angle order around `center`.
//!   Every ray from `center` meets the boundary once, so the ring is simple
//!   and counter-clockwise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{Point, Ring};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `base_radius * (1 + u)` with `u∈[-radial_jitter, radial_jitter]`. Clamped to [0, 0.95].
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 5, max: 16 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.5,
            base_radius: 1.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a closed, counter-clockwise, star-shaped ring around `center`.
pub fn draw_ring_radial(cfg: RadialCfg, tok: ReplayToken, center: Point) -> Ring {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1e-6);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let mut points: Vec<Point> = (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let th = phase + (k as f64) * delta + jitter;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            Point::new(center.x + th.cos() * r, center.y + th.sin() * r)
        })
        .collect();
    points.push(points[0]);
    Ring::new(points)
}
