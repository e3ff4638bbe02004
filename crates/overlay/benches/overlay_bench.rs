//! Criterion benchmarks for the overlay pipeline on random star polygons.
//! Focus sizes: vertices per ring in {8, 32, 128, 512}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p overlay

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use overlay::prelude::*;

fn ring_pair(n: usize, index: u64) -> (MultiPolygon, MultiPolygon) {
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(n),
        ..RadialCfg::default()
    };
    let a = draw_ring_radial(cfg, ReplayToken::new(43, 2 * index), Point::new(0.0, 0.0));
    let b = draw_ring_radial(cfg, ReplayToken::new(43, 2 * index + 1), Point::new(0.4, 0.3));
    let lift = |r: Ring| MultiPolygon::new(vec![Polygon::new(r, Vec::new())]);
    (lift(a), lift(b))
}

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");
    let strategy = Cartesian::default();
    for &n in &[8usize, 32, 128, 512] {
        group.bench_with_input(BenchmarkId::new("compute_turns", n), &n, |b, &n| {
            let (ga, gb) = ring_pair(n, 0);
            b.iter(|| {
                let _turns = compute_turns(&Inputs::new(&ga, &gb), &strategy);
            })
        });

        group.bench_with_input(BenchmarkId::new("union_pipeline", n), &n, |b, &n| {
            let (ga, gb) = ring_pair(n, 1);
            b.iter_batched(
                || {
                    let inputs = Inputs::new(&ga, &gb);
                    let mut turns = compute_turns(&inputs, &strategy);
                    let clusters = enrich_and_cluster(&mut turns, &inputs, &strategy);
                    (turns, clusters)
                },
                |(mut turns, clusters)| {
                    let inputs = Inputs::new(&ga, &gb);
                    detect_regions(&mut turns, &clusters, Operation::Union);
                    let _rings =
                        traverse(&inputs, &mut turns, &clusters, Operation::Union, &strategy);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("overlay_intersection", n), &n, |b, &n| {
            let (ga, gb) = ring_pair(n, 2);
            let (a, b2) = (Geometry::MultiPolygon(ga), Geometry::MultiPolygon(gb));
            let cfg = OverlayCfg::default();
            b.iter(|| {
                let _res = overlay(&a, &b2, OverlayKind::Intersection, &cfg);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_overlay);
criterion_main!(benches);
