//! Benchmarks for the layer engine.
//!
//! Run with: cargo bench -p snowpit-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use snowpit_core::{Point, ProfileConfig};
use snowpit_layout::{Profile, plan_push_down};
use std::hint::black_box;

/// A profile with `n` layers spread evenly down a 500 cm pit.
fn make_profile(n: usize) -> Profile {
    let config = ProfileConfig {
        default_pit_depth_cm: 500.0,
        initial_layer_count: n,
        initial_layer_spacing_cm: 480.0 / n as f64,
        ..ProfileConfig::default()
    };
    Profile::new(config).expect("bench config is valid")
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer/drag_step");
    for n in [3, 10, 50] {
        group.bench_with_input(BenchmarkId::new("interior", n), &n, |b, &n| {
            let mut profile = make_profile(n);
            let layer = profile.layers().layer(n / 2).expect("interior layer");
            let (id, handle) = (layer.id(), layer.handle());
            profile.press_handle(id, 1, handle).expect("press");
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let dy = if flip { 0.5 } else { -0.5 };
                black_box(
                    profile
                        .drag_handle(1, Point::new(handle.x + 40.0, handle.y + dy))
                        .expect("drag"),
                )
            });
        });
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer/insert_below");
    for n in [3, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || make_profile(n),
                |mut profile| black_box(profile.insert_below(0).expect("room")),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_push_down_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer/push_down_plan");
    for n in [10, 100, 1000] {
        // Every gap is tight, so the cascade runs the full profile.
        let depths: Vec<f64> = (0..n).map(|i| i as f64 * 1.5).collect();
        let pit_depth = n as f64 * 2.0;
        group.bench_with_input(BenchmarkId::from_parameter(n), &depths, |b, depths| {
            b.iter(|| black_box(plan_push_down(depths, 0, 1.0, pit_depth)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_drag, bench_insert, bench_push_down_cascade);
criterion_main!(benches);
