use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fridge_farm::farm::{layout, DEFAULT_POD_COUNT, DEFAULT_TURNS};
use fridge_farm::geometry::tube_geometry;
use fridge_farm::math::Curve;
use fridge_farm::renderer::plan_draws;
use fridge_farm::scenes::{FridgeDimensions, FridgeScene};
use glam::Vec3;

/// Benchmark: Pod layout for growing pod counts
fn bench_pod_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("pod_layout");
    let helix = FridgeDimensions::default()
        .helix_params(DEFAULT_TURNS, DEFAULT_POD_COUNT)
        .unwrap();
    let curve = helix.curve();
    let pole = helix.pole_center();

    for pods in [1, 20, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(pods), pods, |b, &pods| {
            b.iter(|| black_box(layout(black_box(&curve), pods, pole)))
        });
    }
    group.finish();
}

/// Benchmark: Sampling the helix at the ramp resolution
fn bench_curve_sampling(c: &mut Criterion) {
    let curve = FridgeDimensions::default()
        .helix_params(DEFAULT_TURNS, DEFAULT_POD_COUNT)
        .unwrap()
        .curve();

    c.bench_function("helix_points_100", |b| {
        b.iter(|| black_box(curve.points(black_box(100))))
    });
}

/// Benchmark: Ramp tube generation at several resolutions
fn bench_tube_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tube_generation");
    let curve = FridgeDimensions::default()
        .helix_params(DEFAULT_TURNS, DEFAULT_POD_COUNT)
        .unwrap()
        .curve();

    for segments in [50u32, 100, 400].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(segments), segments, |b, &segments| {
            b.iter(|| black_box(tube_geometry(&curve, segments, 0.05, 8)))
        });
    }
    group.finish();
}

/// Benchmark: Full helix subtree rebuild inside the fridge
fn bench_farm_rebuild(c: &mut Criterion) {
    let mut scene = FridgeScene::build(FridgeDimensions::default(), DEFAULT_TURNS, DEFAULT_POD_COUNT).unwrap();

    c.bench_function("farm_rebuild_20_pods", |b| {
        b.iter(|| black_box(scene.rebuild_farm(DEFAULT_TURNS, DEFAULT_POD_COUNT).unwrap()))
    });
}

/// Benchmark: Sorting the whole scene into draw order
fn bench_draw_planning(c: &mut Criterion) {
    let scene = FridgeScene::build(FridgeDimensions::default(), DEFAULT_TURNS, DEFAULT_POD_COUNT).unwrap();
    let eye = Vec3::new(0.0, 1.5, 6.0);

    c.bench_function("plan_draws_fridge", |b| {
        b.iter(|| black_box(plan_draws(&scene.graph, &scene.materials, black_box(eye))))
    });
}

criterion_group!(
    benches,
    bench_pod_layout,
    bench_curve_sampling,
    bench_tube_generation,
    bench_farm_rebuild,
    bench_draw_planning,
);

criterion_main!(benches);
