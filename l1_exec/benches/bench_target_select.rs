//! # Target Selection Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::msg::PathMsg;
use l1_lib::{
    frames::StaticFrameTransform,
    l1_ctrl::{lookahead_distance, TargetSelector},
    loc::Pose,
};

fn target_select_benchmark(c: &mut Criterion) {
    // ---- Build a long winding path ----

    let points: Vec<(f64, f64)> = (0..5000)
        .map(|i| {
            let x = i as f64 * 0.05;
            (x, (x * 0.2).sin() * 3.0)
        })
        .collect();

    let mut selector = TargetSelector::new(lookahead_distance(1.0), "odom", "map");
    selector.set_path(&PathMsg::from_points("map", &points));

    let tf = StaticFrameTransform::identity("map", "odom");

    // Vehicle near the start and near the end of the path, the latter forcing a scan of almost
    // every waypoint
    let start = Pose::new(0.0, 0.0, 0.0);
    let end = Pose::new(245.0, (245.0f64 * 0.2).sin() * 3.0, 0.0);

    c.bench_function("select_target_path_start", |b| {
        b.iter(|| selector.select_target(black_box(&start), false, &tf))
    });

    c.bench_function("select_target_path_end", |b| {
        b.iter(|| selector.select_target(black_box(&end), false, &tf))
    });
}

criterion_group!(benches, target_select_benchmark);
criterion_main!(benches);
