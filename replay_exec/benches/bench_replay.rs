//! # Replay Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use replay_lib::{
    loc::Pose,
    replay::{locate, HorizonBuilder, Params, PathPoint, ReplayPlanner},
};

/// Number of points in the generated trajectory, roughly a lap of a car park recorded at 100 Hz.
const NUM_POINTS: usize = 10_000;

fn replay_benchmark(c: &mut Criterion) {
    // ---- Build a dummy trajectory ----

    // Lazy figure of eight, one sample every 10 ms
    let mut data = String::from("latitude,longitude,altitude,yaw,vx,vy,vz,wx,wy,wz\n");
    let mut traj = Vec::with_capacity(NUM_POINTS);
    for i in 0..NUM_POINTS {
        let t = i as f64 * 0.01;
        let p = PathPoint {
            latitude: 50.0 * (0.05 * t).sin(),
            longitude: 25.0 * (0.1 * t).sin(),
            yaw: 0.05 * t,
            time_s: t,
            ..PathPoint::default()
        };
        data.push_str(&format!(
            "{},{},0,{},1,0,0,0,0,0.05\n",
            p.latitude, p.longitude, p.yaw
        ));
        traj.push(p);
    }

    let mut planner = ReplayPlanner::new(Params::default()).unwrap();
    planner.load_trajectory_from_reader(data.as_bytes()).unwrap();

    let pose = Pose::new(12.3, -4.5, 0.0, 0.2);
    let builder = HorizonBuilder::new(80, 0.01);

    c.bench_function("locate", |b| {
        b.iter(|| locate(black_box(pose.planar_position()), &traj))
    });

    c.bench_function("HorizonBuilder::build", |b| {
        b.iter(|| builder.build(black_box(NUM_POINTS - 40), &traj))
    });

    c.bench_function("ReplayPlanner::plan", |b| {
        b.iter(|| planner.plan(black_box(&pose)).unwrap())
    });
}

criterion_group!(benches, replay_benchmark);
criterion_main!(benches);
