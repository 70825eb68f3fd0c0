//! # Trajectory Generation Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prof_lib::{
    drive::{DriveParams, TankDrive},
    path::{Path, PathPoint, Point},
    traj_gen::TrajGen,
    units::{ChassisAcceleration, ChassisVelocity},
};

fn generate_benchmark(c: &mut Criterion) {
    // ---- Build the drive and a path with a slow section and a stop ----

    let drive = TankDrive::new(
        DriveParams {
            name: String::from("bench"),
            max_velocity: ChassisVelocity::new(8.0),
            max_acceleration: ChassisAcceleration::new(10.0),
            motor_rot_per_ft: 8.5,
            iteration_period_ms: 10,
        },
        2.75,
    )
    .unwrap();

    let point = |d: f64, v: f64| {
        PathPoint::new(
            Point::along(d),
            ChassisVelocity::new(v),
            ChassisAcceleration::new(5.0),
        )
    };

    let path = Path::new(vec![
        point(0.0, 6.0),
        point(10.0, 2.0),
        point(14.0, 6.0),
        point(30.0, 6.0),
        point(30.0, 4.0),
        point(45.0, 0.0),
    ])
    .unwrap();

    let traj_gen = TrajGen::default();

    c.bench_function("generate 45 ft path", |b| {
        b.iter(|| traj_gen.generate(black_box(&path), black_box(&drive)).unwrap())
    });
}

criterion_group!(benches, generate_benchmark);
criterion_main!(benches);
