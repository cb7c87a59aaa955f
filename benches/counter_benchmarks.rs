//! Benchmarks for per-frame analysis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use squat_challenge::{
    constants::{
        LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
    },
    device::DeviceProfile,
    fps_monitor::FpsMonitor,
    geometry::calculate_angle,
    landmarks::Landmark,
    position_validator::PositionValidator,
    squat_counter::SquatCounter,
};

/// Front-facing body with both knees at `deg`, plus a little detector jitter
fn body(deg: f64) -> Vec<Landmark> {
    let jitter = || 0.002 * (rand::random::<f64>() - 0.5);
    let mut frame = vec![Landmark::new(0.5, 0.4, 0.9); 33];
    frame[LEFT_SHOULDER] = Landmark::new(0.6 + jitter(), 0.2 + jitter(), 0.95);
    frame[RIGHT_SHOULDER] = Landmark::new(0.4 + jitter(), 0.2 + jitter(), 0.95);

    for (hip, knee, ankle, x, side) in [
        (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 0.57, 1.0),
        (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 0.43, -1.0),
    ] {
        let theta = deg.to_radians();
        frame[hip] = Landmark::new(x + jitter(), 0.5 + jitter(), 0.95);
        frame[knee] = Landmark::new(x, 0.65, 0.95);
        frame[ankle] = Landmark::new(x + side * 0.15 * theta.sin(), 0.65 - 0.15 * theta.cos(), 0.95);
    }
    frame
}

fn benchmark_angle(c: &mut Criterion) {
    c.bench_function("calculate_angle", |b| {
        b.iter(|| calculate_angle(black_box((0.5, 0.5)), black_box((0.5, 0.65)), black_box((0.6, 0.75))));
    });
}

fn benchmark_squat_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("squat_counter");

    // One rep sampled at 30 fps over two seconds
    let rep: Vec<Vec<Landmark>> = (0..60)
        .map(|i| {
            let t = f64::from(i) / 60.0 * std::f64::consts::TAU;
            body(135.0 + 40.0 * t.cos())
        })
        .collect();

    group.bench_with_input(BenchmarkId::new("single_frame", "standing"), &rep[0], |b, frame| {
        let mut counter = SquatCounter::new();
        b.iter(|| black_box(counter.process(black_box(frame))));
    });

    group.bench_with_input(BenchmarkId::new("sequence", "one_rep"), &rep, |b, frames| {
        b.iter(|| {
            let mut counter = SquatCounter::new();
            for frame in frames {
                black_box(counter.process(black_box(frame)));
            }
            counter.count()
        });
    });

    group.finish();
}

fn benchmark_position_validator(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_validator");

    for (name, profile) in [("mobile", DeviceProfile::mobile()), ("desktop", DeviceProfile::desktop())] {
        let frame = body(178.0);
        group.bench_with_input(BenchmarkId::new("validate", name), &frame, |b, frame| {
            let mut validator = PositionValidator::new(profile);
            let mut t = 0;
            b.iter(|| {
                t += 33;
                black_box(validator.validate(black_box(frame), t))
            });
        });
    }

    group.finish();
}

fn benchmark_fps_monitor(c: &mut Criterion) {
    c.bench_function("fps_monitor_update", |b| {
        let mut monitor = FpsMonitor::default().starting_at(0.0);
        let mut t = 0.0;
        b.iter(|| {
            t += 33.3;
            black_box(monitor.update_at(t))
        });
    });
}

criterion_group!(
    benches,
    benchmark_angle,
    benchmark_squat_counter,
    benchmark_position_validator,
    benchmark_fps_monitor
);
criterion_main!(benches);
