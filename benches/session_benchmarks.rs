//! Benchmarks for driving a whole challenge session

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use squat_challenge::{
    config::Config,
    constants::{
        LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
    },
    device::DeviceKind,
    landmarks::Landmark,
    session::{NoHooks, SessionController},
};

/// Upright body whose legs are straight
fn standing() -> Vec<Landmark> {
    let mut frame = vec![Landmark::new(0.5, 0.5, 0.9); 33];
    frame[LEFT_SHOULDER] = Landmark::new(0.6, 0.2, 0.95);
    frame[RIGHT_SHOULDER] = Landmark::new(0.4, 0.2, 0.95);
    frame[LEFT_HIP] = Landmark::new(0.57, 0.5, 0.95);
    frame[RIGHT_HIP] = Landmark::new(0.43, 0.5, 0.95);
    for (knee, ankle, x) in [(LEFT_KNEE, LEFT_ANKLE, 0.57), (RIGHT_KNEE, RIGHT_ANKLE, 0.43)] {
        frame[knee] = Landmark::new(x, 0.65, 0.95);
        frame[ankle] = Landmark::new(x, 0.8, 0.95);
    }
    frame
}

/// Start a session, then feed frames at 30 fps for two simulated minutes
fn run_session(config: &Config, frame: &[Landmark]) -> u32 {
    let Ok(mut session) = SessionController::new(config, DeviceKind::Desktop, NoHooks, 0) else {
        return 0;
    };
    for i in 1..=30 {
        session.record_render_frame(i * 33);
    }
    if session.start(1000).is_err() {
        return 0;
    }

    let mut t = 1000;
    while t < 121_000 {
        t += 33;
        black_box(session.process_frame(t, frame));
    }
    session.total_squats()
}

fn benchmark_session(c: &mut Criterion) {
    let config = Config::default();
    let frame = standing();

    c.bench_function("session_two_minutes", |b| {
        b.iter(|| run_session(black_box(&config), black_box(&frame)));
    });

    c.bench_function("session_clock_jump", |b| {
        b.iter(|| {
            let Ok(mut session) = SessionController::new(&config, DeviceKind::Mobile, NoHooks, 0) else {
                return;
            };
            for i in 1..=30 {
                session.record_render_frame(i * 33);
            }
            if session.start(1000).is_ok() {
                for i in 1..=10 {
                    session.process_frame(1000 + i * 33, &frame);
                }
                session.advance(black_box(200_000));
            }
        });
    });
}

criterion_group!(benches, benchmark_session);
criterion_main!(benches);
