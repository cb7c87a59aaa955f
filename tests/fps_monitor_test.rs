//! Frame rate measurement and the compatibility gate

use squat_challenge::fps_monitor::{Compatibility, FpsMonitor};

#[test]
fn test_steady_30ms_frames_converge() {
    let mut monitor = FpsMonitor::new(30, 15.0, 20.0).starting_at(0.0);
    let mut report = None;
    for i in 1..=30 {
        report = Some(monitor.update_at(f64::from(i) * 30.0));
    }
    let report = report.unwrap();

    assert!((report.avg_fps - 1000.0 / 30.0).abs() < 1e-6);
    assert!(!report.is_low_performance);
    assert!(!report.show_warning);
    assert_eq!(report.frame_count, 30);
    assert!(monitor.compatibility().is_compatible());
}

#[test]
fn test_window_forgets_old_frames() {
    let mut monitor = FpsMonitor::new(10, 15.0, 20.0).starting_at(0.0);
    let mut t = 0.0;

    // Slow start, then a long fast stretch
    for _ in 0..10 {
        t += 100.0;
        monitor.update_at(t);
    }
    assert!(monitor.average_fps() < 15.0);

    for _ in 0..10 {
        t += 20.0;
        monitor.update_at(t);
    }
    assert!((monitor.average_fps() - 50.0).abs() < 1e-6);
}

#[test]
fn test_warning_band_between_thresholds() {
    let mut monitor = FpsMonitor::new(5, 15.0, 20.0).starting_at(0.0);
    let mut report = None;
    for i in 1..=5 {
        // 18 fps
        report = Some(monitor.update_at(f64::from(i) * 1000.0 / 18.0));
    }
    let report = report.unwrap();
    assert!(report.show_warning);
    assert!(!report.is_low_performance);
}

#[test]
fn test_gate_verdicts() {
    let mut slow = FpsMonitor::new(30, 15.0, 20.0).starting_at(0.0);
    assert_eq!(
        slow.compatibility(),
        Compatibility::Measuring {
            samples: 0,
            required: 30
        }
    );
    for i in 1..=30 {
        slow.update_at(f64::from(i) * 100.0);
    }
    assert!(matches!(slow.compatibility(), Compatibility::Incompatible { avg_fps } if (avg_fps - 10.0).abs() < 1e-6));

    let mut quick = FpsMonitor::new(30, 15.0, 20.0).with_min_samples(5).starting_at(0.0);
    for i in 1..=5 {
        quick.update_at(f64::from(i) * 40.0);
    }
    assert!(quick.compatibility().is_compatible());
}

#[test]
fn test_repeated_timestamps_are_ignored() {
    let mut monitor = FpsMonitor::new(30, 15.0, 20.0).starting_at(0.0);
    let first = monitor.update_at(50.0);
    let repeat = monitor.update_at(50.0);
    let earlier = monitor.update_at(10.0);

    assert_eq!(first, repeat);
    assert_eq!(first, earlier);
    assert_eq!(monitor.update_at(100.0).frame_count, 2);
}

#[test]
fn test_reset_restarts_measurement() {
    let mut monitor = FpsMonitor::new(30, 15.0, 20.0).starting_at(0.0);
    for i in 1..=30 {
        monitor.update_at(f64::from(i) * 33.0);
    }
    assert!(monitor.compatibility().is_compatible());

    monitor.reset_at(5000.0);
    assert_eq!(monitor.average_fps(), 0.0);
    assert!(matches!(monitor.compatibility(), Compatibility::Measuring { samples: 0, .. }));
    assert_eq!(monitor.update_at(5040.0).fps, 25.0);
}

#[test]
#[should_panic(expected = "Window size must be greater than 0")]
fn test_zero_window_panics() {
    let _ = FpsMonitor::new(0, 15.0, 20.0);
}
