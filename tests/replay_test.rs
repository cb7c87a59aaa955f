//! Replay of synthetic detector recordings through the whole challenge


use squat_challenge::{
    app::{save_recording, RecordedFrame, ReplayApp, ReplayConfig},
    config::Config,
    device::DeviceKind,
    landmarks::Landmark,
    session::{Round, SessionPhase},
    Error,
};
use std::path::PathBuf;
use test_helpers::{body_with_knee_angle, standing_body, FRAME_MS, REP_ANGLES};

/// Builds a recording by appending frames at a steady rate
struct RecordingBuilder {
    frames: Vec<RecordedFrame>,
    t: u64,
}

impl RecordingBuilder {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            t: 0,
        }
    }

    /// Empty detector results, used while the frame rate is measured
    fn empty(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.push(Vec::new());
        }
        self
    }

    fn standing(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.push(standing_body());
        }
        self
    }

    fn reps(mut self, count: usize) -> Self {
        for _ in 0..count {
            for angle in REP_ANGLES {
                self.push(body_with_knee_angle(angle));
            }
        }
        self
    }

    /// Leave a gap of `ms` with no frames
    fn wait(mut self, ms: u64) -> Self {
        self.t += ms;
        self
    }

    fn push(&mut self, landmarks: Vec<Landmark>) {
        self.frames.push(RecordedFrame {
            timestamp_ms: self.t,
            landmarks,
        });
        self.t += FRAME_MS;
    }

    fn build(self) -> Vec<RecordedFrame> {
        self.frames
    }
}

/// Position, hydrate and go for one round, then `reps` squats
fn round(builder: RecordingBuilder, reps: usize) -> RecordingBuilder {
    builder
        .standing(20)
        // Entry delay, hydrate or go lead-in, go display
        .wait(17_000)
        .reps(reps)
}

fn full_challenge(round1: usize, round2: usize) -> Vec<RecordedFrame> {
    let builder = RecordingBuilder::new().empty(31);
    let builder = round(builder, round1).wait(62_000);
    round(builder, round2).build()
}

fn config(tail_ms: u64) -> ReplayConfig {
    ReplayConfig {
        recording: PathBuf::new(),
        config: Config::default(),
        device: DeviceKind::Desktop,
        export: None,
        tail_ms,
    }
}

#[test]
fn test_replay_reaches_result() {
    let mut app = ReplayApp::from_frames(config(70_000), full_challenge(3, 2)).unwrap();
    let result = app.run().unwrap();

    assert_eq!(result.total_squats, 5);
    assert_eq!(result.round1_count, 3);
    assert_eq!(result.round2_count, 2);
    assert!(result.photo.is_none());

    let session = app.session();
    assert_eq!(session.phase(), SessionPhase::Result);
    assert!(!session.is_running());

    let entered: Vec<&str> = session.hooks().phases().iter().map(SessionPhase::name).collect();
    assert_eq!(
        entered,
        vec![
            "position_before_round_1",
            "hydrate",
            "go",
            "exercise",
            "recovery",
            "position_before_round_2",
            "go",
            "exercise",
            "completed",
            "take_picture",
            "result",
        ]
    );
}

#[test]
fn test_truncated_replay_returns_partial_summary() {
    let builder = RecordingBuilder::new().empty(31);
    let frames = round(builder, 4).build();

    let mut app = ReplayApp::from_frames(config(0), frames).unwrap();
    let result = app.run().unwrap();

    assert_eq!(result.total_squats, 4);
    assert_eq!(result.round1_count, 4);
    assert_eq!(result.round2_count, 0);
    assert_eq!(app.session().phase(), SessionPhase::Exercise { round: Round::One });
}

#[test]
fn test_replay_from_file_with_export() {
    let dir = std::env::temp_dir();
    let recording = dir.join(format!("squat_replay_{}.jsonl", std::process::id()));
    let export = dir.join(format!("squat_result_{}.json", std::process::id()));
    save_recording(&recording, &full_challenge(1, 1)).unwrap();

    let mut app = ReplayApp::new(ReplayConfig {
        recording: recording.clone(),
        export: Some(export.clone()),
        ..config(70_000)
    })
    .unwrap();
    let result = app.run().unwrap();

    let written = std::fs::read_to_string(&export).unwrap();
    std::fs::remove_file(&recording).ok();
    std::fs::remove_file(&export).ok();

    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(result.total_squats, 2);
    assert_eq!(json["total_squats"], 2);
    assert_eq!(json["round1_count"], 1);
    assert_eq!(json["round2_count"], 1);
    assert!(json.get("photo").is_none());
}

#[test]
fn test_missing_recording_is_an_io_error() {
    let result = ReplayApp::new(ReplayConfig {
        recording: std::env::temp_dir().join("squat_replay_does_not_exist.jsonl"),
        ..config(0)
    });
    assert!(matches!(result, Err(Error::Io(_))));
}
