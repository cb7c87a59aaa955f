//! Replay application: drives a challenge session from a recorded landmark stream.
//!
//! A recording is a JSON-lines file with one detector result per line:
//!
//! ```text
//! {"timestamp_ms": 0, "landmarks": [{"x": 0.5, "y": 0.2, "visibility": 0.9}, ...]}
//! {"timestamp_ms": 33, "landmarks": []}
//! ```
//!
//! The recording's timestamps are the session clock. Blank lines and lines
//! starting with `#` are skipped.

use crate::{
    config::Config,
    device::DeviceKind,
    landmarks::PoseFrame,
    session::{Announcement, CapturedFrame, ChallengeResult, SessionController, SessionHooks, SessionPhase},
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// One detector result from a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Session clock time of the frame
    pub timestamp_ms: u64,
    /// Landmarks, empty when the detector found nobody
    #[serde(default)]
    pub landmarks: PoseFrame,
}

/// Replay configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// JSON-lines recording to play
    pub recording: PathBuf,
    /// Challenge configuration
    pub config: Config,
    /// Device class whose thresholds apply
    pub device: DeviceKind,
    /// Where to write the result JSON, if anywhere
    pub export: Option<PathBuf>,
    /// Extra clock time after the last frame, so pending timers can finish
    pub tail_ms: u64,
}

/// Hooks that log announcements and keep them for inspection
#[derive(Debug, Default)]
pub struct LoggingHooks {
    announcements: Vec<Announcement>,
    phases: Vec<SessionPhase>,
}

impl LoggingHooks {
    /// Every announcement triggered so far, in order
    #[must_use]
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Every phase entered so far, in order
    #[must_use]
    pub fn phases(&self) -> &[SessionPhase] {
        &self.phases
    }
}

impl SessionHooks for LoggingHooks {
    fn announce(&mut self, announcement: Announcement) {
        info!("Announcement: {announcement}");
        self.announcements.push(announcement);
    }

    fn capture_frame(&mut self, now_ms: u64) -> Option<CapturedFrame> {
        // Recordings carry landmarks only, there is no video to grab
        debug!("Photo requested at {now_ms} ms");
        None
    }

    fn release_camera(&mut self) {
        debug!("Replay finished with the camera");
    }

    fn phase_changed(&mut self, _from: SessionPhase, to: SessionPhase) {
        self.phases.push(to);
    }
}

/// Read a JSON-lines recording
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line is not a valid frame,
/// or timestamps go backwards
pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedFrame>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut frames: Vec<RecordedFrame> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let frame: RecordedFrame = serde_json::from_str(trimmed)?;
        if let Some(previous) = frames.last() {
            if frame.timestamp_ms < previous.timestamp_ms {
                return Err(Error::InvalidInput(format!(
                    "line {}: timestamp {} is earlier than {}",
                    line_no + 1,
                    frame.timestamp_ms,
                    previous.timestamp_ms
                )));
            }
        }
        frames.push(frame);
    }

    Ok(frames)
}

/// Write a recording as JSON lines
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn save_recording<P: AsRef<Path>>(path: P, frames: &[RecordedFrame]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for frame in frames {
        serde_json::to_writer(&mut writer, frame)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Replay application
pub struct ReplayApp {
    config: ReplayConfig,
    frames: Vec<RecordedFrame>,
    session: SessionController<LoggingHooks>,
}

impl ReplayApp {
    /// Load the recording and create a session at its first timestamp
    pub fn new(config: ReplayConfig) -> Result<Self> {
        info!("Loading recording from {}", config.recording.display());
        let frames = load_recording(&config.recording)?;
        Self::from_frames(config, frames)
    }

    /// Create a session for frames that are already in memory
    pub fn from_frames(config: ReplayConfig, frames: Vec<RecordedFrame>) -> Result<Self> {
        let start_ms = frames
            .first()
            .map(|frame| frame.timestamp_ms)
            .ok_or_else(|| Error::InvalidInput("recording has no frames".to_string()))?;
        info!("{} frames, {} device profile", frames.len(), config.device);

        let session = SessionController::new(&config.config, config.device, LoggingHooks::default(), start_ms)?;
        Ok(Self {
            config,
            frames,
            session,
        })
    }

    /// The session being driven
    #[must_use]
    pub const fn session(&self) -> &SessionController<LoggingHooks> {
        &self.session
    }

    /// Play every frame, then let pending timers run for the configured tail
    ///
    /// # Errors
    ///
    /// Returns `DeviceIncompatible` if the recording's frame rate is too low,
    /// or an I/O error if the export cannot be written
    pub fn run(&mut self) -> Result<ChallengeResult> {
        let mut last_ms = 0;

        for frame in &self.frames {
            let t = frame.timestamp_ms;
            last_ms = t;

            if self.session.phase() == SessionPhase::Setup {
                self.session.record_render_frame(t);
                match self.session.start(t) {
                    Ok(()) | Err(Error::CompatibilityPending { .. }) => {}
                    Err(e) => {
                        self.session.exit();
                        return Err(e);
                    }
                }
            }

            self.session.process_frame(t, &frame.landmarks);
        }

        self.session.advance(last_ms + self.config.tail_ms);
        let summary = match self.session.result() {
            Some(result) => result,
            None => {
                warn!("Recording ended during {}", self.session.phase());
                self.session.summary()
            }
        };
        self.session.exit();

        info!(
            "Total squats: {} (round 1: {}, round 2: {})",
            summary.total_squats, summary.round1_count, summary.round2_count
        );

        if let Some(path) = &self.config.export {
            info!("Writing result to {}", path.display());
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &summary)?;
            writer.flush()?;
        }

        Ok(summary)
    }
}
