//! Configuration management for the squat challenge

use crate::{
    constants::*,
    device::{DeviceKind, DeviceProfile},
    fps_monitor::FpsMonitor,
    position_validator::PositionValidator,
    squat_counter::SquatCounter,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Challenge configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Position check thresholds per device class
    pub device: DeviceConfig,

    /// Squat counter tuning
    pub squat: SquatCounterConfig,

    /// Phase durations and delays
    pub session: SessionTimings,

    /// Frame rate compatibility gate
    pub fps: FpsConfig,
}

/// Position check thresholds per device class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Thresholds for phones and tablets
    pub mobile: DeviceProfile,

    /// Thresholds for desktop webcams
    pub desktop: DeviceProfile,
}

/// Squat counter tuning, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquatCounterConfig {
    /// Hips, knees and ankles below this visibility make the frame unusable
    pub landmark_visibility_floor: f64,

    /// Minimum knee visibility for a down transition
    pub knee_visibility_floor: f64,

    /// Average knee angle counted as standing
    pub standing_angle: f64,

    /// Maximum left/right difference for recalibrating the standing baseline
    pub calibration_symmetry: f64,

    /// Down threshold below the standing baseline
    pub down_offset: f64,

    /// Down threshold before any baseline has been seen
    pub fallback_down_angle: f64,

    /// Maximum left/right difference for a down transition
    pub max_knee_asymmetry: f64,

    /// Minimum bend below the standing baseline for a down transition
    pub min_knee_bend: f64,

    /// Consecutive qualifying frames before a state change
    pub debounce_frames: u32,
}

/// Phase durations (seconds) and inter-phase delays (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTimings {
    /// Hydrate countdown
    pub hydrate_secs: u32,

    /// Length of each exercise round
    pub exercise_secs: u32,

    /// Recovery countdown between rounds
    pub recovery_secs: u32,

    /// Photo countdown
    pub picture_secs: u32,

    /// Seconds remaining at which hydrate/recovery reminders play
    pub announce_at_secs: u32,

    /// Seconds remaining at which the photo is taken
    pub capture_at_secs: u32,

    /// Accepted position to hydrate, before round one
    pub round1_position_delay_ms: u64,

    /// Accepted position to go, before round two
    pub round2_position_delay_ms: u64,

    /// End of hydrate countdown to go
    pub go_delay_ms: u64,

    /// Go to exercise
    pub go_duration_ms: u64,

    /// End of recovery countdown to the second position check
    pub recovery_exit_delay_ms: u64,

    /// End of round two to the photo countdown
    pub completion_delay_ms: u64,

    /// End of photo countdown to the result
    pub result_delay_ms: u64,
}

/// Frame rate compatibility gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsConfig {
    /// Number of frame samples averaged
    pub window_size: usize,

    /// Average below which the device cannot run the challenge
    pub low_performance_fps: f64,

    /// Average below which a warning is shown
    pub warning_fps: f64,

    /// Samples needed before a compatibility verdict
    pub min_samples: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mobile: DeviceProfile::mobile(),
            desktop: DeviceProfile::desktop(),
        }
    }
}

impl Default for SquatCounterConfig {
    fn default() -> Self {
        Self {
            landmark_visibility_floor: DEFAULT_LANDMARK_VISIBILITY_FLOOR,
            knee_visibility_floor: DEFAULT_KNEE_VISIBILITY_FLOOR,
            standing_angle: DEFAULT_STANDING_ANGLE,
            calibration_symmetry: DEFAULT_CALIBRATION_SYMMETRY,
            down_offset: DEFAULT_DOWN_OFFSET,
            fallback_down_angle: DEFAULT_FALLBACK_DOWN_ANGLE,
            max_knee_asymmetry: DEFAULT_MAX_KNEE_ASYMMETRY,
            min_knee_bend: DEFAULT_MIN_KNEE_BEND,
            debounce_frames: DEFAULT_DEBOUNCE_FRAMES,
        }
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            hydrate_secs: DEFAULT_HYDRATE_SECS,
            exercise_secs: DEFAULT_EXERCISE_SECS,
            recovery_secs: DEFAULT_RECOVERY_SECS,
            picture_secs: DEFAULT_PICTURE_SECS,
            announce_at_secs: DEFAULT_ANNOUNCE_AT_SECS,
            capture_at_secs: DEFAULT_CAPTURE_AT_SECS,
            round1_position_delay_ms: DEFAULT_ROUND1_POSITION_DELAY_MS,
            round2_position_delay_ms: DEFAULT_ROUND2_POSITION_DELAY_MS,
            go_delay_ms: DEFAULT_GO_DELAY_MS,
            go_duration_ms: DEFAULT_GO_DURATION_MS,
            recovery_exit_delay_ms: DEFAULT_RECOVERY_EXIT_DELAY_MS,
            completion_delay_ms: DEFAULT_COMPLETION_DELAY_MS,
            result_delay_ms: DEFAULT_RESULT_DELAY_MS,
        }
    }
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_FPS_WINDOW,
            low_performance_fps: DEFAULT_LOW_PERFORMANCE_FPS,
            warning_fps: DEFAULT_WARNING_FPS,
            min_samples: DEFAULT_FPS_WINDOW,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Thresholds for a device class
    #[must_use]
    pub const fn profile_for(&self, kind: DeviceKind) -> DeviceProfile {
        match kind {
            DeviceKind::Mobile => self.device.mobile,
            DeviceKind::Desktop => self.device.desktop,
        }
    }

    /// Create a position validator for a device class
    #[must_use]
    pub fn create_position_validator(&self, kind: DeviceKind) -> PositionValidator {
        PositionValidator::new(self.profile_for(kind))
    }

    /// Create a squat counter from the configured tuning
    #[must_use]
    pub fn create_squat_counter(&self) -> SquatCounter {
        SquatCounter::with_config(self.squat)
    }

    /// Create a frame rate monitor whose baseline is `now_ms`
    #[must_use]
    pub fn create_fps_monitor(&self, now_ms: f64) -> FpsMonitor {
        FpsMonitor::new(self.fps.window_size, self.fps.low_performance_fps, self.fps.warning_fps)
            .with_min_samples(self.fps.min_samples)
            .starting_at(now_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.device.mobile.validate()?;
        self.device.desktop.validate()?;

        // Squat counter
        let squat = &self.squat;
        if !(0.0..=1.0).contains(&squat.landmark_visibility_floor) || !(0.0..=1.0).contains(&squat.knee_visibility_floor)
        {
            return Err(Error::ConfigError(
                "Visibility floors must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=180.0).contains(&squat.standing_angle) || !(0.0..=180.0).contains(&squat.fallback_down_angle) {
            return Err(Error::ConfigError("Knee angles must be between 0 and 180 degrees".to_string()));
        }
        if squat.fallback_down_angle >= squat.standing_angle {
            return Err(Error::ConfigError(
                "Fallback down angle must be below the standing angle".to_string(),
            ));
        }
        if squat.down_offset <= 0.0 {
            return Err(Error::ConfigError("Down offset must be positive".to_string()));
        }
        if squat.debounce_frames == 0 {
            return Err(Error::ConfigError("Debounce frames must be greater than 0".to_string()));
        }

        // Session timings
        let session = &self.session;
        if session.hydrate_secs == 0
            || session.exercise_secs == 0
            || session.recovery_secs == 0
            || session.picture_secs == 0
        {
            return Err(Error::ConfigError("Phase durations must be greater than 0".to_string()));
        }
        if session.capture_at_secs == 0 || session.capture_at_secs > session.picture_secs {
            return Err(Error::ConfigError(
                "Capture mark must fall inside the photo countdown".to_string(),
            ));
        }

        // Frame rate gate
        if self.fps.window_size == 0 {
            return Err(Error::ConfigError("FPS window size must be greater than 0".to_string()));
        }
        if self.fps.low_performance_fps <= 0.0 || self.fps.warning_fps < self.fps.low_performance_fps {
            return Err(Error::ConfigError(
                "FPS thresholds must be positive with warning >= low performance".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Squat Challenge Configuration

# Position check thresholds
device:
  mobile:
    min_visibility: 0.3
    edge_margin: 0.02
    min_body_height: 0.3
    min_body_width: 0.05
    max_body_misalignment: 0.2
    required_valid_frames: 10
    audio_trigger_frames: 5
  desktop:
    min_visibility: 0.5
    edge_margin: 0.05
    min_body_height: 0.4
    min_body_width: 0.08
    max_body_misalignment: 0.15
    required_valid_frames: 20
    audio_trigger_frames: 10

# Squat counter (degrees)
squat:
  landmark_visibility_floor: 0.15
  knee_visibility_floor: 0.2
  standing_angle: 160.0
  calibration_symmetry: 25.0
  down_offset: 35.0
  fallback_down_angle: 135.0
  max_knee_asymmetry: 45.0
  min_knee_bend: 20.0
  debounce_frames: 2

# Phase durations (seconds) and delays (milliseconds)
session:
  hydrate_secs: 10
  exercise_secs: 50
  recovery_secs: 10
  picture_secs: 10
  announce_at_secs: 5
  capture_at_secs: 1
  round1_position_delay_ms: 3000
  round2_position_delay_ms: 1000
  go_delay_ms: 1000
  go_duration_ms: 2000
  recovery_exit_delay_ms: 1000
  completion_delay_ms: 3000
  result_delay_ms: 500

# Frame rate gate
fps:
  window_size: 30
  low_performance_fps: 15.0
  warning_fps: 20.0
  min_samples: 30
"#;
