//! Constants used throughout the library

/// Number of landmarks the pose detector produces for a full body
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Landmark indices (detector-defined)
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Landmarks that must be visible and in frame during a position check
pub const KEY_BODY_LANDMARKS: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

/// Landmarks the squat counter needs (hip, knee, ankle on both sides)
pub const LEG_LANDMARKS: [usize; 6] = [LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE];

/// Squat counter defaults (degrees unless noted)
pub const DEFAULT_LANDMARK_VISIBILITY_FLOOR: f64 = 0.15;
pub const DEFAULT_KNEE_VISIBILITY_FLOOR: f64 = 0.2;
pub const DEFAULT_STANDING_ANGLE: f64 = 160.0;
pub const DEFAULT_CALIBRATION_SYMMETRY: f64 = 25.0;
pub const DEFAULT_DOWN_OFFSET: f64 = 35.0;
pub const DEFAULT_FALLBACK_DOWN_ANGLE: f64 = 135.0;
pub const DEFAULT_MAX_KNEE_ASYMMETRY: f64 = 45.0;
pub const DEFAULT_MIN_KNEE_BEND: f64 = 20.0;
pub const DEFAULT_DEBOUNCE_FRAMES: u32 = 2;

/// Depth tracker starting value (fully extended leg)
pub const STRAIGHT_ANGLE: f64 = 180.0;

/// Frame rate monitor defaults
pub const DEFAULT_FPS_WINDOW: usize = 30;
pub const DEFAULT_LOW_PERFORMANCE_FPS: f64 = 15.0;
pub const DEFAULT_WARNING_FPS: f64 = 20.0;

/// Minimum time between two "position good" announcements
pub const POSITION_SPEECH_COOLDOWN_MS: u64 = 5_000;

/// Session timing defaults
pub const DEFAULT_HYDRATE_SECS: u32 = 10;
pub const DEFAULT_EXERCISE_SECS: u32 = 50;
pub const DEFAULT_RECOVERY_SECS: u32 = 10;
pub const DEFAULT_PICTURE_SECS: u32 = 10;
pub const DEFAULT_ANNOUNCE_AT_SECS: u32 = 5;
pub const DEFAULT_CAPTURE_AT_SECS: u32 = 1;

/// Inter-phase delays in milliseconds
pub const DEFAULT_ROUND1_POSITION_DELAY_MS: u64 = 3_000;
pub const DEFAULT_ROUND2_POSITION_DELAY_MS: u64 = 1_000;
pub const DEFAULT_GO_DELAY_MS: u64 = 1_000;
pub const DEFAULT_GO_DURATION_MS: u64 = 2_000;
pub const DEFAULT_RECOVERY_EXIT_DELAY_MS: u64 = 1_000;
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 3_000;
pub const DEFAULT_RESULT_DELAY_MS: u64 = 500;

/// Countdown tick length
pub const TICK_MS: u64 = 1_000;
