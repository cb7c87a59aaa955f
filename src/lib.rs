//! Core of a camera-based squat challenge.
//!
//! This library turns a stream of body landmarks from an external pose
//! detector into a two-round timed squat challenge:
//! - Position validation to make sure the user is fully and squarely in view
//! - Repetition counting from knee angles with calibration and hysteresis
//! - Frame rate monitoring to reject devices too slow to track reliably
//! - A session state machine sequencing setup, position checks, hydrate,
//!   exercise, recovery, photo and result phases
//!
//! The pose detector, audio playback and image composition are collaborators
//! outside this crate. The session reaches them through
//! [`session::SessionHooks`].
//!
//! # Examples
//!
//! ## Counting Squats
//!
//! ```no_run
//! use squat_challenge::{landmarks::Landmark, squat_counter::SquatCounter};
//!
//! # fn next_frame() -> Option<Vec<Landmark>> { None }
//! let mut counter = SquatCounter::new();
//!
//! while let Some(frame) = next_frame() {
//!     let result = counter.process(&frame);
//!     if result.new_count {
//!         println!("Rep {}", result.count);
//!     }
//! }
//!
//! // Start the next round from zero
//! counter.reset_count();
//! ```
//!
//! ## Checking Position
//!
//! ```no_run
//! use squat_challenge::{
//!     device::{DeviceKind, DeviceProfile},
//!     position_validator::PositionValidator,
//! };
//!
//! # let frame: Vec<squat_challenge::landmarks::Landmark> = Vec::new();
//! # let now_ms = 0_u64;
//! let kind = DeviceKind::from_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)");
//! let mut validator = PositionValidator::new(DeviceProfile::for_kind(kind));
//!
//! let result = validator.validate(&frame, now_ms);
//! if !result.is_valid {
//!     println!("{}", result.message);
//! }
//! ```
//!
//! ## Running a Session
//!
//! ```no_run
//! use squat_challenge::{
//!     config::Config,
//!     device::DeviceKind,
//!     session::{FrameOutcome, NoHooks, SessionController},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # fn detect(_t: u64) -> Vec<squat_challenge::landmarks::Landmark> { Vec::new() }
//! let config = Config::from_file("challenge.yaml")?;
//! let mut session = SessionController::new(&config, DeviceKind::Desktop, NoHooks, 0)?;
//!
//! let mut t = 0;
//! loop {
//!     t += 33;
//!     session.record_render_frame(t);
//!     if session.start(t).is_ok() {
//!         break;
//!     }
//! }
//!
//! while session.result().is_none() {
//!     t += 33;
//!     let landmarks = detect(t);
//!     if let FrameOutcome::Squat(result) = session.process_frame(t, &landmarks) {
//!         println!("{} reps", result.count);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Joint angle geometry
pub mod geometry;

/// Body landmark types from the pose detector
pub mod landmarks;

/// Device classes and their framing thresholds
pub mod device;

/// Frame rate monitoring and device compatibility
pub mod fps_monitor;

/// Position validation before each round
pub mod position_validator;

/// Squat repetition counting
pub mod squat_counter;

/// Challenge session state machine
pub mod session;

/// Replay of recorded landmark streams
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
