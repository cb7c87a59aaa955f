//! Challenge session state machine.
//!
//! The controller owns the phase, the countdown, the position validator, the
//! squat counter and the frame rate monitor. It is driven by one clock: the
//! caller passes the current time in milliseconds to every call, and timed
//! work (countdown ticks, delayed transitions) is queued in a [`Scheduler`]
//! that is emptied on every phase change.
//!
//! ```
//! use squat_challenge::{config::Config, device::DeviceKind, session::{NoHooks, SessionController}};
//!
//! # fn main() -> squat_challenge::Result<()> {
//! let mut session = SessionController::new(&Config::default(), DeviceKind::Desktop, NoHooks, 0)?;
//! for i in 1..=30 {
//!     session.record_render_frame(i * 33);
//! }
//! session.start(1000)?;
//! assert_eq!(session.phase().name(), "position_before_round_1");
//! # Ok(())
//! # }
//! ```

/// Collaborator hooks and announcements
pub mod hooks;

/// Phase and round types
pub mod phase;

/// Read-only projections and the final result
pub mod report;

/// Pending timed events
pub mod scheduler;

pub use hooks::{Announcement, CapturedFrame, NoHooks, SessionHooks};
pub use phase::{Round, SessionPhase};
pub use report::{ChallengeResult, SessionView};
pub use scheduler::{Scheduler, SessionEvent};

use crate::{
    config::{Config, SessionTimings},
    constants::TICK_MS,
    device::DeviceKind,
    fps_monitor::{Compatibility, FpsMonitor, FpsReport},
    landmarks::Landmark,
    position_validator::{PositionValidator, ValidationResult},
    squat_counter::{SquatCounter, SquatCounterResult},
    Error, Result,
};
use log::{debug, info, trace, warn};

/// What happened to a frame handed to [`SessionController::process_frame`]
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The active phase does not consume frames
    Ignored,
    /// The frame went to the position validator
    Position(ValidationResult),
    /// The frame went to the squat counter
    Squat(SquatCounterResult),
}

/// Challenge session controller
pub struct SessionController<H: SessionHooks = NoHooks> {
    timings: SessionTimings,
    device: DeviceKind,
    phase: SessionPhase,
    validator: PositionValidator,
    counter: SquatCounter,
    fps_monitor: FpsMonitor,
    scheduler: Scheduler,
    hooks: H,
    now_ms: u64,
    countdown_total: u32,
    time_remaining: u32,
    round_counts: [u32; 2],
    total_squats: u32,
    last_validation: Option<ValidationResult>,
    photo: Option<CapturedFrame>,
    running: bool,
}

impl<H: SessionHooks> SessionController<H> {
    /// Create a session in the setup phase at `now_ms`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate
    pub fn new(config: &Config, device: DeviceKind, hooks: H, now_ms: u64) -> Result<Self> {
        config.validate()?;
        info!("Creating {device} session");

        Ok(Self {
            timings: config.session,
            device,
            phase: SessionPhase::Setup,
            validator: config.create_position_validator(device),
            counter: config.create_squat_counter(),
            fps_monitor: config.create_fps_monitor(now_ms as f64),
            scheduler: Scheduler::new(),
            hooks,
            now_ms,
            countdown_total: 0,
            time_remaining: 0,
            round_counts: [0; 2],
            total_squats: 0,
            last_validation: None,
            photo: None,
            running: true,
        })
    }

    /// Active phase
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Device class the session was created for
    #[must_use]
    pub const fn device(&self) -> DeviceKind {
        self.device
    }

    /// Latest time seen on the session clock
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Seconds left on the countdown of a timed phase
    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.phase.is_timed().then_some(self.time_remaining)
    }

    /// Reps counted in a round so far
    #[must_use]
    pub const fn round_count(&self, round: Round) -> u32 {
        self.round_counts[round.index()]
    }

    /// Reps across both rounds
    #[must_use]
    pub const fn total_squats(&self) -> u32 {
        self.total_squats
    }

    /// False once the session has been exited
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Pending scheduled events
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The collaborator hooks
    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Mutable access to the collaborator hooks
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Record one rendered frame for the frame rate gate
    pub fn record_render_frame(&mut self, now_ms: u64) -> FpsReport {
        self.fps_monitor.update_at(now_ms as f64)
    }

    /// Restart frame rate measurement, e.g. after the camera stream restarts
    pub fn restart_fps_measurement(&mut self, now_ms: u64) {
        debug!("Restarting frame rate measurement");
        self.fps_monitor.reset_at(now_ms as f64);
    }

    /// Device frame rate verdict so far
    #[must_use]
    pub fn compatibility(&self) -> Compatibility {
        self.fps_monitor.compatibility()
    }

    /// Leave setup and begin the first position check
    ///
    /// # Errors
    ///
    /// - `SessionCancelled` after [`exit`](Self::exit)
    /// - `InvalidState` outside the setup phase
    /// - `CompatibilityPending` while the frame rate is still being measured
    /// - `DeviceIncompatible` when the device is too slow; setup cannot be left
    pub fn start(&mut self, now_ms: u64) -> Result<()> {
        if !self.running {
            return Err(Error::SessionCancelled);
        }
        if self.phase != SessionPhase::Setup {
            return Err(Error::InvalidState(format!("cannot start from {}", self.phase)));
        }

        match self.fps_monitor.compatibility() {
            Compatibility::Measuring { samples, required } => Err(Error::CompatibilityPending { samples, required }),
            Compatibility::Incompatible { avg_fps } => {
                warn!("Refusing to start: {avg_fps:.1} fps is below the supported minimum");
                Err(Error::DeviceIncompatible { avg_fps })
            }
            Compatibility::Compatible { avg_fps } => {
                info!("Starting challenge at {avg_fps:.1} fps");
                self.now_ms = self.now_ms.max(now_ms);
                self.enter(
                    SessionPhase::PositionCheck {
                        round: Round::One,
                        confirmed: false,
                    },
                    self.now_ms,
                );
                Ok(())
            }
        }
    }

    /// Move the clock to `now_ms`, firing every scheduled event that is due
    ///
    /// Events fire in time order, each at its own due time, so a large jump
    /// replays the same sequence a steady clock would have produced.
    pub fn advance(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        if now_ms < self.now_ms {
            trace!("Ignoring clock going backwards ({now_ms} < {})", self.now_ms);
            return;
        }

        while let Some((due_ms, event)) = self.scheduler.pop_due(now_ms) {
            self.now_ms = due_ms;
            self.handle_event(event, due_ms);
        }
        self.now_ms = now_ms;
    }

    /// Route one detector result to whichever component the phase uses
    ///
    /// The clock is advanced first, so a frame arriving after a countdown has
    /// run out is judged against the phase that follows.
    pub fn process_frame(&mut self, now_ms: u64, frame: &[Landmark]) -> FrameOutcome {
        self.advance(now_ms);
        if !self.running {
            return FrameOutcome::Ignored;
        }
        let now_ms = self.now_ms;

        match self.phase {
            SessionPhase::PositionCheck { round, confirmed: false } => {
                let result = self.validator.validate(frame, now_ms);
                if result.announce_position_good {
                    self.hooks.announce(Announcement::PositionGood);
                }
                if result.is_valid {
                    self.phase = SessionPhase::PositionCheck { round, confirmed: true };
                    let (delay, event) = match round {
                        Round::One => (self.timings.round1_position_delay_ms, SessionEvent::EnterHydrate),
                        Round::Two => (self.timings.round2_position_delay_ms, SessionEvent::EnterGo(Round::Two)),
                    };
                    info!("Position accepted before {round}");
                    self.scheduler.schedule(now_ms + delay, event);
                }
                self.last_validation = Some(result.clone());
                FrameOutcome::Position(result)
            }
            SessionPhase::Exercise { round } => {
                let result = self.counter.process(frame);
                if result.new_count {
                    self.round_counts[round.index()] = result.count;
                    self.total_squats += 1;
                    info!("{round}: {} reps ({} total)", result.count, self.total_squats);
                    self.hooks.announce(Announcement::Count(result.count));
                }
                FrameOutcome::Squat(result)
            }
            _ => FrameOutcome::Ignored,
        }
    }

    /// Stop the session: drop pending timers and release the camera
    pub fn exit(&mut self) {
        if !self.running {
            return;
        }
        info!("Exiting session during {}", self.phase);
        self.scheduler.clear();
        self.running = false;
        self.hooks.release_camera();
    }

    /// Current scores, available in every phase
    #[must_use]
    pub fn summary(&self) -> ChallengeResult {
        ChallengeResult {
            total_squats: self.total_squats,
            round1_count: self.round_counts[0],
            round2_count: self.round_counts[1],
            photo: self.photo.clone(),
        }
    }

    /// Final scores, once the result phase has been reached
    #[must_use]
    pub fn result(&self) -> Option<ChallengeResult> {
        (self.phase == SessionPhase::Result).then(|| self.summary())
    }

    /// Projection of everything the UI shows
    #[must_use]
    pub fn view(&self) -> SessionView {
        let position = if self.phase.is_position_check() {
            self.last_validation.as_ref()
        } else {
            None
        };

        SessionView {
            phase: self.phase,
            round: self.phase.round(),
            time_remaining: self.time_remaining(),
            progress_percent: self
                .phase
                .is_timed()
                .then(|| report::countdown_progress(self.countdown_total, self.time_remaining)),
            live_count: self.counter.count(),
            total_squats: self.total_squats,
            position_message: position.map(|result| result.message.clone()),
            position_valid: position.is_some_and(|result| result.is_valid),
            compatibility: self.fps_monitor.compatibility(),
            running: self.running,
        }
    }

    fn enter(&mut self, phase: SessionPhase, at_ms: u64) {
        self.scheduler.clear();
        let previous = self.phase;
        info!("Phase {previous} -> {phase}");
        self.phase = phase;
        self.countdown_total = 0;
        self.time_remaining = 0;

        match phase {
            SessionPhase::PositionCheck { .. } => {
                self.validator.reset();
                self.last_validation = None;
            }
            SessionPhase::Hydrate { .. } => self.start_countdown(self.timings.hydrate_secs, at_ms),
            SessionPhase::Go { round } => {
                self.scheduler
                    .schedule(at_ms + self.timings.go_duration_ms, SessionEvent::EnterExercise(round));
            }
            SessionPhase::Exercise { round } => {
                self.counter.reset_count();
                self.round_counts[round.index()] = 0;
                self.start_countdown(self.timings.exercise_secs, at_ms);
            }
            SessionPhase::Recovery { .. } => self.start_countdown(self.timings.recovery_secs, at_ms),
            SessionPhase::Completed => {
                self.scheduler
                    .schedule(at_ms + self.timings.completion_delay_ms, SessionEvent::EnterTakePicture);
            }
            SessionPhase::TakePicture { .. } => self.start_countdown(self.timings.picture_secs, at_ms),
            SessionPhase::Result => {
                info!(
                    "Challenge finished: {} + {} = {} reps",
                    self.round_counts[0], self.round_counts[1], self.total_squats
                );
            }
            SessionPhase::Setup => {}
        }

        self.hooks.phase_changed(previous, phase);
    }

    fn start_countdown(&mut self, secs: u32, at_ms: u64) {
        self.countdown_total = secs;
        self.time_remaining = secs;
        self.scheduler.schedule(at_ms + TICK_MS, SessionEvent::CountdownTick);
    }

    fn handle_event(&mut self, event: SessionEvent, at_ms: u64) {
        trace!("Event {event:?} at {at_ms} ms during {}", self.phase);
        match event {
            SessionEvent::CountdownTick => self.on_countdown_tick(at_ms),
            SessionEvent::EnterHydrate => self.enter(SessionPhase::Hydrate { reminder_played: false }, at_ms),
            SessionEvent::EnterGo(round) => self.enter(SessionPhase::Go { round }, at_ms),
            SessionEvent::EnterExercise(round) => self.enter(SessionPhase::Exercise { round }, at_ms),
            SessionEvent::EnterPositionCheck(round) => self.enter(
                SessionPhase::PositionCheck {
                    round,
                    confirmed: false,
                },
                at_ms,
            ),
            SessionEvent::EnterTakePicture => self.enter(SessionPhase::TakePicture { captured: false }, at_ms),
            SessionEvent::EnterResult => self.enter(SessionPhase::Result, at_ms),
        }
    }

    fn on_countdown_tick(&mut self, at_ms: u64) {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        let remaining = self.time_remaining;
        let announce_at = self.timings.announce_at_secs;

        match self.phase {
            SessionPhase::Hydrate { reminder_played } => {
                if !reminder_played && remaining > 0 && remaining <= announce_at {
                    self.hooks.announce(Announcement::HydrateReminder);
                    self.phase = SessionPhase::Hydrate { reminder_played: true };
                }
                if remaining == 0 {
                    self.scheduler
                        .schedule(at_ms + self.timings.go_delay_ms, SessionEvent::EnterGo(Round::One));
                }
            }
            SessionPhase::Recovery { reminder_played } => {
                if !reminder_played && remaining > 0 && remaining <= announce_at {
                    self.hooks.announce(Announcement::RecoveryReminder);
                    self.phase = SessionPhase::Recovery { reminder_played: true };
                }
                if remaining == 0 {
                    self.scheduler.schedule(
                        at_ms + self.timings.recovery_exit_delay_ms,
                        SessionEvent::EnterPositionCheck(Round::Two),
                    );
                }
            }
            SessionPhase::Exercise { round } => {
                if remaining == 0 {
                    self.finish_round(round, at_ms);
                    return;
                }
            }
            SessionPhase::TakePicture { captured } => {
                if !captured && remaining > 0 && remaining <= self.timings.capture_at_secs {
                    self.photo = self.hooks.capture_frame(at_ms);
                    if self.photo.is_none() {
                        warn!("No frame available for the result photo");
                    }
                    self.phase = SessionPhase::TakePicture { captured: true };
                }
                if remaining == 0 {
                    self.scheduler
                        .schedule(at_ms + self.timings.result_delay_ms, SessionEvent::EnterResult);
                }
            }
            _ => {
                warn!("Countdown tick outside a timed phase ({})", self.phase);
                return;
            }
        }

        if remaining > 0 {
            self.scheduler.schedule(at_ms + TICK_MS, SessionEvent::CountdownTick);
        }
    }

    fn finish_round(&mut self, round: Round, at_ms: u64) {
        let count = self.counter.count();
        self.round_counts[round.index()] = count;
        info!("{round} complete with {count} reps");

        match round {
            Round::One => {
                self.hooks.announce(Announcement::RoundOneComplete);
                self.enter(SessionPhase::Recovery { reminder_played: false }, at_ms);
            }
            Round::Two => {
                self.hooks.announce(Announcement::Congratulations);
                self.enter(SessionPhase::Completed, at_ms);
            }
        }
    }
}
