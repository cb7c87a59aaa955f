//! Pending timed events for the current phase.
//!
//! Every entry belongs to the phase that was active when it was scheduled.
//! The controller clears the scheduler on each transition, so nothing queued
//! under one phase can fire in the next.

use super::phase::Round;

/// Something the session does when its time comes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// One second of the active countdown has passed
    CountdownTick,
    /// Position accepted before round one
    EnterHydrate,
    /// Show the go cue
    EnterGo(Round),
    /// Start a round
    EnterExercise(Round),
    /// Recovery over
    EnterPositionCheck(Round),
    /// Congratulations over
    EnterTakePicture,
    /// Photo countdown over
    EnterResult,
}

#[derive(Debug)]
struct Entry {
    due_ms: u64,
    seq: u64,
    event: SessionEvent,
}

/// Time-ordered queue of session events
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    /// Empty scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` for `due_ms`
    pub fn schedule(&mut self, due_ms: u64, event: SessionEvent) {
        self.entries.push(Entry {
            due_ms,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Remove and return the earliest event due at or before `now_ms`.
    ///
    /// Events due at the same time come out in the order they were scheduled.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, SessionEvent)> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= now_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.seq))
            .map(|(position, _)| position)?;
        let entry = self.entries.swap_remove(position);
        Some((entry.due_ms, entry.event))
    }

    /// Time of the next pending event
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|entry| entry.due_ms).min()
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending events
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No pending events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
