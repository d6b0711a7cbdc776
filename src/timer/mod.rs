//! Study timer state machine
//!
//! Tracks Idle/Running/Paused phases against a monotonic clock. Callers pass
//! the current `Instant` so the controller stays deterministic under test.

mod format;

use std::time::{Duration, Instant};

use crate::error::AppError;

pub(crate) use format::{format_elapsed, parse_elapsed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Running { since: Instant },
    Paused,
}

impl Phase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running { .. } => "running",
            Phase::Paused => "paused",
        }
    }
}

/// A session that left the timer through `finish`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FinishedSession {
    pub(crate) topic: String,
    pub(crate) elapsed: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct Timer {
    phase: Phase,
    /// Time banked by previous running stretches
    accumulated: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            accumulated: Duration::ZERO,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Idle or Paused -> Running. Returns false if already running.
    pub(crate) fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.phase = Phase::Running { since: now };
        true
    }

    /// Running -> Paused. Returns false if not running.
    pub(crate) fn pause(&mut self, now: Instant) -> bool {
        let Phase::Running { since } = self.phase else {
            return false;
        };
        self.accumulated += now.saturating_duration_since(since);
        self.phase = Phase::Paused;
        true
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        match self.phase {
            Phase::Running { since } => self.accumulated + now.saturating_duration_since(since),
            Phase::Idle | Phase::Paused => self.accumulated,
        }
    }

    /// Running/Paused -> Idle, handing back the finished session.
    ///
    /// An empty topic is rejected before anything else and leaves the state
    /// untouched. Finishing a timer that was never started yields `None`.
    pub(crate) fn finish(
        &mut self,
        topic: &str,
        now: Instant,
    ) -> Result<Option<FinishedSession>, AppError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::MissingInput { field: "topic" });
        }
        if self.phase == Phase::Idle {
            return Ok(None);
        }
        let elapsed = self.elapsed(now);
        self.reset();
        Ok(Some(FinishedSession {
            topic: topic.to_string(),
            elapsed,
        }))
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.accumulated = Duration::ZERO;
    }
}
