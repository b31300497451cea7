//! Countdown engine - tracks remaining time across start/pause/reset
//!
//! Time-dependent operations take an explicit `Instant` (`*_at`) so the
//! engine is deterministic under test; the convenience wrappers use
//! `Instant::now()`.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running { since: Instant },
    Paused,
}

/// A countdown with a fixed total duration.
///
/// `consumed` is the time burned in completed run segments; while running,
/// the open segment since `since` is added on top. Remaining time never
/// underflows, and an expired countdown reports zero until reset.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    total: Duration,
    consumed: Duration,
    phase: Phase,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            consumed: Duration::ZERO,
            phase: Phase::Idle,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Running { since: now };
        }
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Phase::Running { since } = self.phase {
            if self.is_expired_at(now) {
                return;
            }
            self.consumed += now.saturating_duration_since(since);
            self.phase = Phase::Paused;
        }
    }

    pub fn resume_at(&mut self, now: Instant) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running { since: now };
        }
    }

    /// Back to the full duration, idle
    pub fn reset(&mut self) {
        self.consumed = Duration::ZERO;
        self.phase = Phase::Idle;
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        let elapsed = match self.phase {
            Phase::Running { since } => self.consumed + now.saturating_duration_since(since),
            Phase::Idle | Phase::Paused => self.consumed,
        };
        self.total.saturating_sub(elapsed)
    }

    /// Expired means started and run down to zero; an idle countdown still
    /// holds its full duration.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.phase != Phase::Idle && self.remaining_at(now).is_zero()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
