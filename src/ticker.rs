//! Periodic tick trigger.
//!
//! Every call to [`Ticker::arm`] starts a new generation and tears down the
//! previous one, so a [`TickHandle`] handed out before a re-arm can be told
//! apart from a live one and dropped.

use std::time::{Duration, Instant};

/// Identifies one arming of a [`Ticker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(u64);

#[derive(Debug)]
struct Schedule {
    interval: Duration,
    next_due: Instant,
}

#[derive(Debug, Default)]
pub struct Ticker {
    generation: u64,
    schedule: Option<Schedule>,
}

impl Ticker {
    pub fn new() -> Self {
        Ticker::default()
    }

    /// Cancels any running schedule and starts a fresh one whose first tick
    /// is one `interval` from now.
    pub fn arm(&mut self, interval: Duration) -> TickHandle {
        self.arm_at(interval, Instant::now())
    }

    pub fn arm_at(&mut self, interval: Duration, now: Instant) -> TickHandle {
        self.cancel();
        self.generation += 1;
        self.schedule = Some(Schedule { interval, next_due: now + interval });
        TickHandle(self.generation)
    }

    /// Returns whether anything was armed.
    pub fn cancel(&mut self) -> bool {
        self.schedule.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.schedule.as_ref().map(|s| s.interval)
    }

    pub fn handle(&self) -> Option<TickHandle> {
        self.schedule.as_ref().map(|_| TickHandle(self.generation))
    }

    pub fn is_current(&self, handle: TickHandle) -> bool {
        self.is_armed() && handle.0 == self.generation
    }

    /// Time left before the next tick, zero if overdue. `None` when disarmed.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.schedule.as_ref().map(|s| s.next_due.saturating_duration_since(now))
    }

    /// Fires at most one tick if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<TickHandle> {
        let schedule = self.schedule.as_mut()?;
        if now < schedule.next_due {
            return None;
        }

        schedule.next_due += schedule.interval;
        if schedule.next_due <= now {
            // Fell behind by more than a whole interval; don't burst to catch up
            schedule.next_due = now + schedule.interval;
        }

        Some(TickHandle(self.generation))
    }
}
