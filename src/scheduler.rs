//! Single-slot tick timers.
//!
//! The driver never has more than one tick outstanding: scheduling replaces
//! whatever was pending, and a cancelled or replaced handle never fires.

use std::time::{Duration, Instant};

/// Identifies one scheduled tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TimerHandle(u64);

/// Timer capability injected into the game driver.
pub trait Scheduler {
    /// Arms the timer to fire after `delay`, replacing any pending timer.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Disarms `handle` if it is still pending.
    fn cancel(&mut self, handle: TimerHandle);

    /// Returns true while a timer is armed.
    fn is_pending(&self) -> bool;
}

/// Wall-clock scheduler for the interactive runtime.
#[derive(Debug, Default)]
pub struct ClockScheduler {
    next_id: u64,
    pending: Option<(TimerHandle, Instant)>,
}

impl ClockScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disarms and returns the pending timer if its deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Option<TimerHandle> {
        match self.pending {
            Some((handle, deadline)) if deadline <= now => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }

    /// Time left until the pending deadline, or `None` when idle.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }
}

impl Scheduler for ClockScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending = Some((handle, Instant::now() + delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Scheduler that only fires when told to, so tests step ticks by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<(TimerHandle, Duration)>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the pending timer regardless of its delay.
    pub fn fire(&mut self) -> Option<TimerHandle> {
        self.pending.take().map(|(handle, _)| handle)
    }

    /// Delay requested for the pending timer.
    #[must_use]
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.map(|(_, delay)| delay)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending = Some((handle, delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
