/// RepeatingTimer: fixed-delay schedule polled from the frame loop.
///
/// Every fired tick schedules the next one `interval` after the poll that
/// released it, so a stalled frame loop yields one late tick and never a
/// burst. Each `start` opens a new epoch; every tick carries the epoch it was
/// scheduled under, so a consumer can drop ticks that belong to a schedule
/// cancelled in the meantime.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    next_due: Option<Duration>,
    epoch: u64,
}

impl RepeatingTimer {
    pub fn new() -> Self {
        Self { interval: Duration::ZERO, next_due: None, epoch: 0 }
    }

    /// Schedule ticks every `interval`, the first one due at `now`.
    ///
    /// Returns the epoch of the new schedule.
    pub fn start(&mut self, interval: Duration, now: Duration) -> u64 {
        self.epoch += 1;
        self.interval = interval;
        self.next_due = Some(now);
        self.epoch
    }

    /// Cancel the schedule. Ticks from older epochs become stale.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        self.next_due = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Release the tick due at `now`, if any, and schedule the next one
    /// `interval` later. A schedule whose next deadline does not fit in a
    /// `Duration` ends after this tick.
    pub fn poll(&mut self, now: Duration) -> Option<TimerTick> {
        let due = self.next_due?;
        if due > now {
            return None;
        }

        self.next_due = now.checked_add(self.interval);
        if self.next_due.is_none() {
            crate::engine_debug!("vitrine::RepeatingTimer",
                "Next tick after {:?} is out of range, schedule ended", now);
        }
        Some(TimerTick { epoch: self.epoch })
    }
}

impl Default for RepeatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "repeating_timer_tests.rs"]
mod tests;
