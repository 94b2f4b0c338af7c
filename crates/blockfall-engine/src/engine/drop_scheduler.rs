use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Drop interval as a function of level.
///
/// `interval(level) = base_ms / (level + 1) + floor_ms`, which never grows as
/// the level rises. The defaults give 1000 ms at level 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DropSpeed {
    pub base_ms: u64,
    pub floor_ms: u64,
}

impl Default for DropSpeed {
    fn default() -> Self {
        Self {
            base_ms: 800,
            floor_ms: 200,
        }
    }
}

impl DropSpeed {
    #[must_use]
    pub fn interval(&self, level: u32) -> Duration {
        let millis = self.base_ms / (u64::from(level) + 1) + self.floor_ms;
        // A zero interval would fire forever within one `advance`.
        Duration::from_millis(millis.max(1))
    }
}

/// A repeating timer driven by elapsed time.
///
/// The host feeds wall-clock time through [`Self::poll`]; the timer reports
/// each time an interval has fully elapsed. Changing the interval re-arms the
/// timer, so the new interval counts from the moment of the change and never
/// applies to time already spent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropTimer {
    interval: Option<Duration>,
    elapsed: Duration,
}

impl DropTimer {
    #[must_use]
    pub const fn stopped() -> Self {
        Self {
            interval: None,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Sets a new interval (or stops with `None`) and restarts the count.
    pub fn rearm(&mut self, interval: Option<Duration>) {
        self.interval = interval;
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.rearm(None);
    }

    /// Time left until the next fire, or `None` while stopped.
    #[must_use]
    pub fn time_until_next_fire(&self) -> Option<Duration> {
        self.interval
            .map(|interval| interval.saturating_sub(self.elapsed))
    }

    /// Consumes up to `budget` of elapsed time.
    ///
    /// Returns `Some(rest)` if the timer fired within the budget, where `rest`
    /// is the unconsumed time after the fire. Returns `None` if it did not fire;
    /// the whole budget then counts toward the next fire. Callers loop until
    /// `None` so that every fire is handled before the next one is computed.
    pub fn poll(&mut self, budget: Duration) -> Option<Duration> {
        let interval = self.interval?;
        let until_fire = interval.saturating_sub(self.elapsed);
        if budget >= until_fire {
            self.elapsed = Duration::ZERO;
            Some(budget - until_fire)
        } else {
            self.elapsed += budget;
            None
        }
    }
}

/// Timer plus speed policy for automatic drops.
///
/// Soft drop suspends the automatic timer; releasing it re-arms the timer at
/// the interval for the current level.
#[derive(Debug, Clone)]
pub struct DropScheduler {
    speed: DropSpeed,
    timer: DropTimer,
    level: u32,
    suspended: bool,
}

impl DropScheduler {
    #[must_use]
    pub fn new(speed: DropSpeed) -> Self {
        Self {
            speed,
            timer: DropTimer::stopped(),
            level: 0,
            suspended: false,
        }
    }

    /// Current automatic interval, `None` while stopped or suspended.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.timer.interval()
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Starts dropping at the pace for `level`.
    pub fn start(&mut self, level: u32) {
        self.level = level;
        self.suspended = false;
        self.timer.rearm(Some(self.speed.interval(level)));
    }

    /// Cancels every future fire.
    pub fn stop(&mut self) {
        self.suspended = false;
        self.timer.stop();
    }

    /// Switches to the pace for `level`.
    ///
    /// A suspended scheduler only remembers the level and applies it on resume.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        if self.timer.is_running() {
            self.timer.rearm(Some(self.speed.interval(level)));
        }
    }

    /// Pauses automatic drops while a soft drop is held.
    pub fn suspend(&mut self) {
        if self.timer.is_running() {
            self.suspended = true;
            self.timer.stop();
        }
    }

    /// Ends a soft drop and re-arms the automatic timer.
    pub fn resume(&mut self) {
        if self.suspended {
            self.suspended = false;
            self.timer.rearm(Some(self.speed.interval(self.level)));
        }
    }

    #[must_use]
    pub fn time_until_next_fire(&self) -> Option<Duration> {
        self.timer.time_until_next_fire()
    }

    /// See [`DropTimer::poll`].
    pub fn poll(&mut self, budget: Duration) -> Option<Duration> {
        self.timer.poll(budget)
    }
}
