//! Clock abstraction for the simulation.
//!
//! The latency model shapes its output by time of day and catalog items
//! carry wall-clock timestamps, so every component that needs "now" takes it
//! from a [`Clock`] rather than calling `Utc::now()` directly. Production
//! code uses [`SystemClock`]; tests pin the hour with [`FixedClock`] so
//! time-of-day behavior is reproducible.

use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current time in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current hour of day (0-23).
    fn hour(&self) -> u32 {
        self.now().hour()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
///
/// Used by tests to pin the time-of-day factor of the latency model and to
/// make catalog timestamps deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Creates a clock frozen at the given hour of day (0-23) on an
    /// arbitrary reference date.
    pub fn at_hour(hour: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 15, hour % 24, 0, 0)
            .single()
            .expect("reference date is valid");
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_close_to_utc_now() {
        let clock = SystemClock;
        let delta = Utc::now().signed_duration_since(clock.now());
        assert!(delta.num_seconds().abs() < 2);
    }

    #[test]
    fn fixed_clock_reports_requested_hour() {
        for hour in 0..24 {
            let clock = FixedClock::at_hour(hour);
            assert_eq!(clock.hour(), hour);
        }
    }

    #[test]
    fn fixed_clock_wraps_hour() {
        let clock = FixedClock::at_hour(25);
        assert_eq!(clock.hour(), 1);
    }

    #[test]
    fn fixed_clock_never_advances() {
        let clock = FixedClock::at_hour(12);
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.now(), first);
    }
}
