//! Virtual simulation time.
//!
//! `SimTime` wraps a [`Duration`] so the scheduler's clock, event
//! timestamps, and `now + 10ms` style arithmetic read naturally while
//! staying in nanosecond resolution.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// The mobility tick period (spec: every 10ms of virtual time).
pub const TIMESTEP_PERIOD: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(Duration);

impl SimTime {
    pub const ZERO: SimTime = SimTime(Duration::ZERO);

    pub const fn from_duration(d: Duration) -> Self {
        SimTime(d)
    }

    pub fn from_millis(ms: u64) -> Self {
        SimTime(Duration::from_millis(ms))
    }

    pub fn from_micros(us: u64) -> Self {
        SimTime(Duration::from_micros(us))
    }

    pub fn from_nanos(ns: u64) -> Self {
        SimTime(Duration::from_nanos(ns))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn as_nanos(&self) -> u128 {
        self.0.as_nanos()
    }

    pub fn as_micros(&self) -> u128 {
        self.0.as_micros()
    }

    pub fn as_millis(&self) -> u128 {
        self.0.as_millis()
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_secs_f64()
    }

    pub fn saturating_sub(&self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}ms", self.0.as_secs_f64() * 1000.0)
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;
    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl Sub<Duration> for SimTime {
    type Output = SimTime;
    fn sub(self, rhs: Duration) -> SimTime {
        SimTime(self.0 - rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;
    fn sub(self, rhs: SimTime) -> Duration {
        self.0 - rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_duration() {
        let a = SimTime::from_millis(10);
        let b = SimTime::from_millis(20);
        assert!(a < b);
        assert_eq!(a + Duration::from_millis(10), b);
    }

    #[test]
    fn max_semantics_for_serialization() {
        let last_sent = SimTime::from_millis(50);
        let now = SimTime::from_millis(30);
        assert_eq!(now.max(last_sent), last_sent);
    }
}
