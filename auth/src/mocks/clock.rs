//! Controllable clock for deterministic tests.

use crate::environment::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;

/// Test clock that starts at a fixed instant and can be advanced.
///
/// Expiry windows and cooldowns are simulated by advancing the clock
/// instead of sleeping.
///
/// # Examples
///
/// ```
/// use family_ledger_auth::environment::Clock;
/// use family_ledger_auth::mocks::TestClock;
/// use chrono::Duration;
///
/// let clock = TestClock::default();
/// let start = clock.now();
/// clock.advance(Duration::minutes(5));
/// assert_eq!(clock.now(), start + Duration::minutes(5));
/// ```
#[derive(Debug)]
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advance the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += delta;
    }
}

impl Default for TestClock {
    /// A clock frozen at 2025-01-01 00:00:00 UTC.
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default())
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_moves_time_forward_only_when_asked() {
        let clock = TestClock::default();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);
        clock.advance(Duration::seconds(61));
        assert_eq!(clock.now(), t0 + Duration::seconds(61));
    }
}
