//! Wall-clock source for the Snowflake generator.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Millisecond wall clock.
///
/// The generator reads time only through this trait so clock rollback and
/// sequence exhaustion can be driven deterministically in tests.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Block the caller for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_epoch() {
        // 2021-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_609_459_200_000);
    }
}
