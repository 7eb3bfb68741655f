//! Wall-clock source.
//!
//! Expiry is a comparison against the clock, never a timer, so tests swap in
//! a manual clock to cross the window boundary deterministically.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Unix milliseconds.
    fn now_millis(&self) -> i64;

    /// Unix seconds.
    fn now_secs(&self) -> i64 {
        self.now_millis().div_euclid(1000)
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_derive_from_millis() {
        let clock = SystemClock;
        let ms = clock.now_millis();
        let secs = clock.now_secs();
        assert!(ms > 1_600_000_000_000);
        assert!((secs - ms / 1000).abs() <= 1);
    }
}
