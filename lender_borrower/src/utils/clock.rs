//! Time source for timestamps and report delays

use chrono::Utc;

/// Returns the current time in seconds
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall clock backed by `chrono`
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or_default()
    }
}
