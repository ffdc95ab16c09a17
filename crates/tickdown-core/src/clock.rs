//! Wall-clock source.
//!
//! Elapsed background time is always derived from wall-clock timestamps,
//! never from counting ticks. The clock is an explicit input so that
//! elapsed-time computation is testable with injected clocks.

use chrono::{DateTime, Utc};

/// A source of "now" in whole epoch seconds.
pub trait Clock {
    fn now_epoch_secs(&self) -> u64;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> u64 {
        Utc::now().timestamp().max(0) as u64
    }
}

/// Convert an epoch-seconds instant into a UTC timestamp for event payloads.
pub fn at(epoch_secs: u64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_secs as i64, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
