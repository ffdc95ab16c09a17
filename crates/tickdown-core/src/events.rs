use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::RunState;

/// Every state change in the system produces an Event.
/// The CLI prints them; a GUI layer would poll for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Started {
        length_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Stopped {
        at: DateTime<Utc>,
    },
    /// The UI stopped being visible; a wake was armed if the timer was running.
    WentBackground {
        state: RunState,
        wake_at_epoch_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    /// The UI became visible again; remaining time has been reconciled.
    CameForeground {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. Fired exactly once per completion.
    Finished {
        at: DateTime<Utc>,
    },
    Snapshot {
        state: RunState,
        remaining_secs: u64,
        length_secs: u64,
        label: String,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
