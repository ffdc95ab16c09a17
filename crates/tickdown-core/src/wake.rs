//! One-shot wake scheduling.
//!
//! The host OS owns the actual callback delivery; this module only carries
//! the contract and a file-backed implementation for scripted hosts. At most
//! one wake is outstanding per timer; arming a new one replaces the prior
//! request, and the callback fires at or after the requested instant, never
//! earlier.

use std::path::PathBuf;

use crate::error::WakeError;
use crate::storage::data_dir;

/// Arms and disarms the single pending one-shot wake.
pub trait WakeScheduler {
    /// Arm a wake at the given absolute wall-clock instant, replacing any
    /// previously armed wake.
    fn schedule(&mut self, wake_at_epoch_secs: u64) -> Result<(), WakeError>;

    /// Disarm the pending wake. Idempotent; a no-op when none is pending.
    fn cancel(&mut self) -> Result<(), WakeError>;
}

/// File-backed wake request at `<data_dir>/wake_at`.
///
/// The file holds the requested epoch second; an external host (cron, a
/// systemd timer, or a test harness) is expected to invoke the wake handler
/// at that instant. Writing replaces the prior request, so at most one wake
/// is ever armed.
pub struct FileWakeScheduler {
    path: PathBuf,
}

impl FileWakeScheduler {
    /// Wake file in the default data directory.
    pub fn open() -> std::io::Result<Self> {
        Ok(Self {
            path: data_dir()?.join("wake_at"),
        })
    }

    /// Wake file at an explicit path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl WakeScheduler for FileWakeScheduler {
    fn schedule(&mut self, wake_at_epoch_secs: u64) -> Result<(), WakeError> {
        std::fs::write(&self.path, wake_at_epoch_secs.to_string())
            .map_err(|e| WakeError::ScheduleFailed(e.to_string()))
    }

    fn cancel(&mut self) -> Result<(), WakeError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WakeError::CancelFailed(e.to_string())),
        }
    }
}
