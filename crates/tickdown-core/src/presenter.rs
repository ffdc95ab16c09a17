//! User-visible status presentation.
//!
//! Notification channels, icons, and text formatting live behind this
//! contract; the engine only decides *when* status is shown or hidden and
//! when the one-shot completion announcement fires.

use crate::clock::at;

/// Shows and hides background status, and announces completion.
pub trait Presenter {
    /// The timer is running in the background and will wake at the given
    /// instant.
    fn show_running(&mut self, wake_at_epoch_secs: u64);

    /// The timer is paused in the background with its remaining time kept.
    fn show_paused(&mut self);

    /// Remove any visible status.
    fn hide(&mut self);

    /// The countdown reached zero. Called exactly once per completion.
    fn announce_finished(&mut self);
}

/// Log-based presenter for terminal hosts: status changes become tracing
/// events instead of OS notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn show_running(&mut self, wake_at_epoch_secs: u64) {
        tracing::info!(wake_at = %at(wake_at_epoch_secs), "timer running in background");
    }

    fn show_paused(&mut self) {
        tracing::info!("timer paused in background");
    }

    fn hide(&mut self) {
        tracing::debug!("background status cleared");
    }

    fn announce_finished(&mut self) {
        tracing::info!("countdown completed");
    }
}
