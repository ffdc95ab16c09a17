//! Impure shell around the timer state machine.
//!
//! Every entry-point invocation is a short synchronous operation: read the
//! fresh [`TimerRecord`], apply one command, perform the side effects, write
//! the record back. The record must never be trusted to still be valid after
//! the invocation returns; another entry point may run next and will re-read.

use tracing::{debug, warn};

use crate::clock::{at, Clock};
use crate::error::{CoreError, WakeError};
use crate::events::Event;
use crate::presenter::Presenter;
use crate::storage::StateStore;
use crate::timer::engine::{apply, Command, Effect, RunState, TimerRecord};
use crate::timer::format::{format_mmss, progress_pct};
use crate::wake::WakeScheduler;

/// Wires the state machine to storage, wake scheduling, and presentation.
/// One instance per entry-point invocation is fine; it holds no timer state
/// of its own.
pub struct TimerService<W: WakeScheduler, P: Presenter, C: Clock> {
    store: StateStore,
    wake: W,
    presenter: P,
    clock: C,
    default_length_secs: u64,
}

impl<W: WakeScheduler, P: Presenter, C: Clock> TimerService<W, P, C> {
    pub fn new(
        store: StateStore,
        wake: W,
        presenter: P,
        clock: C,
        default_length_secs: u64,
    ) -> Self {
        Self {
            store,
            wake,
            presenter,
            clock,
            default_length_secs,
        }
    }

    /// Read the current record, falling back to the first-run default.
    ///
    /// A stopped timer re-reads the configured length on every load, so a
    /// config change between runs takes effect at the next start. A run in
    /// progress keeps the length it started with.
    pub fn record(&self) -> Result<TimerRecord, CoreError> {
        let mut record = self
            .store
            .get()?
            .unwrap_or_else(|| TimerRecord::with_defaults(self.default_length_secs));
        if record.state == RunState::Stopped {
            record.configured_length_secs = self.default_length_secs;
            record.remaining_secs = self.default_length_secs;
        }
        Ok(record)
    }

    /// Apply one command: read fresh, transition, run effects, persist.
    ///
    /// A wake-scheduling failure is surfaced to the caller, but only after
    /// the record has been persisted with no wake armed, so the timer keeps
    /// running in a degraded mode instead of corrupting state.
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Event>, CoreError> {
        let record = self.record()?;
        let now = self.clock.now_epoch_secs();
        debug!(?command, state = record.state.as_str(), now, "dispatch");

        let mut transition = apply(&record, command, now);
        let mut schedule_err: Option<WakeError> = None;

        for effect in &transition.effects {
            match *effect {
                Effect::ScheduleWake { wake_at_epoch_secs } => {
                    if let Err(e) = self.wake.schedule(wake_at_epoch_secs) {
                        warn!(error = %e, "wake scheduling declined; timer continues without a wake");
                        transition.record.alarm_set_at_epoch_secs = 0;
                        schedule_err = Some(e);
                    }
                }
                Effect::CancelWake => {
                    // Cancellation is idempotent; a failure here must not
                    // block the transition.
                    if let Err(e) = self.wake.cancel() {
                        warn!(error = %e, "wake cancel failed");
                    }
                }
                Effect::ShowRunning { wake_at_epoch_secs } => {
                    self.presenter.show_running(wake_at_epoch_secs);
                }
                Effect::ShowPaused => self.presenter.show_paused(),
                Effect::HidePresentation => self.presenter.hide(),
                Effect::AnnounceFinished => self.presenter.announce_finished(),
            }
        }

        self.store.set(&transition.record)?;

        match schedule_err {
            Some(e) => Err(e.into()),
            None => Ok(transition.events),
        }
    }

    /// Read-only snapshot of the persisted record, with display-adjusted
    /// remaining time when a wake is still armed.
    pub fn snapshot(&self) -> Result<Event, CoreError> {
        let record = self.record()?;
        let now = self.clock.now_epoch_secs();
        let remaining = record.effective_remaining_secs(now);
        let length = record.length_secs();
        Ok(Event::Snapshot {
            state: record.state,
            remaining_secs: remaining,
            length_secs: length,
            label: format_mmss(remaining),
            progress_pct: progress_pct(remaining, length),
            at: at(now),
        })
    }
}
