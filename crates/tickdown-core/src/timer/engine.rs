//! Timer state machine.
//!
//! The engine is a pure function over the durable [`TimerRecord`]: every
//! entry point calls [`apply`] with a command and the current wall-clock
//! instant, then persists the resulting record and performs the returned
//! side effects. No in-memory countdown is trusted once the process may
//! have been suspended.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running -> (Paused | Stopped)
//! ```
//!
//! Elapsed background time is never measured by counting ticks; it is
//! derived as `now - alarm_set_at` at the moment of reconciliation, which
//! is what keeps the countdown correct across process death.

use serde::{Deserialize, Serialize};

use crate::clock::at;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Stopped,
    Paused,
    Running,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Stopped => "stopped",
            RunState::Paused => "paused",
            RunState::Running => "running",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stopped" => Some(RunState::Stopped),
            "paused" => Some(RunState::Paused),
            "running" => Some(RunState::Running),
            _ => None,
        }
    }
}

/// The sole persisted entity: everything needed to reconstruct the timer
/// after any suspension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRecord {
    /// Current mode.
    pub state: RunState,
    /// Length selected for the *next* run.
    pub configured_length_secs: u64,
    /// Length of the run currently in progress or paused.
    pub previous_length_secs: u64,
    /// Time left in the current run.
    pub remaining_secs: u64,
    /// Wall-clock instant a background wake was scheduled (0 = none).
    pub alarm_set_at_epoch_secs: u64,
}

impl TimerRecord {
    /// First-run record: stopped, with the configured default length.
    pub fn with_defaults(configured_length_secs: u64) -> Self {
        Self {
            state: RunState::Stopped,
            configured_length_secs,
            previous_length_secs: 0,
            remaining_secs: configured_length_secs,
            alarm_set_at_epoch_secs: 0,
        }
    }

    /// Length of the run the record currently describes.
    pub fn length_secs(&self) -> u64 {
        match self.state {
            RunState::Stopped => self.configured_length_secs,
            RunState::Paused | RunState::Running => self.previous_length_secs,
        }
    }

    /// Remaining time adjusted for a still-armed wake, for display only.
    /// Does not mutate the record; reconciliation happens in [`apply`].
    pub fn effective_remaining_secs(&self, now_epoch_secs: u64) -> u64 {
        if self.alarm_set_at_epoch_secs > 0 {
            let elapsed = now_epoch_secs.saturating_sub(self.alarm_set_at_epoch_secs);
            self.remaining_secs.saturating_sub(elapsed)
        } else {
            self.remaining_secs
        }
    }
}

/// Remote actions delivered while the app is backgrounded (the user acting
/// on the status presentation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RemoteAction {
    Start,
    Pause,
    Resume,
    Stop,
}

/// Commands fed into [`apply`] from the three entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Stop,
    /// Foreground-only, once-per-second countdown refresh. Not authoritative
    /// across suspension.
    Tick,
    EnterBackground,
    EnterForeground,
    /// The scheduled one-shot wake fired.
    WakeFired,
    Remote(RemoteAction),
}

/// Side effects the caller must perform after persisting the new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScheduleWake { wake_at_epoch_secs: u64 },
    CancelWake,
    ShowRunning { wake_at_epoch_secs: u64 },
    ShowPaused,
    HidePresentation,
    AnnounceFinished,
}

/// Result of applying a command: the new record plus the side effects and
/// events it produced.
#[derive(Debug, Clone)]
pub struct Transition {
    pub record: TimerRecord,
    pub effects: Vec<Effect>,
    pub events: Vec<Event>,
}

impl Transition {
    fn unchanged(record: TimerRecord) -> Self {
        Self {
            record,
            effects: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Apply `command` to `record` at wall-clock instant `now_epoch_secs`.
///
/// Pure: reads nothing but its arguments, touches no clock and no storage.
pub fn apply(record: &TimerRecord, command: Command, now_epoch_secs: u64) -> Transition {
    let mut t = Transition::unchanged(record.clone());
    let now = now_epoch_secs;
    match command {
        Command::Start => start(&mut t, now),
        Command::Pause => pause(&mut t, now),
        Command::Stop => stop(&mut t, now),
        Command::Tick => tick(&mut t, now),
        Command::EnterBackground => enter_background(&mut t, now),
        Command::EnterForeground => enter_foreground(&mut t, now),
        Command::WakeFired => wake_fired(&mut t, now),
        Command::Remote(action) => remote(&mut t, action, now),
    }
    t
}

fn start(t: &mut Transition, now: u64) {
    match t.record.state {
        RunState::Stopped => {
            t.record.previous_length_secs = t.record.configured_length_secs;
            t.record.remaining_secs = t.record.configured_length_secs;
            t.record.state = RunState::Running;
            t.events.push(Event::Started {
                length_secs: t.record.previous_length_secs,
                at: at(now),
            });
        }
        // Starting a paused timer resumes it with its remaining time intact.
        RunState::Paused => {
            t.record.state = RunState::Running;
            t.events.push(Event::Resumed {
                remaining_secs: t.record.remaining_secs,
                at: at(now),
            });
        }
        RunState::Running => {}
    }
}

fn pause(t: &mut Transition, now: u64) {
    if t.record.state == RunState::Running {
        t.record.state = RunState::Paused;
        t.events.push(Event::Paused {
            remaining_secs: t.record.remaining_secs,
            at: at(now),
        });
    }
}

fn stop(t: &mut Transition, now: u64) {
    if t.record.state != RunState::Stopped {
        t.record.state = RunState::Stopped;
        t.record.remaining_secs = t.record.configured_length_secs;
        t.record.alarm_set_at_epoch_secs = 0;
        t.effects.push(Effect::CancelWake);
        t.effects.push(Effect::HidePresentation);
        t.events.push(Event::Stopped { at: at(now) });
    }
}

fn tick(t: &mut Transition, now: u64) {
    if t.record.state == RunState::Running {
        t.record.remaining_secs = t.record.remaining_secs.saturating_sub(1);
        if t.record.remaining_secs == 0 {
            finish(t, now);
        }
    }
}

fn enter_background(t: &mut Transition, now: u64) {
    match t.record.state {
        RunState::Running => {
            let wake_at = now.saturating_add(t.record.remaining_secs);
            t.record.alarm_set_at_epoch_secs = now;
            t.effects.push(Effect::ScheduleWake {
                wake_at_epoch_secs: wake_at,
            });
            t.effects.push(Effect::ShowRunning {
                wake_at_epoch_secs: wake_at,
            });
            t.events.push(Event::WentBackground {
                state: RunState::Running,
                wake_at_epoch_secs: Some(wake_at),
                at: at(now),
            });
        }
        RunState::Paused => {
            t.effects.push(Effect::ShowPaused);
            t.events.push(Event::WentBackground {
                state: RunState::Paused,
                wake_at_epoch_secs: None,
                at: at(now),
            });
        }
        RunState::Stopped => {}
    }
}

fn enter_foreground(t: &mut Transition, now: u64) {
    // Cancel is idempotent and invoked on every foreground entry, preserving
    // the invariant that a wake is pending only while backgrounded-and-running.
    t.effects.push(Effect::CancelWake);
    t.effects.push(Effect::HidePresentation);
    reconcile(&mut t.record, now);
    t.events.push(Event::CameForeground {
        remaining_secs: t.record.remaining_secs,
        at: at(now),
    });
    if t.record.state == RunState::Running && t.record.remaining_secs == 0 {
        finish(t, now);
    }
}

fn wake_fired(t: &mut Transition, now: u64) {
    // A wake with no corresponding pending state (the user already stopped
    // the timer) is a no-op on the fresh record.
    if t.record.state == RunState::Stopped {
        return;
    }
    t.effects.push(Effect::CancelWake);
    t.effects.push(Effect::HidePresentation);
    reconcile(&mut t.record, now);
    if t.record.remaining_secs == 0 {
        finish(t, now);
    }
}

fn remote(t: &mut Transition, action: RemoteAction, now: u64) {
    match action {
        RemoteAction::Start => {
            t.record.previous_length_secs = t.record.configured_length_secs;
            t.record.remaining_secs = t.record.configured_length_secs;
            t.record.state = RunState::Running;
            t.events.push(Event::Started {
                length_secs: t.record.previous_length_secs,
                at: at(now),
            });
            arm_background(t, now);
        }
        RemoteAction::Pause => {
            if t.record.state != RunState::Running {
                return;
            }
            reconcile(&mut t.record, now);
            t.effects.push(Effect::CancelWake);
            if t.record.remaining_secs == 0 {
                finish(t, now);
                return;
            }
            t.record.state = RunState::Paused;
            t.effects.push(Effect::ShowPaused);
            t.events.push(Event::Paused {
                remaining_secs: t.record.remaining_secs,
                at: at(now),
            });
        }
        RemoteAction::Resume => {
            if t.record.state != RunState::Paused {
                return;
            }
            t.record.state = RunState::Running;
            t.events.push(Event::Resumed {
                remaining_secs: t.record.remaining_secs,
                at: at(now),
            });
            arm_background(t, now);
        }
        RemoteAction::Stop => stop(t, now),
    }
}

/// Re-arm the wake for a running timer while backgrounded. The remote-action
/// handler runs backgrounded by definition, so every state-changing remote
/// action carries these side effects.
fn arm_background(t: &mut Transition, now: u64) {
    let wake_at = now.saturating_add(t.record.remaining_secs);
    t.record.alarm_set_at_epoch_secs = now;
    t.effects.push(Effect::ScheduleWake {
        wake_at_epoch_secs: wake_at,
    });
    t.effects.push(Effect::ShowRunning {
        wake_at_epoch_secs: wake_at,
    });
}

/// Recompute remaining time from elapsed wall-clock time since the wake was
/// armed. Clearing `alarm_set_at` in the same transition guards against a
/// double reconcile for one background interval: the second call sees 0 and
/// leaves the remaining time unchanged.
fn reconcile(record: &mut TimerRecord, now: u64) {
    if record.alarm_set_at_epoch_secs > 0 {
        let elapsed = now.saturating_sub(record.alarm_set_at_epoch_secs);
        record.remaining_secs = record.remaining_secs.saturating_sub(elapsed);
        record.alarm_set_at_epoch_secs = 0;
    }
}

/// The countdown reached zero: converge to `Stopped` with the configured
/// length restored, regardless of which entry point got here first.
fn finish(t: &mut Transition, now: u64) {
    t.record.state = RunState::Stopped;
    t.record.remaining_secs = t.record.configured_length_secs;
    t.record.alarm_set_at_epoch_secs = 0;
    t.effects.push(Effect::CancelWake);
    t.effects.push(Effect::HidePresentation);
    t.effects.push(Effect::AnnounceFinished);
    t.events.push(Event::Finished { at: at(now) });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(remaining: u64, configured: u64) -> TimerRecord {
        TimerRecord {
            state: RunState::Running,
            configured_length_secs: configured,
            previous_length_secs: configured,
            remaining_secs: remaining,
            alarm_set_at_epoch_secs: 0,
        }
    }

    fn finished_once(t: &Transition) -> bool {
        t.events
            .iter()
            .filter(|e| matches!(e, Event::Finished { .. }))
            .count()
            == 1
    }

    #[test]
    fn start_uses_configured_length() {
        let record = TimerRecord::with_defaults(600);
        let t = apply(&record, Command::Start, 1000);
        assert_eq!(t.record.state, RunState::Running);
        assert_eq!(t.record.remaining_secs, 600);
        assert_eq!(t.record.previous_length_secs, 600);
    }

    #[test]
    fn start_from_paused_keeps_remaining() {
        let mut record = running(45, 600);
        record.state = RunState::Paused;
        let t = apply(&record, Command::Start, 1000);
        assert_eq!(t.record.state, RunState::Running);
        assert_eq!(t.record.remaining_secs, 45);
    }

    #[test]
    fn start_while_running_is_noop() {
        let record = running(45, 600);
        let t = apply(&record, Command::Start, 1000);
        assert_eq!(t.record, record);
        assert!(t.events.is_empty());
    }

    #[test]
    fn pause_freezes_remaining() {
        let record = running(120, 600);
        let t = apply(&record, Command::Pause, 1000);
        assert_eq!(t.record.state, RunState::Paused);
        assert_eq!(t.record.remaining_secs, 120);
    }

    #[test]
    fn stop_resets_and_cancels_wake() {
        let mut record = running(120, 600);
        record.alarm_set_at_epoch_secs = 900;
        let t = apply(&record, Command::Stop, 1000);
        assert_eq!(t.record.state, RunState::Stopped);
        assert_eq!(t.record.remaining_secs, 600);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 0);
        assert!(t.effects.contains(&Effect::CancelWake));
    }

    #[test]
    fn background_arms_wake_at_now_plus_remaining() {
        let record = running(120, 600);
        let t = apply(&record, Command::EnterBackground, 1000);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 1000);
        assert!(t.effects.contains(&Effect::ScheduleWake {
            wake_at_epoch_secs: 1120
        }));
        assert!(t.effects.contains(&Effect::ShowRunning {
            wake_at_epoch_secs: 1120
        }));
    }

    #[test]
    fn background_while_paused_arms_nothing() {
        let mut record = running(30, 600);
        record.state = RunState::Paused;
        let t = apply(&record, Command::EnterBackground, 1000);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 0);
        assert!(t.effects.contains(&Effect::ShowPaused));
        assert!(!t
            .effects
            .iter()
            .any(|e| matches!(e, Effect::ScheduleWake { .. })));

        // Foreground later leaves the remaining time untouched.
        let t2 = apply(&t.record, Command::EnterForeground, 5000);
        assert_eq!(t2.record.remaining_secs, 30);
        assert_eq!(t2.record.state, RunState::Paused);
    }

    #[test]
    fn foreground_reconciles_elapsed_background_time() {
        let record = running(120, 600);
        let backgrounded = apply(&record, Command::EnterBackground, 1000).record;
        let t = apply(&backgrounded, Command::EnterForeground, 1050);
        assert_eq!(t.record.remaining_secs, 70);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 0);
        assert_eq!(t.record.state, RunState::Running);
        assert!(t.effects.contains(&Effect::CancelWake));
        assert!(t.effects.contains(&Effect::HidePresentation));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let record = running(120, 600);
        let backgrounded = apply(&record, Command::EnterBackground, 1000).record;
        let once = apply(&backgrounded, Command::EnterForeground, 1050).record;
        let twice = apply(&once, Command::EnterForeground, 1090).record;
        assert_eq!(twice.remaining_secs, once.remaining_secs);
    }

    #[test]
    fn conservation_with_no_elapsed_time() {
        let record = TimerRecord::with_defaults(600);
        let now = 1000;
        let started = apply(&record, Command::Start, now).record;
        let paused = apply(&started, Command::Pause, now).record;
        let resumed = apply(&paused, Command::Start, now).record;
        let backgrounded = apply(&resumed, Command::EnterBackground, now).record;
        let foregrounded = apply(&backgrounded, Command::EnterForeground, now).record;
        assert_eq!(foregrounded.remaining_secs, 600);
    }

    #[test]
    fn countdown_is_monotonic() {
        let mut record = running(10, 600);
        let mut last = record.remaining_secs;
        let mut now = 1000;
        for step in 0..8 {
            let cmd = if step % 3 == 2 {
                // Round-trip through the background with 1s elapsed.
                record = apply(&record, Command::EnterBackground, now).record;
                now += 1;
                Command::EnterForeground
            } else {
                Command::Tick
            };
            record = apply(&record, cmd, now).record;
            if record.state != RunState::Running {
                break;
            }
            assert!(record.remaining_secs <= last);
            last = record.remaining_secs;
        }
    }

    #[test]
    fn late_wake_clamps_and_finishes() {
        let record = running(120, 600);
        let backgrounded = apply(&record, Command::EnterBackground, 1000).record;
        // Wake armed for 1120 fires late at 1130: 120 - 130 clamps to 0.
        let t = apply(&backgrounded, Command::WakeFired, 1130);
        assert_eq!(t.record.state, RunState::Stopped);
        assert_eq!(t.record.remaining_secs, 600);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 0);
        assert!(finished_once(&t));
        assert!(t.effects.contains(&Effect::AnnounceFinished));
    }

    #[test]
    fn wake_and_foreground_converge_in_either_order() {
        let mut record = running(5, 600);
        record.alarm_set_at_epoch_secs = 1000;
        let now = 1010;

        let wake_first = {
            let t1 = apply(&record, Command::WakeFired, now);
            apply(&t1.record, Command::EnterForeground, now).record
        };
        let foreground_first = {
            let t1 = apply(&record, Command::EnterForeground, now);
            apply(&t1.record, Command::WakeFired, now).record
        };

        assert_eq!(wake_first, foreground_first);
        assert_eq!(wake_first.state, RunState::Stopped);
        assert_eq!(wake_first.remaining_secs, 600);
    }

    #[test]
    fn completion_fires_once_per_finish() {
        let mut record = running(5, 600);
        record.alarm_set_at_epoch_secs = 1000;
        let t1 = apply(&record, Command::WakeFired, 1010);
        assert!(finished_once(&t1));
        // The racing foreground entry sees the already-stopped record.
        let t2 = apply(&t1.record, Command::EnterForeground, 1010);
        assert!(!t2.events.iter().any(|e| matches!(e, Event::Finished { .. })));
    }

    #[test]
    fn wake_after_stop_is_noop() {
        let record = TimerRecord::with_defaults(600);
        let t = apply(&record, Command::WakeFired, 1010);
        assert_eq!(t.record, record);
        assert!(t.effects.is_empty());
        assert!(t.events.is_empty());
    }

    #[test]
    fn tick_counts_down_and_finishes_at_zero() {
        let mut record = running(2, 600);
        record = apply(&record, Command::Tick, 1000).record;
        assert_eq!(record.remaining_secs, 1);
        let t = apply(&record, Command::Tick, 1001);
        assert_eq!(t.record.state, RunState::Stopped);
        assert_eq!(t.record.remaining_secs, 600);
        assert!(finished_once(&t));
    }

    #[test]
    fn tick_ignored_unless_running() {
        let record = TimerRecord::with_defaults(600);
        let t = apply(&record, Command::Tick, 1000);
        assert_eq!(t.record.remaining_secs, 600);
    }

    #[test]
    fn remote_start_arms_wake_for_configured_length() {
        let record = TimerRecord::with_defaults(600);
        let t = apply(&record, Command::Remote(RemoteAction::Start), 1000);
        assert_eq!(t.record.state, RunState::Running);
        assert_eq!(t.record.remaining_secs, 600);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 1000);
        assert!(t.effects.contains(&Effect::ScheduleWake {
            wake_at_epoch_secs: 1600
        }));
    }

    #[test]
    fn remote_pause_reconciles_before_freezing() {
        let record = running(120, 600);
        let backgrounded = apply(&record, Command::EnterBackground, 1000).record;
        let t = apply(&backgrounded, Command::Remote(RemoteAction::Pause), 1040);
        assert_eq!(t.record.state, RunState::Paused);
        assert_eq!(t.record.remaining_secs, 80);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 0);
        assert!(t.effects.contains(&Effect::CancelWake));
        assert!(t.effects.contains(&Effect::ShowPaused));
    }

    #[test]
    fn remote_resume_rearms_with_remaining() {
        let mut record = running(80, 600);
        record.state = RunState::Paused;
        let t = apply(&record, Command::Remote(RemoteAction::Resume), 2000);
        assert_eq!(t.record.state, RunState::Running);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 2000);
        assert!(t.effects.contains(&Effect::ScheduleWake {
            wake_at_epoch_secs: 2080
        }));
    }

    #[test]
    fn remote_stop_matches_foreground_stop() {
        let record = running(120, 600);
        let backgrounded = apply(&record, Command::EnterBackground, 1000).record;
        let t = apply(&backgrounded, Command::Remote(RemoteAction::Stop), 1050);
        assert_eq!(t.record.state, RunState::Stopped);
        assert_eq!(t.record.remaining_secs, 600);
        assert_eq!(t.record.alarm_set_at_epoch_secs, 0);
    }

    #[test]
    fn effective_remaining_accounts_for_armed_wake() {
        let mut record = running(120, 600);
        record.alarm_set_at_epoch_secs = 1000;
        assert_eq!(record.effective_remaining_secs(1050), 70);
        assert_eq!(record.effective_remaining_secs(2000), 0);
        record.alarm_set_at_epoch_secs = 0;
        assert_eq!(record.effective_remaining_secs(2000), 120);
    }
}
