use std::time::Duration;

use clap::Subcommand;
use tickdown_core::{Command, Event, RunState};

use super::{open_service, print_events, Service};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (resumes a paused one)
    Start,
    /// Pause the running countdown
    Pause,
    /// Stop and reset to the configured length
    Stop,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground until it finishes or ctrl-c
    Watch,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut svc = open_service()?;
    match action {
        TimerAction::Start => one_shot(&mut svc, Command::Start),
        TimerAction::Pause => one_shot(&mut svc, Command::Pause),
        TimerAction::Stop => one_shot(&mut svc, Command::Stop),
        TimerAction::Status => {
            let snapshot = svc.snapshot()?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        TimerAction::Watch => watch(&mut svc),
    }
}

/// A one-shot invocation is a brief foreground session: reconcile on the way
/// in, apply the user action, hand off to the background wake on the way out.
fn one_shot(svc: &mut Service, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = svc.dispatch(Command::EnterForeground)?;
    events.extend(svc.dispatch(command)?);
    events.extend(svc.dispatch(Command::EnterBackground)?);
    print_events(&events)
}

/// Foreground tick loop. Ticks once per second while running; any exit path
/// (completion, ctrl-c, not running) goes through EnterBackground so the
/// wake handoff is never skipped.
fn watch(svc: &mut Service) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let events = svc.dispatch(Command::EnterForeground)?;
        print_events(&events)?;

        let mut running = matches!(
            svc.snapshot()?,
            Event::Snapshot {
                state: RunState::Running,
                ..
            }
        );

        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick completes immediately; consume it so the countdown
        // decrements on whole-second boundaries.
        interval.tick().await;

        while running {
            tokio::select! {
                _ = interval.tick() => {
                    let events = svc.dispatch(Command::Tick)?;
                    match svc.snapshot()? {
                        Event::Snapshot { state, label, .. } => {
                            println!("{label}");
                            running = state == RunState::Running;
                        }
                        _ => running = false,
                    }
                    if events.iter().any(|e| matches!(e, Event::Finished { .. })) {
                        print_events(&events)?;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    running = false;
                }
            }
        }

        let events = svc.dispatch(Command::EnterBackground)?;
        print_events(&events)?;
        Ok(())
    })
}
