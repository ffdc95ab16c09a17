use clap::Subcommand;
use tickdown_core::Command;

use super::{open_service, print_events};

#[derive(Subcommand)]
pub enum WakeAction {
    /// Deliver the scheduled wake callback
    Fired,
}

/// The wake handler loads and persists the record on its own; it must work
/// even when no other process has the timer in memory.
pub fn run(action: WakeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WakeAction::Fired => {
            let mut svc = open_service()?;
            let events = svc.dispatch(Command::WakeFired)?;
            print_events(&events)
        }
    }
}
