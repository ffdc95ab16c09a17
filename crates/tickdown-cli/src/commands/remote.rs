use clap::Subcommand;
use tickdown_core::{Command, RemoteAction};

use super::{open_service, print_events};

/// Actions taken on the background status presentation. These run while the
/// app is backgrounded by definition, so each one re-arms or clears the wake
/// as part of its transition.
#[derive(Subcommand)]
pub enum RemoteCommand {
    /// Start a fresh countdown at the configured length
    Start,
    /// Pause, reconciling elapsed background time first
    Pause,
    /// Resume with the remaining time, re-arming the wake
    Resume,
    /// Stop and reset
    Stop,
}

pub fn run(action: RemoteCommand) -> Result<(), Box<dyn std::error::Error>> {
    let remote = match action {
        RemoteCommand::Start => RemoteAction::Start,
        RemoteCommand::Pause => RemoteAction::Pause,
        RemoteCommand::Resume => RemoteAction::Resume,
        RemoteCommand::Stop => RemoteAction::Stop,
    };
    let mut svc = open_service()?;
    let events = svc.dispatch(Command::Remote(remote))?;
    print_events(&events)
}
