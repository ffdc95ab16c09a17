pub mod config;
pub mod remote;
pub mod timer;
pub mod wake;

use tickdown_core::{
    Config, Event, FileWakeScheduler, LogPresenter, StateStore, SystemClock, TimerService,
};

pub type Service = TimerService<FileWakeScheduler, LogPresenter, SystemClock>;

/// Build a service for one entry-point invocation. Every invocation loads
/// the durable record fresh; no in-memory engine instance is assumed to
/// exist between invocations.
pub fn open_service() -> Result<Service, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = StateStore::open()?;
    let wake = FileWakeScheduler::open()?;
    Ok(TimerService::new(
        store,
        wake,
        LogPresenter,
        SystemClock,
        config.default_length_secs(),
    ))
}

/// Print events as pretty JSON, one document per event.
pub fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}
