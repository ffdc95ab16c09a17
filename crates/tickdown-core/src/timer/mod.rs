mod engine;
mod format;
mod service;

pub use engine::{apply, Command, Effect, RemoteAction, RunState, TimerRecord, Transition};
pub use format::{format_mmss, progress_pct};
pub use service::TimerService;
