//! # Tickdown Core Library
//!
//! Core business logic for tickdown, a single-countdown timer that stays
//! correct across arbitrary suspension of its host process. All operations
//! are available via a standalone CLI binary; any GUI layer is a thin shell
//! over this library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure state machine over the durable [`TimerRecord`].
//!   Every entry point (foreground controller, wake handler, remote-action
//!   handler) funnels through the same `apply(record, command, now)` function,
//!   so the transition logic is written and tested exactly once.
//! - **Storage**: SQLite-based key/value record storage and TOML-based
//!   configuration. The persisted record is the single source of truth;
//!   in-memory state is only a cache for the active tick loop.
//! - **Wake scheduling**: a one-shot wall-clock wake contract used to resume
//!   engine logic while the process may be suspended or dead.
//!
//! ## Key Components
//!
//! - [`TimerRecord`] / [`apply`]: the durable record and its state machine
//! - [`TimerService`]: impure shell wiring store, wake scheduler, presenter
//! - [`StateStore`]: durable record persistence
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod presenter;
pub mod storage;
pub mod timer;
pub mod wake;

pub use clock::{Clock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, WakeError};
pub use events::Event;
pub use presenter::{LogPresenter, Presenter};
pub use storage::{Config, StateStore};
pub use timer::{
    apply, Command, Effect, RemoteAction, RunState, TimerRecord, TimerService, Transition,
};
pub use wake::{FileWakeScheduler, WakeScheduler};
