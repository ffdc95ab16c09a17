mod config;
mod store;

pub use config::Config;
pub use store::StateStore;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `TICKDOWN_DATA_DIR` overrides the location entirely (used by tests and
/// scripted hosts); otherwise `~/.config/tickdown/` is used.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TICKDOWN_DATA_DIR") {
        Some(path) => PathBuf::from(path),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tickdown"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
