mod config;
pub mod database;
pub mod kv;
pub mod migrations;

pub use config::{Config, StatsConfig};
pub use database::{BirthRecord, BirthStats, DataResetSummary, Database, WeekCount};
pub use kv::{KeyValueStore, MemoryStore};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `BIRTHLOG_DATA_DIR` wins when set. Otherwise `~/.config/birthlog`, or
/// `~/.config/birthlog-dev` with `BIRTHLOG_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("BIRTHLOG_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BIRTHLOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("birthlog-dev")
            } else {
                base_dir.join("birthlog")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
