//! Core error types for birthlog-core.
//!
//! This module defines the error hierarchy using thiserror. Streak
//! operations carry the state they would have produced (or the unchanged
//! prior state) inside their errors so the UI is never left without
//! something to show.

use std::path::PathBuf;
use thiserror::Error;

use crate::streak::{StreakEvent, StreakState};

/// Core error type for birthlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Streak operation errors
    #[error("Streak error: {0}")]
    Streak(#[from] StreakError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the key-value store and the birth log database.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The backing store refused the write
    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A date later than today was supplied
    #[error("Date {date} is in the future (today is {today})")]
    FutureDate {
        date: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },
}

/// Errors from streak tracker operations.
#[derive(Error, Debug)]
pub enum StreakError {
    /// Goal below the minimum of one log per week. `current` is the
    /// untouched prior state.
    #[error("Weekly goal must be at least 1, got {goal}")]
    InvalidGoal {
        goal: u32,
        current: Box<StreakState>,
    },

    /// Input rejected before any mutation. `current` is the untouched prior state.
    #[error("Rejected: {reason}")]
    Rejected {
        reason: ValidationError,
        current: Box<StreakState>,
    },

    /// The update was computed but could not be written. `attempted` is
    /// what the UI should show; the next load may not reflect it.
    #[error("Failed to persist streak state: {source}")]
    PersistFailed {
        attempted: Box<StreakState>,
        events: Vec<StreakEvent>,
        #[source]
        source: StorageError,
    },
}

impl StreakError {
    /// The state the caller should display after this failure.
    pub fn state(&self) -> &StreakState {
        match self {
            StreakError::InvalidGoal { current, .. } => current,
            StreakError::Rejected { current, .. } => current,
            StreakError::PersistFailed { attempted, .. } => attempted,
        }
    }

    pub fn into_state(self) -> StreakState {
        self.into_parts().0
    }

    /// The state to display plus the events that produced it. Only a failed
    /// write has events; rejected input changed nothing.
    pub fn into_parts(self) -> (StreakState, Vec<StreakEvent>) {
        match self {
            StreakError::InvalidGoal { current, .. } => (*current, Vec::new()),
            StreakError::Rejected { current, .. } => (*current, Vec::new()),
            StreakError::PersistFailed {
                attempted, events, ..
            } => (*attempted, events),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_error_exposes_state() {
        let mut state = StreakState::default();
        state.current_streak = 3;
        let err = StreakError::InvalidGoal {
            goal: 0,
            current: Box::new(state.clone()),
        };
        assert_eq!(err.state().current_streak, 3);
        assert!(err.to_string().contains("at least 1"));
        assert_eq!(err.into_state(), state);
    }

    #[test]
    fn persist_failure_parts_keep_events() {
        let week_start = chrono::NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
        let err = StreakError::PersistFailed {
            attempted: Box::new(StreakState::default()),
            events: vec![StreakEvent::TrackingStarted { week_start }],
            source: StorageError::Locked,
        };
        let (state, events) = err.into_parts();
        assert_eq!(state, StreakState::default());
        assert_eq!(events, vec![StreakEvent::TrackingStarted { week_start }]);
    }

    #[test]
    fn locked_sqlite_error_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(StorageError::from(err), StorageError::Locked));
    }
}
