//! # Birthlog Core Library
//!
//! This library provides the core logic for Birthlog, a personal record of
//! attended births. The desktop/mobile UI and the `birthlog` CLI are thin
//! layers over the same library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: a weekly logging streak with shields, recovery
//!   challenges and milestones. A pure evaluator reconciles the persisted
//!   record against the calendar on every activation.
//! - **Storage**: SQLite birth log plus a key-value table for application
//!   state, and TOML-based configuration
//! - **Calendar**: week arithmetic and an injectable clock
//!
//! ## Key Components
//!
//! - [`StreakTracker`]: load, reconcile and persist the streak record
//! - [`StreakPresenter`]: one refreshable view-model for the UI
//! - [`Database`]: birth log and key-value persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod storage;
pub mod streak;

pub use calendar::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, StreakError, ValidationError};
pub use events::StreakEvent;
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use streak::{
    check_and_update_streak_status, get_next_milestone, get_streak_status, get_week_progress,
    Reconciliation, StreakPresenter, StreakRules, StreakState, StreakTracker, StreakViewModel,
    STREAK_MILESTONES,
};
