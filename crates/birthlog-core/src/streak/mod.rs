//! Weekly logging streak engine.
//!
//! - [`state`]: the persisted record and the configurable rules
//! - [`evaluator`]: pure reconciliation of state against a date
//! - [`projector`]: derived, read-only views
//! - [`tracker`]: load/persist around the evaluator
//! - [`presenter`]: one refreshable view-model for the UI

pub mod evaluator;
pub mod presenter;
pub mod projector;
pub mod state;
pub mod tracker;

pub use crate::events::StreakEvent;
pub use evaluator::{apply_log, check_and_update_streak_status, Reconciliation, STREAK_MILESTONES};
pub use presenter::{StreakPresenter, StreakViewModel};
pub use projector::{
    get_next_milestone, get_streak_status, get_week_progress, NextMilestone, RecoveryProgress,
    StreakStatus, WeekProgress,
};
pub use state::{
    RecoveryChallenge, StreakRules, StreakState, DEFAULT_WEEKLY_GOAL, MAX_RECOVERY_WINDOW_DAYS,
};
pub use tracker::{StreakTracker, STREAK_STATE_KEY};
