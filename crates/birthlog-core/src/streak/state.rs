//! Persisted streak record and the rules that drive it.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weekly goal used when no configuration says otherwise.
pub const DEFAULT_WEEKLY_GOAL: u32 = 1;

/// The single streak record.
///
/// Numeric fields are required when deserializing: a record missing any of
/// them is treated as malformed and replaced with the default state by the
/// tracker. Optional fields default to absent so older records still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    /// Consecutive weeks the weekly goal was met.
    pub current_streak: u32,
    /// Historical maximum of `current_streak`.
    pub longest_streak: u32,
    #[serde(default)]
    pub last_log_date: Option<NaiveDate>,
    /// Logs required per week for the week to count.
    pub weekly_goal: u32,
    /// Logs recorded in the tracked week.
    pub current_week_logs: u32,
    /// First day of the tracked week.
    #[serde(default)]
    pub week_start_date: Option<NaiveDate>,
    pub streak_shields: u32,
    #[serde(default)]
    pub recovery_challenge: Option<RecoveryChallenge>,
    #[serde(default)]
    pub milestones_celebrated: BTreeSet<u32>,
    /// Legacy marker from the old one-tap streak save. Kept for round-tripping only.
    #[serde(default)]
    pub streak_save_used_at: Option<NaiveDate>,
    /// Week already credited by a completed recovery; closing it must not
    /// credit it again.
    #[serde(default)]
    pub credited_week_start: Option<NaiveDate>,
}

impl Default for StreakState {
    fn default() -> Self {
        Self::with_goal(DEFAULT_WEEKLY_GOAL)
    }
}

impl StreakState {
    /// Zero state with the given weekly goal (clamped to at least 1).
    pub fn with_goal(weekly_goal: u32) -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_log_date: None,
            weekly_goal: weekly_goal.max(1),
            current_week_logs: 0,
            week_start_date: None,
            streak_shields: 0,
            recovery_challenge: None,
            milestones_celebrated: BTreeSet::new(),
            streak_save_used_at: None,
            credited_week_start: None,
        }
    }

    /// Parse a persisted record, rejecting shapes the evaluator cannot work with.
    pub fn from_record(record: &str) -> Result<Self, String> {
        let state: StreakState = serde_json::from_str(record).map_err(|e| e.to_string())?;
        if state.weekly_goal == 0 {
            return Err("weeklyGoal must be at least 1".to_string());
        }
        if let Some(challenge) = &state.recovery_challenge {
            if challenge.target_logs == 0 {
                return Err("recoveryChallenge.targetLogs must be positive".to_string());
            }
        }
        Ok(state)
    }

    pub fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_goal_met(&self) -> bool {
        self.current_week_logs >= self.weekly_goal
    }
}

/// An attempt to win back a broken streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryChallenge {
    pub target_logs: u32,
    pub current_logs: u32,
    /// Last day (inclusive) on which a log still counts.
    pub deadline: NaiveDate,
    /// Streak restored, plus one, on success.
    pub previous_streak: u32,
    /// First day on which a log counts. Absent on records written before it existed.
    #[serde(default)]
    pub opened_on: Option<NaiveDate>,
}

impl RecoveryChallenge {
    pub fn is_complete(&self) -> bool {
        self.current_logs >= self.target_logs
    }

    /// Incomplete and past its deadline as of `date`.
    pub fn is_expired(&self, date: NaiveDate) -> bool {
        !self.is_complete() && date > self.deadline
    }

    /// Whether a log made on `date` counts toward this challenge.
    pub fn accepts(&self, date: NaiveDate) -> bool {
        date <= self.deadline && self.opened_on.is_none_or(|opened| date >= opened)
    }
}

/// Longest recovery window accepted from configuration.
pub const MAX_RECOVERY_WINDOW_DAYS: u32 = 365;

/// Tunable streak behavior, loaded from the `[streak]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRules {
    /// Weekly goal given to a freshly created state.
    #[serde(default = "default_weekly_goal")]
    pub default_weekly_goal: u32,
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: Weekday,
    /// A week short of its goal is at risk once this few days remain.
    #[serde(default = "default_at_risk_days")]
    pub at_risk_days: u32,
    /// Length of a recovery challenge, starting the day after the missed week.
    #[serde(default = "default_recovery_window_days")]
    pub recovery_window_days: u32,
    #[serde(default = "default_max_shields")]
    pub max_shields: u32,
    /// Shields granted for each newly reached milestone. 0 disables earning.
    #[serde(default = "default_shields_per_milestone")]
    pub shields_per_milestone: u32,
}

fn default_weekly_goal() -> u32 {
    DEFAULT_WEEKLY_GOAL
}
fn default_week_starts_on() -> Weekday {
    Weekday::Mon
}
fn default_at_risk_days() -> u32 {
    2
}
fn default_recovery_window_days() -> u32 {
    7
}
fn default_max_shields() -> u32 {
    2
}
fn default_shields_per_milestone() -> u32 {
    0
}

impl Default for StreakRules {
    fn default() -> Self {
        Self {
            default_weekly_goal: default_weekly_goal(),
            week_starts_on: default_week_starts_on(),
            at_risk_days: default_at_risk_days(),
            recovery_window_days: default_recovery_window_days(),
            max_shields: default_max_shields(),
            shields_per_milestone: default_shields_per_milestone(),
        }
    }
}

impl StreakRules {
    /// Check values the evaluator relies on.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_weekly_goal == 0 {
            return Err(ConfigError::InvalidValue {
                key: "streak.default_weekly_goal".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(1..=MAX_RECOVERY_WINDOW_DAYS).contains(&self.recovery_window_days) {
            return Err(ConfigError::InvalidValue {
                key: "streak.recovery_window_days".into(),
                message: format!("must be between 1 and {MAX_RECOVERY_WINDOW_DAYS}"),
            });
        }
        if self.at_risk_days > 7 {
            return Err(ConfigError::InvalidValue {
                key: "streak.at_risk_days".into(),
                message: "cannot exceed the 7 days of a week".into(),
            });
        }
        Ok(())
    }

    pub fn initial_state(&self) -> StreakState {
        StreakState::with_goal(self.default_weekly_goal)
    }
}
