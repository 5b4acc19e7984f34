//! Read-only views derived from a [`StreakState`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::evaluator::STREAK_MILESTONES;
use super::state::{StreakRules, StreakState};
use crate::calendar;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStatus {
    pub is_goal_met: bool,
    /// Goal not yet met and the week is nearly over.
    pub is_at_risk: bool,
    pub logs_remaining: u32,
    /// Days left in the current week, today included.
    pub days_left_in_week: u32,
    pub has_recovery_challenge: bool,
    pub recovery_progress: Option<RecoveryProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryProgress {
    pub current: u32,
    pub target: u32,
    pub deadline: NaiveDate,
    /// Days until the deadline, today included; 0 once it has passed.
    pub days_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekProgress {
    pub goal: u32,
    pub current: u32,
    /// 0..=100
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestone {
    pub milestone: u32,
    pub weeks_away: u32,
}

pub fn get_streak_status(state: &StreakState, today: NaiveDate, rules: &StreakRules) -> StreakStatus {
    let is_goal_met = state.is_goal_met();
    let days_left_in_week = calendar::days_left_in_week(today, rules.week_starts_on);

    let recovery_progress = state.recovery_challenge.as_ref().map(|challenge| {
        let remaining = calendar::days_between(today, challenge.deadline) + 1;
        RecoveryProgress {
            current: challenge.current_logs,
            target: challenge.target_logs,
            deadline: challenge.deadline,
            days_left: remaining.max(0) as u32,
        }
    });

    StreakStatus {
        is_goal_met,
        is_at_risk: !is_goal_met && days_left_in_week <= rules.at_risk_days,
        logs_remaining: state.weekly_goal.saturating_sub(state.current_week_logs),
        days_left_in_week,
        has_recovery_challenge: recovery_progress.is_some(),
        recovery_progress,
    }
}

pub fn get_week_progress(state: &StreakState) -> WeekProgress {
    let goal = state.weekly_goal;
    let current = state.current_week_logs;
    let denominator = u64::from(goal.max(1));
    // Integer round-half-up of 100 * current / goal.
    let rounded = (200 * u64::from(current) + denominator) / (2 * denominator);

    WeekProgress {
        goal,
        current,
        percentage: rounded.min(100) as u32,
    }
}

/// Smallest milestone strictly above `current_streak`, or `None` past the last one.
pub fn get_next_milestone(current_streak: u32) -> Option<NextMilestone> {
    STREAK_MILESTONES
        .iter()
        .copied()
        .find(|&milestone| milestone > current_streak)
        .map(|milestone| NextMilestone {
            milestone,
            weeks_away: milestone - current_streak,
        })
}
