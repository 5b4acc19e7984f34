//! Streak reconciliation.
//!
//! Pure functions that bring a [`StreakState`] up to date with a calendar
//! date. Nothing here touches storage; the tracker loads, calls in, and
//! persists the result.
//!
//! ## Per-week transitions
//!
//! ```text
//! WITHIN_WEEK ──boundary──> GOAL_MET ─────────────> streak + 1, open challenge dropped
//!                      └──> GOAL_MISSED ─┬─ challenge open ─┬─ expired ──> RECOVERY_EXPIRED (streak = 0)
//!                                        │                  └─ running ──> no change
//!                                        ├─ shield ───────────────────────> shield - 1
//!                                        └─ no shield ────────────────────> RECOVERY_ACTIVE (streak = 0)
//! RECOVERY_ACTIVE ──target reached──> streak = previous + 1
//! ```

use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use serde::Serialize;

use super::state::{RecoveryChallenge, StreakRules, StreakState};
use crate::calendar::{self, DAYS_PER_WEEK};
use crate::error::ValidationError;
use crate::events::StreakEvent;

/// Weekly streak lengths worth celebrating, ascending.
pub const STREAK_MILESTONES: &[u32] = &[1, 4, 12, 26, 52];

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub state: StreakState,
    pub events: Vec<StreakEvent>,
}

impl Reconciliation {
    /// Milestones celebrated for the first time in this pass.
    pub fn newly_celebrated(&self) -> Vec<u32> {
        self.events.iter().filter_map(StreakEvent::milestone).collect()
    }
}

/// Reconcile `state` against `today`.
///
/// Order of evaluation: a completed recovery challenge is credited first,
/// then every week boundary crossed since the tracked week is closed oldest
/// to newest, then an expired challenge is failed, and finally milestones
/// are checked. Calling this twice with the same date yields the same state.
pub fn check_and_update_streak_status(
    state: &StreakState,
    today: NaiveDate,
    rules: &StreakRules,
) -> Reconciliation {
    let mut next = state.clone();
    let mut events = Vec::new();

    complete_recovery(&mut next, &mut events);
    roll_weeks(&mut next, today, rules, &mut events);
    fail_expired_recovery(&mut next, today, &mut events);
    next.longest_streak = next.longest_streak.max(next.current_streak);
    celebrate_milestones(&mut next, rules, &mut events);

    if events.is_empty() {
        debug!("[streak] reconcile today={} no changes", today);
    }

    Reconciliation {
        state: next,
        events,
    }
}

/// Count one log made on `logged_on` and reconcile around it.
///
/// The state is reconciled before the log is applied so the log lands in
/// the right week, and again afterwards so a recovery challenge completed
/// by this log is credited immediately.
///
/// # Errors
/// Returns `ValidationError::FutureDate` if `logged_on` is after `today`.
pub fn apply_log(
    state: &StreakState,
    logged_on: NaiveDate,
    today: NaiveDate,
    rules: &StreakRules,
) -> Result<Reconciliation, ValidationError> {
    if logged_on > today {
        return Err(ValidationError::FutureDate {
            date: logged_on,
            today,
        });
    }

    let Reconciliation {
        state: mut next,
        mut events,
    } = check_and_update_streak_status(state, today, rules);

    let counted_for_week = next
        .week_start_date
        .is_some_and(|week| calendar::same_week(logged_on, week, rules.week_starts_on));
    if counted_for_week {
        next.current_week_logs = next.current_week_logs.saturating_add(1);
    }

    next.last_log_date = Some(next.last_log_date.map_or(logged_on, |last| last.max(logged_on)));

    let mut counted_for_recovery = false;
    if let Some(challenge) = next.recovery_challenge.as_mut() {
        if challenge.accepts(logged_on) {
            challenge.current_logs = challenge.current_logs.saturating_add(1);
            counted_for_recovery = true;
        }
    }

    info!(
        "[streak] log recorded logged_on={} week_logs={} recovery={}",
        logged_on, next.current_week_logs, counted_for_recovery
    );
    events.push(StreakEvent::LogRecorded {
        logged_on,
        counted_for_week,
        counted_for_recovery,
    });

    let settled = check_and_update_streak_status(&next, today, rules);
    events.extend(settled.events);

    Ok(Reconciliation {
        state: settled.state,
        events,
    })
}

fn complete_recovery(state: &mut StreakState, events: &mut Vec<StreakEvent>) {
    let Some(challenge) = state.recovery_challenge.as_ref() else {
        return;
    };
    if !challenge.is_complete() {
        return;
    }

    let restored = challenge.previous_streak.saturating_add(1);
    state.current_streak = restored;
    state.recovery_challenge = None;
    state.credited_week_start = state.week_start_date;

    info!("[streak] recovery completed restored_streak={}", restored);
    events.push(StreakEvent::RecoveryCompleted {
        restored_streak: restored,
    });
}

fn roll_weeks(
    state: &mut StreakState,
    today: NaiveDate,
    rules: &StreakRules,
    events: &mut Vec<StreakEvent>,
) {
    let current_week = calendar::week_start(today, rules.week_starts_on);

    let Some(stored) = state.week_start_date else {
        state.week_start_date = Some(current_week);
        info!("[streak] tracking started week_start={}", current_week);
        events.push(StreakEvent::TrackingStarted {
            week_start: current_week,
        });
        return;
    };

    // Normalize in case the configured first weekday changed.
    let tracked = calendar::week_start(stored, rules.week_starts_on);
    let crossed = calendar::weeks_between(tracked, current_week, rules.week_starts_on);

    if crossed < 0 {
        warn!(
            "[streak] tracked week {} is after current week {}; re-anchoring",
            tracked, current_week
        );
        state.week_start_date = Some(current_week);
        events.push(StreakEvent::WeekReanchored {
            from: stored,
            to: current_week,
        });
        return;
    }

    state.week_start_date = Some(tracked);
    if crossed == 0 {
        return;
    }

    for index in 0..crossed {
        let week = tracked + Duration::days(index * DAYS_PER_WEEK);
        let boundary = week + Duration::days(DAYS_PER_WEEK);
        let logs = if index == 0 { state.current_week_logs } else { 0 };

        close_week(state, week, boundary, logs, rules, events);
    }

    state.current_week_logs = 0;
    state.week_start_date = Some(current_week);
    if state.credited_week_start.is_some_and(|credited| credited < current_week) {
        state.credited_week_start = None;
    }
}

fn close_week(
    state: &mut StreakState,
    week: NaiveDate,
    boundary: NaiveDate,
    logs: u32,
    rules: &StreakRules,
    events: &mut Vec<StreakEvent>,
) {
    if state.credited_week_start == Some(week) {
        state.credited_week_start = None;
        debug!("[streak] week {} already credited by recovery", week);
        events.push(StreakEvent::RecoveredWeekClosed { week_start: week });
        return;
    }

    if logs >= state.weekly_goal {
        // A met week settles any challenge still open, e.g. after the goal
        // was lowered below its target.
        if let Some(challenge) = state.recovery_challenge.take() {
            info!(
                "[streak] recovery superseded by met week week_start={} previous_streak={}",
                week, challenge.previous_streak
            );
            events.push(StreakEvent::RecoverySuperseded {
                week_start: week,
                previous_streak: challenge.previous_streak,
            });
        }
        state.current_streak = state.current_streak.saturating_add(1);
        state.longest_streak = state.longest_streak.max(state.current_streak);
        info!(
            "[streak] week completed week_start={} logs={} streak={}",
            week, logs, state.current_streak
        );
        events.push(StreakEvent::WeekCompleted {
            week_start: week,
            logs,
            streak: state.current_streak,
        });
        return;
    }

    miss_week(state, week, boundary, rules, events);
}

fn miss_week(
    state: &mut StreakState,
    week: NaiveDate,
    boundary: NaiveDate,
    rules: &StreakRules,
    events: &mut Vec<StreakEvent>,
) {
    // An open challenge alone governs the miss; shields are never touched.
    if let Some(challenge) = state.recovery_challenge.as_ref() {
        if challenge.is_expired(boundary) {
            let deadline = challenge.deadline;
            state.recovery_challenge = None;
            state.current_streak = 0;
            info!("[streak] recovery failed deadline={} week_start={}", deadline, week);
            events.push(StreakEvent::RecoveryFailed { deadline });
        } else {
            debug!("[streak] week {} missed during recovery", week);
            events.push(StreakEvent::MissedDuringRecovery { week_start: week });
        }
        return;
    }

    if state.streak_shields > 0 {
        state.streak_shields -= 1;
        info!(
            "[streak] shield used week_start={} shields_left={} streak={}",
            week, state.streak_shields, state.current_streak
        );
        events.push(StreakEvent::ShieldUsed {
            week_start: week,
            shields_left: state.streak_shields,
            streak: state.current_streak,
        });
        return;
    }

    let previous_streak = state.current_streak;
    let window = i64::from(rules.recovery_window_days.max(1));
    let deadline = boundary
        .checked_add_signed(Duration::days(window - 1))
        .unwrap_or(NaiveDate::MAX);
    let challenge = RecoveryChallenge {
        target_logs: state.weekly_goal.max(1),
        current_logs: 0,
        deadline,
        previous_streak,
        opened_on: Some(boundary),
    };

    state.current_streak = 0;
    info!(
        "[streak] streak broken week_start={} previous_streak={} recovery_deadline={}",
        week, previous_streak, challenge.deadline
    );
    events.push(StreakEvent::StreakBroken {
        week_start: week,
        previous_streak,
    });
    events.push(StreakEvent::RecoveryStarted {
        target_logs: challenge.target_logs,
        deadline: challenge.deadline,
        previous_streak,
    });
    state.recovery_challenge = Some(challenge);
}

fn fail_expired_recovery(state: &mut StreakState, today: NaiveDate, events: &mut Vec<StreakEvent>) {
    let Some(challenge) = state.recovery_challenge.as_ref() else {
        return;
    };
    if !challenge.is_expired(today) {
        return;
    }

    let deadline = challenge.deadline;
    state.recovery_challenge = None;
    state.current_streak = 0;
    info!("[streak] recovery failed deadline={} today={}", deadline, today);
    events.push(StreakEvent::RecoveryFailed { deadline });
}

fn celebrate_milestones(state: &mut StreakState, rules: &StreakRules, events: &mut Vec<StreakEvent>) {
    for &milestone in STREAK_MILESTONES {
        if milestone > state.current_streak {
            break;
        }
        if !state.milestones_celebrated.insert(milestone) {
            continue;
        }

        info!("[streak] milestone reached milestone={}", milestone);
        events.push(StreakEvent::MilestoneReached { milestone });

        let earned = state
            .streak_shields
            .saturating_add(rules.shields_per_milestone)
            .min(rules.max_shields);
        if earned > state.streak_shields {
            state.streak_shields = earned;
            events.push(StreakEvent::ShieldEarned {
                milestone,
                shields: earned,
            });
        }
    }
}
