//! Streak engine scenarios driven through the public tracker API.
//!
//! Every test seeds the key-value store, pins the clock, and checks both the
//! returned state and what ended up persisted.

use birthlog_core::streak::{RecoveryChallenge, STREAK_STATE_KEY};
use birthlog_core::{
    get_next_milestone, FixedClock, MemoryStore, StreakEvent, StreakRules, StreakState,
    StreakTracker, STREAK_MILESTONES,
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Monday of the tracked week in every scenario.
fn week() -> NaiveDate {
    d(2024, 3, 4)
}

fn seed(store: &MemoryStore, state: &StreakState) {
    store.insert(STREAK_STATE_KEY, &state.to_record().unwrap());
}

fn tracker(store: &MemoryStore, today: NaiveDate) -> StreakTracker<&MemoryStore, FixedClock> {
    StreakTracker::new(store, FixedClock::on(today), StreakRules::default())
}

fn streak_of(streak: u32, goal: u32, logs: u32, shields: u32) -> StreakState {
    StreakState {
        current_streak: streak,
        longest_streak: streak,
        weekly_goal: goal,
        current_week_logs: logs,
        streak_shields: shields,
        week_start_date: Some(week()),
        milestones_celebrated: STREAK_MILESTONES.iter().copied().filter(|m| *m <= streak).collect(),
        ..StreakState::default()
    }
}

#[test]
fn test_goal_met_mid_week_changes_nothing() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(3, 2, 2, 0));
    let t = tracker(&store, d(2024, 3, 7));

    let result = t.check_and_update_streak_status().unwrap();
    assert_eq!(result.state, streak_of(3, 2, 2, 0));
    assert!(result.events.is_empty());
    assert!(t.status_of(&result.state).is_goal_met);
}

#[test]
fn test_missed_week_without_shield_opens_recovery() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(5, 3, 0, 0));
    let t = tracker(&store, d(2024, 3, 11));

    let result = t.check_and_update_streak_status().unwrap();
    assert_eq!(result.state.current_streak, 0);
    assert_eq!(result.state.longest_streak, 5);
    assert_eq!(result.state.week_start_date, Some(d(2024, 3, 11)));

    let challenge = result.state.recovery_challenge.clone().unwrap();
    assert_eq!(challenge.previous_streak, 5);
    assert_eq!(challenge.target_logs, 3);
    assert_eq!(challenge.current_logs, 0);
    assert_eq!(challenge.deadline, d(2024, 3, 17));
    assert!(result
        .events
        .contains(&StreakEvent::StreakBroken { week_start: week(), previous_streak: 5 }));
    assert_eq!(t.load(), result.state);
}

#[test]
fn test_missed_week_from_zero_opens_recovery() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(0, 3, 0, 0));

    let result = tracker(&store, d(2024, 3, 11)).check_and_update_streak_status().unwrap();
    assert_eq!(result.state.current_streak, 0);
    let challenge = result.state.recovery_challenge.clone().unwrap();
    assert_eq!(challenge.previous_streak, 0);
    assert_eq!(challenge.target_logs, 3);
    assert_eq!(challenge.deadline, d(2024, 3, 17));
}

#[test]
fn test_lowered_goal_during_recovery_keeps_met_week() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(5, 3, 0, 0));

    let opened = tracker(&store, d(2024, 3, 11)).check_and_update_streak_status().unwrap();
    assert_eq!(opened.state.recovery_challenge.as_ref().map(|c| c.target_logs), Some(3));

    let t = tracker(&store, d(2024, 3, 12));
    t.set_weekly_goal(1).unwrap();
    t.record_log(d(2024, 3, 12)).unwrap();

    let result = tracker(&store, d(2024, 3, 18)).check_and_update_streak_status().unwrap();
    assert_eq!(result.state.current_streak, 1);
    assert!(result.state.recovery_challenge.is_none());
    assert!(!result
        .events
        .iter()
        .any(|e| matches!(e, StreakEvent::RecoveryFailed { .. })));
}

#[test]
fn test_missed_week_with_shield_keeps_streak() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(5, 3, 0, 1));
    let t = tracker(&store, d(2024, 3, 11));

    let result = t.check_and_update_streak_status().unwrap();
    assert_eq!(result.state.current_streak, 5);
    assert_eq!(result.state.streak_shields, 0);
    assert!(result.state.recovery_challenge.is_none());
}

#[test]
fn test_completed_recovery_restores_streak() {
    let store = MemoryStore::new();
    let mut state = streak_of(0, 3, 3, 0);
    state.longest_streak = 7;
    state.recovery_challenge = Some(RecoveryChallenge {
        target_logs: 3,
        current_logs: 3,
        deadline: d(2024, 3, 10),
        previous_streak: 7,
        opened_on: Some(week()),
    });
    seed(&store, &state);

    let result = tracker(&store, d(2024, 3, 8)).check_and_update_streak_status().unwrap();
    assert_eq!(result.state.current_streak, 8);
    assert_eq!(result.state.longest_streak, 8);
    assert!(result.state.recovery_challenge.is_none());
    assert!(result
        .events
        .contains(&StreakEvent::RecoveryCompleted { restored_streak: 8 }));
}

#[test]
fn test_expired_recovery_resets_streak() {
    let store = MemoryStore::new();
    let mut state = streak_of(0, 3, 1, 0);
    state.longest_streak = 7;
    state.recovery_challenge = Some(RecoveryChallenge {
        target_logs: 3,
        current_logs: 1,
        deadline: d(2024, 3, 6),
        previous_streak: 7,
        opened_on: Some(d(2024, 2, 28)),
    });
    seed(&store, &state);

    let result = tracker(&store, d(2024, 3, 8)).check_and_update_streak_status().unwrap();
    assert_eq!(result.state.current_streak, 0);
    assert!(result.state.recovery_challenge.is_none());
    assert!(result
        .events
        .contains(&StreakEvent::RecoveryFailed { deadline: d(2024, 3, 6) }));
}

#[test]
fn test_milestone_four_celebrated_once() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(3, 1, 1, 0));

    let t = tracker(&store, d(2024, 3, 11));
    let first = t.check_and_update_streak_status().unwrap();
    assert_eq!(first.state.current_streak, 4);
    assert_eq!(first.newly_celebrated(), vec![4]);
    assert!(first.state.milestones_celebrated.contains(&4));

    let again = t.check_and_update_streak_status().unwrap();
    assert!(again.newly_celebrated().is_empty());
    assert_eq!(again.state, first.state);

    let next = get_next_milestone(first.state.current_streak).unwrap();
    assert_eq!(next.milestone, 12);
    assert_eq!(next.weeks_away, 8);
}

#[test]
fn test_logging_through_a_recovery() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(2, 2, 0, 0));

    // Missed week of 03-04; recovery opens on 03-11.
    let t = tracker(&store, d(2024, 3, 12));
    let opened = t.record_log(d(2024, 3, 12)).unwrap();
    assert_eq!(opened.state.current_streak, 0);
    assert_eq!(opened.state.recovery_challenge.as_ref().map(|c| c.current_logs), Some(1));

    let restored = tracker(&store, d(2024, 3, 13)).record_log(d(2024, 3, 13)).unwrap();
    assert_eq!(restored.state.current_streak, 3);
    assert!(restored.state.recovery_challenge.is_none());

    // The recovery week is not counted a second time at rollover.
    let rolled = tracker(&store, d(2024, 3, 18)).check_and_update_streak_status().unwrap();
    assert_eq!(rolled.state.current_streak, 3);
    assert!(rolled
        .events
        .contains(&StreakEvent::RecoveredWeekClosed { week_start: d(2024, 3, 11) }));
}

#[test]
fn test_cancel_recovery_keeps_streak_at_zero() {
    let store = MemoryStore::new();
    seed(&store, &streak_of(4, 1, 0, 0));
    let t = tracker(&store, d(2024, 3, 12));
    t.check_and_update_streak_status().unwrap();

    let state = t.cancel_recovery_challenge().unwrap();
    assert!(state.recovery_challenge.is_none());
    assert_eq!(state.current_streak, 0);
    assert_eq!(state.longest_streak, 4);
    assert_eq!(t.load(), state);
}

#[test]
fn test_first_launch_anchors_current_week() {
    let store = MemoryStore::new();
    let result = tracker(&store, d(2024, 3, 9)).check_and_update_streak_status().unwrap();
    assert_eq!(result.state.week_start_date, Some(week()));
    assert_eq!(result.state.current_streak, 0);
    assert!(store.get(STREAK_STATE_KEY).is_some());
}
