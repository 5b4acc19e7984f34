use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every change a reconciliation or log makes to the streak produces an event.
/// The UI uses them for celebrations and notices; the state itself stays the
/// source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreakEvent {
    /// First reconciliation: tracking starts with this week.
    TrackingStarted {
        week_start: NaiveDate,
    },
    /// The stored week lay in the future (clock moved back) and was re-anchored.
    WeekReanchored {
        from: NaiveDate,
        to: NaiveDate,
    },
    LogRecorded {
        logged_on: NaiveDate,
        counted_for_week: bool,
        counted_for_recovery: bool,
    },
    WeekCompleted {
        week_start: NaiveDate,
        logs: u32,
        streak: u32,
    },
    ShieldUsed {
        week_start: NaiveDate,
        shields_left: u32,
        streak: u32,
    },
    StreakBroken {
        week_start: NaiveDate,
        previous_streak: u32,
    },
    RecoveryStarted {
        target_logs: u32,
        deadline: NaiveDate,
        previous_streak: u32,
    },
    /// Goal missed while a recovery challenge was still open.
    MissedDuringRecovery {
        week_start: NaiveDate,
    },
    RecoveryCompleted {
        restored_streak: u32,
    },
    RecoveryFailed {
        deadline: NaiveDate,
    },
    RecoveryCancelled {
        previous_streak: u32,
    },
    /// A met week closed while a challenge was still open; the challenge is dropped.
    RecoverySuperseded {
        week_start: NaiveDate,
        previous_streak: u32,
    },
    /// A week credited by recovery was closed without being counted again.
    RecoveredWeekClosed {
        week_start: NaiveDate,
    },
    MilestoneReached {
        milestone: u32,
    },
    ShieldEarned {
        milestone: u32,
        shields: u32,
    },
    WeeklyGoalChanged {
        from: u32,
        to: u32,
    },
}

impl StreakEvent {
    /// Milestone value if this event is a celebration.
    pub fn milestone(&self) -> Option<u32> {
        match self {
            StreakEvent::MilestoneReached { milestone } => Some(*milestone),
            _ => None,
        }
    }
}
