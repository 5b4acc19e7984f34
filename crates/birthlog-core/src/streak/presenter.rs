//! View-model handed to the UI on every activation or refresh.

use serde::Serialize;

use super::evaluator::Reconciliation;
use super::projector::{self, NextMilestone, StreakStatus, WeekProgress};
use super::state::StreakState;
use super::tracker::StreakTracker;
use crate::calendar::Clock;
use crate::events::StreakEvent;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakViewModel {
    pub state: StreakState,
    pub status: StreakStatus,
    pub progress: WeekProgress,
    pub next_milestone: Option<NextMilestone>,
    /// What the refresh changed; celebrations come from `MilestoneReached`.
    pub events: Vec<StreakEvent>,
    /// False when the refreshed state could not be written back.
    pub persisted: bool,
}

pub struct StreakPresenter<S, C> {
    tracker: StreakTracker<S, C>,
}

impl<S: KeyValueStore, C: Clock> StreakPresenter<S, C> {
    pub fn new(tracker: StreakTracker<S, C>) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &StreakTracker<S, C> {
        &self.tracker
    }

    /// Reconcile and project. Never fails: a write failure still yields the
    /// reconciled state, flagged as not persisted.
    pub fn refresh(&self) -> StreakViewModel {
        match self.tracker.check_and_update_streak_status() {
            Ok(Reconciliation { state, events }) => self.view(state, events, true),
            Err(err) => {
                let (state, events) = err.into_parts();
                self.view(state, events, false)
            }
        }
    }

    /// Project `state` without reconciling or writing.
    pub fn view(&self, state: StreakState, events: Vec<StreakEvent>, persisted: bool) -> StreakViewModel {
        StreakViewModel {
            status: self.tracker.status_of(&state),
            progress: projector::get_week_progress(&state),
            next_milestone: projector::get_next_milestone(state.current_streak),
            state,
            events,
            persisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::storage::MemoryStore;
    use crate::streak::StreakRules;
    use chrono::NaiveDate;

    fn presenter(store: &MemoryStore) -> StreakPresenter<&MemoryStore, FixedClock> {
        let today = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        StreakPresenter::new(StreakTracker::new(
            store,
            FixedClock::on(today),
            StreakRules::default(),
        ))
    }

    #[test]
    fn refresh_passes_state_through() {
        let store = MemoryStore::new();
        let vm = presenter(&store).refresh();
        assert!(vm.persisted);
        assert_eq!(vm.state.current_streak, 0);
        assert!(vm.status.is_at_risk);
        assert_eq!(vm.progress.percentage, 0);
        assert_eq!(vm.next_milestone.map(|n| n.milestone), Some(1));
    }

    #[test]
    fn refresh_survives_write_failure() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let vm = presenter(&store).refresh();
        assert!(!vm.persisted);
        assert!(vm.state.week_start_date.is_some());
        assert!(matches!(vm.events[0], StreakEvent::TrackingStarted { .. }));
    }

    #[test]
    fn view_model_serializes_camel_case() {
        let store = MemoryStore::new();
        let json = serde_json::to_value(presenter(&store).refresh()).unwrap();
        assert!(json.get("nextMilestone").is_some());
        assert!(json["status"].get("daysLeftInWeek").is_some());
    }
}
