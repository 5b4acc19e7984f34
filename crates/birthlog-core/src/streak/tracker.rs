//! Streak state store and the operations the UI calls.
//!
//! Each operation is one read-modify-write cycle: load the record, compute
//! the new state with the pure evaluator, write it back. A failed write
//! leaves the stored record as it was and hands the computed state back
//! inside [`StreakError::PersistFailed`].

use chrono::NaiveDate;
use log::{info, warn};

use super::evaluator::{self, Reconciliation};
use super::projector::{self, StreakStatus};
use super::state::{StreakRules, StreakState};
use crate::calendar::{Clock, SystemClock};
use crate::error::{StorageError, StreakError};
use crate::events::StreakEvent;
use crate::storage::KeyValueStore;

/// Key of the streak record in the key-value store.
pub const STREAK_STATE_KEY: &str = "streak_state";

pub struct StreakTracker<S, C = SystemClock> {
    store: S,
    clock: C,
    rules: StreakRules,
}

impl<S: KeyValueStore> StreakTracker<S> {
    /// Tracker on the system clock.
    pub fn with_system_clock(store: S, rules: StreakRules) -> Self {
        Self::new(store, SystemClock, rules)
    }
}

impl<S: KeyValueStore, C: Clock> StreakTracker<S, C> {
    pub fn new(store: S, clock: C, rules: StreakRules) -> Self {
        Self { store, clock, rules }
    }

    pub fn rules(&self) -> &StreakRules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Load the persisted record.
    ///
    /// Never fails: an unreadable store, a missing record, or a malformed
    /// record all yield the default zero state.
    pub fn load(&self) -> StreakState {
        let record = match self.store.load(STREAK_STATE_KEY) {
            Ok(Some(record)) => record,
            Ok(None) => return self.rules.initial_state(),
            Err(e) => {
                warn!("[streak] failed to read streak state, using default: {}", e);
                return self.rules.initial_state();
            }
        };

        match StreakState::from_record(&record) {
            Ok(state) => state,
            Err(reason) => {
                warn!("[streak] malformed streak state replaced with default: {}", reason);
                self.rules.initial_state()
            }
        }
    }

    fn persist(&self, state: StreakState, events: Vec<StreakEvent>) -> Result<StreakState, StreakError> {
        let written = state
            .to_record()
            .map_err(|e| StorageError::WriteRejected(e.to_string()))
            .and_then(|record| self.store.save(STREAK_STATE_KEY, &record));

        match written {
            Ok(()) => Ok(state),
            Err(source) => {
                warn!("[streak] failed to persist streak state: {}", source);
                Err(StreakError::PersistFailed {
                    attempted: Box::new(state),
                    events,
                    source,
                })
            }
        }
    }

    fn persist_reconciliation(&self, result: Reconciliation) -> Result<Reconciliation, StreakError> {
        let Reconciliation { state, events } = result;
        let state = self.persist(state, events.clone())?;
        Ok(Reconciliation { state, events })
    }

    /// Reconcile the stored state with today's date and persist the result.
    ///
    /// # Errors
    /// `StreakError::PersistFailed` if the write fails; it carries the
    /// reconciled state and its events.
    pub fn check_and_update_streak_status(&self) -> Result<Reconciliation, StreakError> {
        let today = self.today();
        let result = evaluator::check_and_update_streak_status(&self.load(), today, &self.rules);
        self.persist_reconciliation(result)
    }

    /// Count a log made on `logged_on` and persist the result.
    ///
    /// # Errors
    /// `StreakError::Rejected` for a date after today, with the stored state
    /// unchanged; `StreakError::PersistFailed` if the write fails.
    pub fn record_log(&self, logged_on: NaiveDate) -> Result<Reconciliation, StreakError> {
        let current = self.load();
        match evaluator::apply_log(&current, logged_on, self.today(), &self.rules) {
            Ok(result) => self.persist_reconciliation(result),
            Err(reason) => Err(StreakError::Rejected {
                reason,
                current: Box::new(current),
            }),
        }
    }

    /// Change the weekly goal. Past weeks are not re-evaluated.
    ///
    /// # Errors
    /// `StreakError::InvalidGoal` for a goal of 0, carrying the unchanged
    /// state; `StreakError::PersistFailed` if the write fails.
    pub fn set_weekly_goal(&self, goal: u32) -> Result<StreakState, StreakError> {
        let mut state = self.load();
        if goal < 1 {
            return Err(StreakError::InvalidGoal {
                goal,
                current: Box::new(state),
            });
        }

        let from = state.weekly_goal;
        state.weekly_goal = goal;
        info!("[streak] weekly goal changed from={} to={}", from, goal);
        self.persist(state, vec![StreakEvent::WeeklyGoalChanged { from, to: goal }])
    }

    /// Abandon the active recovery challenge without restoring the streak.
    /// Without an active challenge the state is returned (and re-saved) as is.
    ///
    /// # Errors
    /// `StreakError::PersistFailed` if the write fails.
    pub fn cancel_recovery_challenge(&self) -> Result<StreakState, StreakError> {
        let mut state = self.load();
        let mut events = Vec::new();
        if let Some(challenge) = state.recovery_challenge.take() {
            info!(
                "[streak] recovery cancelled previous_streak={}",
                challenge.previous_streak
            );
            events.push(StreakEvent::RecoveryCancelled {
                previous_streak: challenge.previous_streak,
            });
        }
        self.persist(state, events)
    }

    /// Status of `state` as of today under this tracker's rules.
    pub fn status_of(&self, state: &StreakState) -> StreakStatus {
        projector::get_streak_status(state, self.today(), &self.rules)
    }
}
