use clap::Subcommand;
use birthlog_core::error::Result;
use birthlog_core::{Config, Database, StreakPresenter};
use log::warn;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Reconcile and print the full streak view
    Show,
    /// Reconcile and print only what changed
    Check,
    /// Set the number of logs needed each week
    Goal {
        /// Logs per week (at least 1)
        goal: u32,
    },
    /// Give up the active recovery challenge
    CancelRecovery,
}

pub fn run(action: StreakAction, ctx: &Context) -> Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let tracker = ctx.tracker(&db, &config);

    match action {
        StreakAction::Show => {
            let view = StreakPresenter::new(tracker).refresh();
            if !view.persisted {
                warn!("[cli] streak state could not be saved; showing unsaved state");
            }
            print_json(&view)?;
        }
        StreakAction::Check => {
            let result = tracker.check_and_update_streak_status()?;
            print_json(&result.events)?;
        }
        StreakAction::Goal { goal } => {
            let state = tracker.set_weekly_goal(goal)?;
            print_json(&state)?;
        }
        StreakAction::CancelRecovery => {
            let state = tracker.cancel_recovery_challenge()?;
            print_json(&state)?;
        }
    }
    Ok(())
}
