use birthlog_core::error::Result;
use birthlog_core::{Config, Database};
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a birth and count it toward the weekly streak
    Add {
        /// Date of the birth (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// List recorded births, newest first
    List {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub fn run(action: LogAction, ctx: &Context) -> Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        LogAction::Add { date, note } => {
            let born_on = date.unwrap_or_else(|| ctx.today());

            // The birth row and the streak record commit together: a rejected
            // date or a failed streak write leaves neither behind.
            let (id, logged) = db.atomically(|db| -> Result<_> {
                let id = db.record_birth(born_on, note.as_deref())?;
                let logged = ctx.tracker(db, &config).record_log(born_on)?;
                Ok((id, logged))
            })?;

            print_json(&json!({
                "id": id,
                "bornOn": born_on,
                "currentStreak": logged.state.current_streak,
                "currentWeekLogs": logged.state.current_week_logs,
                "weeklyGoal": logged.state.weekly_goal,
                "events": logged.events,
            }))?;
        }
        LogAction::List { limit } => {
            let births = db.list_births(limit)?;
            print_json(&births)?;
        }
    }
    Ok(())
}
