use birthlog_core::error::Result;
use birthlog_core::{Config, Database};
use serde_json::json;

use super::{print_json, Context};

pub fn run(weeks: Option<u32>, ctx: &Context) -> Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let weeks = weeks.unwrap_or(config.stats.weeks_shown) as usize;

    let stats = db.stats(ctx.today(), config.streak.week_starts_on, weeks)?;
    let streak = ctx.tracker(&db, &config).load();

    print_json(&json!({
        "births": stats,
        "currentStreak": streak.current_streak,
        "longestStreak": streak.longest_streak,
    }))
}
