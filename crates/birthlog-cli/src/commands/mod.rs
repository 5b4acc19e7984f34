pub mod births;
pub mod config;
pub mod data;
pub mod stats;
pub mod streak;

use birthlog_core::{Clock, Config, Database, FixedClock, StreakTracker, SystemClock};
use chrono::NaiveDate;

/// Per-invocation settings shared by the commands.
pub struct Context {
    clock: FixedClock,
}

impl Context {
    /// Pin the clock for the whole invocation, to `today` if given.
    pub fn new(today: Option<NaiveDate>) -> Self {
        let clock = match today {
            Some(date) => FixedClock::on(date),
            None => FixedClock(SystemClock.now()),
        };
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn tracker<'a>(&self, db: &'a Database, config: &Config) -> StreakTracker<&'a Database, FixedClock> {
        StreakTracker::new(db, self.clock, config.streak.clone())
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> birthlog_core::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
