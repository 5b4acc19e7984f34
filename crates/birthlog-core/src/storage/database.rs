//! SQLite-based birth log storage.
//!
//! Provides persistent storage for:
//! - Logged birth events
//! - Birth statistics (all-time and per week)
//! - Key-value store for application state (the streak record lives here)

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use log::info;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::kv::KeyValueStore;
use super::migrations;
use crate::calendar;
use crate::error::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub id: i64,
    pub born_on: NaiveDate,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCount {
    pub week_start: NaiveDate,
    pub births: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BirthStats {
    pub total_births: u64,
    pub this_week: u64,
    pub last_born_on: Option<NaiveDate>,
    /// Most recent week first.
    pub weekly: Vec<WeekCount>,
}

/// What a data reset removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DataResetSummary {
    pub births_deleted: usize,
    pub kv_entries_deleted: usize,
}

/// SQLite database for the birth log and application state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/birthlog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("birthlog.db"))
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Record a birth on `born_on`.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_birth(&self, born_on: NaiveDate, note: Option<&str>) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO births (born_on, note, recorded_at) VALUES (?1, ?2, ?3)",
            params![
                born_on.format(DATE_FORMAT).to_string(),
                note,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("[storage] birth recorded id={} born_on={}", id, born_on);
        Ok(id)
    }

    /// Most recent births first, by date and then insertion order.
    pub fn list_births(&self, limit: usize) -> Result<Vec<BirthRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, born_on, note, recorded_at
             FROM births
             ORDER BY born_on DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(BirthRecord {
                id: row.get(0)?,
                born_on: parse_date(row.get::<_, String>(1)?, 1)?,
                note: row.get(2)?,
                recorded_at: parse_timestamp(row.get::<_, String>(3)?, 3)?,
            })
        })?;

        let mut births = Vec::new();
        for row in rows {
            births.push(row?);
        }
        Ok(births)
    }

    /// Births dated within `from..=to`.
    pub fn count_births_between(&self, from: NaiveDate, to: NaiveDate) -> Result<u64, StorageError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM births WHERE born_on >= ?1 AND born_on <= ?2",
            params![
                from.format(DATE_FORMAT).to_string(),
                to.format(DATE_FORMAT).to_string()
            ],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }

    /// Totals plus per-week counts for the `weeks` most recent weeks.
    pub fn stats(
        &self,
        today: NaiveDate,
        week_starts_on: Weekday,
        weeks: usize,
    ) -> Result<BirthStats, StorageError> {
        let total_births = self
            .conn
            .query_row("SELECT COUNT(*) FROM births", [], |row| row.get::<_, u64>(0))?;

        let last_born_on = self
            .conn
            .query_row("SELECT MAX(born_on) FROM births", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten()
            .map(|s| parse_date(s, 0))
            .transpose()?;

        let current_week = calendar::week_start(today, week_starts_on);
        let mut weekly = Vec::with_capacity(weeks);
        for index in 0..weeks {
            let week_start = current_week - Duration::days(index as i64 * calendar::DAYS_PER_WEEK);
            let week_end = week_start + Duration::days(calendar::DAYS_PER_WEEK - 1);
            weekly.push(WeekCount {
                week_start,
                births: self.count_births_between(week_start, week_end)?,
            });
        }

        let this_week = match weekly.first() {
            Some(week) => week.births,
            None => self.count_births_between(
                current_week,
                current_week + Duration::days(calendar::DAYS_PER_WEEK - 1),
            )?,
        };

        Ok(BirthStats {
            total_births,
            this_week,
            last_born_on,
            weekly,
        })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Run `f` inside one transaction. Every write `f` makes through this
    /// database, kv entries included, is committed together or rolled back
    /// when `f` returns an error.
    ///
    /// # Errors
    /// Returns the error from `f`, or a storage error if the transaction
    /// cannot be started or committed.
    pub fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StorageError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        let tx = self.conn.unchecked_transaction().map_err(StorageError::from)?;
        let value = f(self)?;
        tx.commit().map_err(StorageError::from)?;
        Ok(value)
    }

    /// Remove every birth and every kv entry, streak state included.
    ///
    /// # Errors
    /// Returns an error if the deletion fails; nothing is removed in that case.
    pub fn reset_all(&self) -> Result<DataResetSummary, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let births_deleted = tx.execute("DELETE FROM births", [])?;
        let kv_entries_deleted = tx.execute("DELETE FROM kv", [])?;
        tx.commit()?;

        info!(
            "[storage] data reset births_deleted={} kv_entries_deleted={}",
            births_deleted, kv_entries_deleted
        );
        Ok(DataResetSummary {
            births_deleted,
            kv_entries_deleted,
        })
    }
}

impl KeyValueStore for Database {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }
}

fn parse_date(value: String, column: usize) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_timestamp(value: String, column: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
