//! SQLite-backed store for active timer/alarm rows.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tempo_core::{
    config::{shellexpand, MemoryConfig},
    error::TempoError,
};
use tracing::{info, warn};

/// What kind of scheduled entry a row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Timer,
    Alarm,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Timer => "timer",
            EntryKind::Alarm => "alarm",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "timer" => Some(EntryKind::Timer),
            "alarm" => Some(EntryKind::Alarm),
            _ => None,
        }
    }
}

/// A flat projection of a scheduled entry, for crash recovery and
/// cross-restart listing.
#[derive(Debug, Clone)]
pub struct PersistedEntry {
    pub id: i64,
    pub kind: EntryKind,
    pub name: String,
    pub output_topic: String,
    pub scheduled_time: DateTime<Utc>,
}

/// Persistent entry store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a new store, running migrations on first use.
    pub async fn new(config: &MemoryConfig) -> Result<Self, TempoError> {
        let db_path = shellexpand(&config.db_path);

        // Ensure parent directory exists.
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TempoError::Persistence(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| TempoError::Persistence(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .map_err(|e| TempoError::Persistence(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Entry store initialized at {db_path}");

        Ok(Self { pool })
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), TempoError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| TempoError::Persistence(format!("failed to create migrations table: {e}")))?;

        Self::apply_migration(
            pool,
            "001_active_entries",
            "CREATE TABLE IF NOT EXISTS active_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                output_topic TEXT NOT NULL,
                scheduled_time TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_active_entries_scheduled
                ON active_entries(scheduled_time);",
        )
        .await?;

        Ok(())
    }

    async fn apply_migration(pool: &SqlitePool, name: &str, sql: &str) -> Result<(), TempoError> {
        let applied: Option<(String,)> =
            sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                .bind(name)
                .fetch_optional(pool)
                .await
                .map_err(|e| TempoError::Persistence(format!("migration check failed: {e}")))?;

        if applied.is_some() {
            return Ok(());
        }

        sqlx::raw_sql(sql)
            .execute(pool)
            .await
            .map_err(|e| TempoError::Persistence(format!("migration {name} failed: {e}")))?;

        sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .map_err(|e| TempoError::Persistence(format!("migration record failed: {e}")))?;

        Ok(())
    }

    /// Record a scheduled entry. Returns the row id.
    pub async fn insert_entry(
        &self,
        kind: EntryKind,
        name: &str,
        output_topic: &str,
        scheduled_time: DateTime<Utc>,
    ) -> Result<i64, TempoError> {
        let result = sqlx::query(
            "INSERT INTO active_entries (kind, name, output_topic, scheduled_time) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(kind.as_str())
        .bind(name)
        .bind(output_topic)
        .bind(scheduled_time.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| TempoError::Persistence(format!("insert entry failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// All entries whose scheduled time is still in the future, ascending.
    pub async fn future_entries(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PersistedEntry>, TempoError> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, kind, name, output_topic, scheduled_time \
             FROM active_entries \
             WHERE datetime(scheduled_time) > datetime(?) \
             ORDER BY datetime(scheduled_time) ASC",
        )
        .bind(now.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TempoError::Persistence(format!("future entries query failed: {e}")))?;

        let mut entries = Vec::with_capacity(rows.len());
        for (id, kind, name, output_topic, scheduled_time) in rows {
            let Some(kind) = EntryKind::parse(&kind) else {
                warn!("skipping entry {id} with unknown kind '{kind}'");
                continue;
            };
            let scheduled_time = match DateTime::parse_from_rfc3339(&scheduled_time) {
                Ok(t) => t.with_timezone(&Utc),
                Err(e) => {
                    warn!("skipping entry {id} with bad scheduled_time: {e}");
                    continue;
                }
            };
            entries.push(PersistedEntry {
                id,
                kind,
                name,
                output_topic,
                scheduled_time,
            });
        }

        Ok(entries)
    }

    /// Retire the rows for an entry that fired or was cancelled.
    /// Returns how many rows were removed (absent entries are a no-op).
    pub async fn remove_entry(&self, kind: EntryKind, name: &str) -> Result<u64, TempoError> {
        let result = sqlx::query("DELETE FROM active_entries WHERE kind = ? AND name = ?")
            .bind(kind.as_str())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| TempoError::Persistence(format!("remove entry failed: {e}")))?;

        Ok(result.rows_affected())
    }
}
