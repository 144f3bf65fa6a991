//! # Tickerlens Warehouse
//!
//! DuckDB-based ledger of which user looked up which symbol.
//!
//! ## Overview
//!
//! The ledger is append-only from the application's point of view. Records
//! are written once per successful lookup and read back per user; the only
//! removal path is the administrative [`HistoryLedger::purge`].
//!
//! Every operation takes its own connection from a
//! [`DuckDbConnectionSource`] and releases it before returning, whether the
//! operation succeeded or not.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickerlens_warehouse::{HistoryLedger, LedgerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = HistoryLedger::new(LedgerConfig::default());
//!     ledger.append("u1", "IBM")?;
//!
//!     for record in ledger.list_by_user("u1")? {
//!         println!("{} looked up {}", record.user_id, record.symbol);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `query_history` | One row per recorded lookup (`user_id`, `symbol`, `recorded_at`) |
//! | `schema_migrations` | Applied migration versions |

pub mod duckdb;
pub mod migrations;

use std::env;
use std::path::{Path, PathBuf};

use ::duckdb::ToSql;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use duckdb::DuckDbConnectionSource;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or connected to.
    #[error("history store connection failed: {0}")]
    Connection(String),

    /// A statement was rejected by the database.
    #[error("history store query failed: {0}")]
    Query(#[from] ::duckdb::Error),
}

/// Configuration for the history ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::with_db_path(resolve_tickerlens_home().join("history.duckdb"))
    }
}

impl LedgerConfig {
    /// Configuration pointing at an explicit database file.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// One recorded lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub user_id: String,
    pub symbol: String,
}

impl HistoryRecord {
    pub fn new(user_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            symbol: symbol.into(),
        }
    }
}

/// Append-only store of user lookups.
#[derive(Clone)]
pub struct HistoryLedger {
    source: DuckDbConnectionSource,
}

impl HistoryLedger {
    /// Build a ledger. The database file is opened on first use.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            source: DuckDbConnectionSource::new(config.db_path),
        }
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.source.db_path()
    }

    /// Record that `user_id` looked up `symbol`.
    ///
    /// # Security
    /// Values are bound as query parameters, never interpolated.
    pub fn append(&self, user_id: &str, symbol: &str) -> Result<(), StoreError> {
        let connection = self.source.acquire()?;
        let params: [&dyn ToSql; 2] = [&user_id, &symbol];
        connection.execute(
            "INSERT INTO query_history (user_id, symbol) VALUES (?, ?)",
            params.as_slice(),
        )?;
        tracing::debug!(user_id, symbol, "recorded lookup");
        Ok(())
    }

    /// All records for `user_id`, in the order the database returns them.
    pub fn list_by_user(&self, user_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        let connection = self.source.acquire()?;
        let mut statement =
            connection.prepare("SELECT user_id, symbol FROM query_history WHERE user_id = ?")?;
        let rows = statement.query_map([user_id], |row| {
            Ok(HistoryRecord {
                user_id: row.get(0)?,
                symbol: row.get(1)?,
            })
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete every record. Returns the number of rows removed.
    ///
    /// Administrative only; nothing on the request path calls this.
    pub fn purge(&self) -> Result<usize, StoreError> {
        let connection = self.source.acquire()?;
        let removed = connection.execute("DELETE FROM query_history", [])?;
        tracing::info!(removed, "purged query history");
        Ok(removed)
    }
}

/// Resolve the tickerlens home directory from environment or default.
fn resolve_tickerlens_home() -> PathBuf {
    if let Some(path) = env::var_os("TICKERLENS_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tickerlens");
    }

    PathBuf::from(".tickerlens")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ledger_in(dir: &Path) -> HistoryLedger {
        HistoryLedger::new(LedgerConfig::with_db_path(
            dir.join("store").join("history.duckdb"),
        ))
    }

    #[test]
    fn append_then_list_returns_record() {
        let temp = tempdir().expect("tempdir");
        let ledger = ledger_in(temp.path());

        ledger.append("u1", "IBM").expect("append");
        let records = ledger.list_by_user("u1").expect("list");

        assert_eq!(records, vec![HistoryRecord::new("u1", "IBM")]);
        assert!(ledger.db_path().exists(), "database file should be created");
    }

    #[test]
    fn list_only_returns_requested_user() {
        let temp = tempdir().expect("tempdir");
        let ledger = ledger_in(temp.path());

        ledger.append("u1", "IBM").expect("append");
        ledger.append("u2", "AAPL").expect("append");
        ledger.append("u1", "MSFT").expect("append");

        let records = ledger.list_by_user("u1").expect("list");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.user_id == "u1"));
        assert!(ledger.list_by_user("nobody").expect("list").is_empty());
    }

    #[test]
    fn values_are_bound_as_parameters() {
        let temp = tempdir().expect("tempdir");
        let ledger = ledger_in(temp.path());
        let hostile_user = r#"u1'; DROP TABLE query_history; --"#;

        ledger.append(hostile_user, "IBM").expect("append");
        let records = ledger.list_by_user(hostile_user).expect("list");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, hostile_user);
    }

    #[test]
    fn purge_removes_every_record() {
        let temp = tempdir().expect("tempdir");
        let ledger = ledger_in(temp.path());

        ledger.append("u1", "IBM").expect("append");
        ledger.append("u2", "AAPL").expect("append");

        assert_eq!(ledger.purge().expect("purge"), 2);
        assert!(ledger.list_by_user("u1").expect("list").is_empty());
    }

    #[test]
    fn unreachable_database_reports_connection_error() {
        let temp = tempdir().expect("tempdir");
        let blocker = temp.path().join("not-a-directory");
        std::fs::write(&blocker, b"file").expect("write blocker");

        let ledger = HistoryLedger::new(LedgerConfig::with_db_path(blocker.join("history.duckdb")));

        let error = ledger.append("u1", "IBM").expect_err("append must fail");
        assert!(matches!(error, StoreError::Connection(_)));
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let json = serde_json::to_string(&HistoryRecord::new("u1", "IBM")).expect("serialize");
        assert_eq!(json, r#"{"userId":"u1","symbol":"IBM"}"#);
    }
}
