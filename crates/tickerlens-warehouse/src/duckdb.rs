//! `DuckDB` connection acquisition.
//!
//! The database file is opened lazily and kept as a root handle. Every
//! operation takes its own connection cloned from that handle and drops it
//! when the operation returns; connections are never handed out twice.
//!
//! The root handle itself is never closed. It lives as long as the source
//! (for the server, the whole process), so the database file stays open
//! between requests; only the per-operation connections are released.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ::duckdb::Connection;

use crate::migrations;
use crate::StoreError;

struct SourceInner {
    db_path: PathBuf,
    database: Mutex<Option<Connection>>,
}

/// Hands out one fresh `DuckDB` connection per store operation.
#[derive(Clone)]
pub struct DuckDbConnectionSource {
    inner: Arc<SourceInner>,
}

impl DuckDbConnectionSource {
    /// Create a connection source for the given database file.
    ///
    /// Nothing is opened until the first [`acquire`](Self::acquire).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(SourceInner {
                db_path: path.into(),
                database: Mutex::new(None),
            }),
        }
    }

    /// Acquire a new connection.
    ///
    /// The first call opens the database file, creating parent directories
    /// and applying migrations. If that fails the next call tries again.
    ///
    /// # Errors
    /// Returns [`StoreError::Connection`] if the database cannot be opened,
    /// migrated, or connected to.
    pub fn acquire(&self) -> Result<Connection, StoreError> {
        let mut database = self
            .inner
            .database
            .lock()
            .map_err(|_| StoreError::Connection(String::from("connection source lock poisoned")))?;

        if database.is_none() {
            let opened = open_database(self.inner.db_path.as_path())?;
            *database = Some(opened);
        }

        match database.as_ref() {
            Some(root) => root
                .try_clone()
                .map_err(|error| StoreError::Connection(error.to_string())),
            None => Err(StoreError::Connection(String::from(
                "history database is not open",
            ))),
        }
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.inner.db_path.as_path()
    }
}

/// Open the database file and bring its schema up to date.
fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|error| StoreError::Connection(error.to_string()))?;
        }
    }

    let connection =
        Connection::open(path).map_err(|error| StoreError::Connection(error.to_string()))?;
    configure_connection(&connection)?;
    tracing::info!(path = %path.display(), "opened history database");
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<(), StoreError> {
    connection
        .execute_batch("PRAGMA disable_progress_bar;")
        .map_err(|error| StoreError::Connection(error.to_string()))?;
    migrations::apply_migrations(connection)
        .map_err(|error| StoreError::Connection(format!("migration failed: {error}")))
}
