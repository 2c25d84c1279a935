//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! the schema is at [`CURRENT_VERSION`] before any other operation.  One
//! handle is one connection; SQLite serializes writers, so callers sharing a
//! handle across threads wrap it in their own lock.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::migrations::{self, MigrationObserver, TracingObserver, CURRENT_VERSION};

/// Wrapper around a [`rusqlite::Connection`] holding the message cache.
pub struct Database {
    conn: Connection,
    version: u32,
}

impl Database {
    /// Open (or create) the cache described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = config.cache_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!(path = %config.cache_file.display(), "opening message cache");

        let conn = Connection::open(&config.cache_file)?;
        conn.busy_timeout(config.busy_timeout)?;
        if config.wal {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            if !mode.eq_ignore_ascii_case("wal") {
                tracing::warn!(journal_mode = %mode, "WAL journal mode not available");
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
        }

        Self::open_with_observer(conn, &TracingObserver)
    }

    /// Open (or create) a cache file at an explicit path with default
    /// settings.
    pub fn open_at(path: &Path) -> Result<Self> {
        Self::open(&StoreConfig::at(path))
    }

    /// Fresh in-memory cache, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_observer(Connection::open_in_memory()?, &TracingObserver)
    }

    /// Take over an already-open connection, migrating it to the current
    /// schema and reporting progress to `observer`.
    pub fn open_with_observer(mut conn: Connection, observer: &dyn MigrationObserver) -> Result<Self> {
        let version = migrations::ensure_current_schema(&mut conn, observer)?;
        debug_assert_eq!(version, CURRENT_VERSION);
        Ok(Self { conn, version })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Schema version the store was migrated to when it was opened.
    pub fn schema_version(&self) -> u32 {
        self.version
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Close the connection, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}
