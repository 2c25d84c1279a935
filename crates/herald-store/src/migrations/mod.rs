//! Schema version detection and migration runner.
//!
//! The schema version lives in the one-row `schemaVersion` table.  A store
//! without a `messages` table is new and is created directly at
//! [`CURRENT_VERSION`].  Otherwise every step from the stored version up to
//! [`CURRENT_VERSION`] in [`MIGRATIONS`] runs in order, each one in its own
//! transaction together with the version bump, so an interrupted upgrade
//! resumes from the last committed version on the next open.

mod fresh;
pub mod v001_title_priority_tags;
pub mod v002_published;
pub mod v003_click_attachments;
pub mod v004_encoding;
pub mod v005_attachment_present;

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::{Result, StoreError};

/// Current schema version.  Bump this, add a step to [`MIGRATIONS`] and
/// update the fresh layout whenever the schema changes.
pub const CURRENT_VERSION: u32 = 5;

/// One upgrade step, from `from` to `from + 1`.
pub struct Migration {
    pub from: u32,
    pub name: &'static str,
    pub up: fn(&Transaction<'_>) -> std::result::Result<(), rusqlite::Error>,
}

impl Migration {
    pub fn to(&self) -> u32 {
        self.from + 1
    }
}

/// Every upgrade step, keyed by the version it upgrades from.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        from: 0,
        name: "v001_title_priority_tags",
        up: v001_title_priority_tags::up,
    },
    Migration {
        from: 1,
        name: "v002_published",
        up: v002_published::up,
    },
    Migration {
        from: 2,
        name: "v003_click_attachments",
        up: v003_click_attachments::up,
    },
    Migration {
        from: 3,
        name: "v004_encoding",
        up: v004_encoding::up,
    },
    Migration {
        from: 4,
        name: "v005_attachment_present",
        up: v005_attachment_present::up,
    },
];

/// Receives progress while the schema is brought up to date.
pub trait MigrationObserver {
    fn created_fresh(&self, _version: u32) {}
    fn step_started(&self, _from: u32, _to: u32, _name: &str) {}
    fn step_finished(&self, _from: u32, _to: u32) {}
    fn up_to_date(&self, _version: u32) {}
}

/// Reports migration progress as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MigrationObserver for TracingObserver {
    fn created_fresh(&self, version: u32) {
        tracing::info!(version, "created new message cache");
    }

    fn step_started(&self, from: u32, to: u32, name: &str) {
        tracing::info!(from, to, migration = name, "migrating message cache schema");
    }

    fn step_finished(&self, from: u32, to: u32) {
        tracing::debug!(from, to, "migration step committed");
    }

    fn up_to_date(&self, version: u32) {
        tracing::debug!(version, "message cache schema is current");
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl MigrationObserver for SilentObserver {}

const CREATE_VERSION_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schemaVersion (
    id      INT PRIMARY KEY,
    version INT NOT NULL
);
"#;

fn table_exists(conn: &Connection, name: &str) -> std::result::Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Read the stored schema version.
///
/// Returns `None` for a new store (no `messages` table).  A store that has
/// messages but predates the version record is version 0; a version record
/// without a row is corrupt.
pub fn stored_version(conn: &Connection) -> Result<Option<u32>> {
    if !table_exists(conn, "messages")? {
        return Ok(None);
    }
    if !table_exists(conn, "schemaVersion")? {
        return Ok(Some(0));
    }
    let version: Option<i64> = conn
        .query_row(
            "SELECT version FROM schemaVersion WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| match e {
            rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..) => {
                StoreError::CorruptStore
            }
            other => StoreError::Sqlite(other),
        })?;
    let version = version.ok_or(StoreError::CorruptStore)?;
    u32::try_from(version)
        .map(Some)
        .map_err(|_| StoreError::CorruptStore)
}

fn record_version(tx: &Transaction<'_>, version: u32) -> std::result::Result<(), rusqlite::Error> {
    tx.execute_batch(CREATE_VERSION_TABLE_SQL)?;
    tx.execute(
        "INSERT INTO schemaVersion (id, version) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET version = excluded.version",
        params![version],
    )?;
    Ok(())
}

fn create_fresh(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    fresh::create(&tx)?;
    record_version(&tx, CURRENT_VERSION)?;
    tx.commit()
}

fn apply_step(conn: &mut Connection, step: &Migration) -> Result<()> {
    let (from, to) = (step.from, step.to());
    let fail = |source: rusqlite::Error| StoreError::Migration { from, to, source };
    let tx = conn.transaction().map_err(fail)?;
    (step.up)(&tx).map_err(fail)?;
    record_version(&tx, to).map_err(fail)?;
    tx.commit().map_err(fail)
}

/// Bring the schema behind `conn` to [`CURRENT_VERSION`].
///
/// Idempotent; returns the resulting version.  Must finish before any other
/// store call is made on the same file.
pub fn ensure_current_schema(
    conn: &mut Connection,
    observer: &dyn MigrationObserver,
) -> Result<u32> {
    let Some(mut version) = stored_version(conn)? else {
        create_fresh(conn)?;
        observer.created_fresh(CURRENT_VERSION);
        return Ok(CURRENT_VERSION);
    };

    if version > CURRENT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            current: CURRENT_VERSION,
        });
    }

    while version < CURRENT_VERSION {
        let step = MIGRATIONS
            .iter()
            .find(|m| m.from == version)
            .ok_or(StoreError::MissingMigration(version))?;
        observer.step_started(step.from, step.to(), step.name);
        apply_step(conn, step)?;
        observer.step_finished(step.from, step.to());
        version = step.to();
    }

    observer.up_to_date(version);
    Ok(version)
}
