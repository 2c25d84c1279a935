#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;

use herald_shared::{Attachment, Message};
use herald_store::{Database, MigrationObserver};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

/// Fixed clock used by tests that pass `now` explicitly.
pub const NOW: i64 = 1_700_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("herald_store=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn memory_db() -> Database {
    init_tracing();
    Database::open_in_memory().expect("memory db")
}

pub fn message(id: &str, topic: &str, time: i64) -> Message {
    Message::new(topic, format!("body of {id}"))
        .with_id(id)
        .scheduled_at(time)
}

pub fn attachment(owner: &str, size: u64, expires: i64) -> Attachment {
    Attachment {
        name: "photo.jpg".into(),
        mime_type: "image/jpeg".into(),
        size,
        expires,
        url: "https://files.example.com/photo.jpg".into(),
        owner: owner.into(),
    }
}

pub fn ids(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

pub fn message_columns(conn: &Connection) -> BTreeSet<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(messages);").expect("pragma");
    let mut rows = stmt.query([]).expect("rows");
    let mut names = BTreeSet::new();
    while let Some(row) = rows.next().expect("row") {
        names.insert(row.get::<_, String>(1).expect("name"));
    }
    names
}

pub fn index_exists(conn: &Connection, name: &str) -> bool {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(1) FROM sqlite_master WHERE type='index' AND name=?1;",
            [name],
            |row| row.get(0),
        )
        .expect("index query");
    count == 1
}

/// Observer that remembers every event it receives.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<String>>,
}

impl MigrationObserver for RecordingObserver {
    fn created_fresh(&self, version: u32) {
        self.events.borrow_mut().push(format!("fresh {version}"));
    }

    fn step_started(&self, from: u32, to: u32, _name: &str) {
        self.events.borrow_mut().push(format!("start {from}->{to}"));
    }

    fn step_finished(&self, from: u32, to: u32) {
        self.events.borrow_mut().push(format!("done {from}->{to}"));
    }

    fn up_to_date(&self, version: u32) {
        self.events.borrow_mut().push(format!("current {version}"));
    }
}

// Column layout of released schema versions: (introduced in, name, type, legacy value).
const LEGACY_COLUMNS: &[(u32, &str, &str, &str)] = &[
    (0, "id", "TEXT PRIMARY KEY", "'legacy1'"),
    (0, "time", "INT NOT NULL", "1000"),
    (0, "topic", "TEXT NOT NULL", "'legacy'"),
    (0, "message", "TEXT NOT NULL", "'old message'"),
    (1, "title", "TEXT NOT NULL", "'Old title'"),
    (1, "priority", "INT NOT NULL", "4"),
    (1, "tags", "TEXT NOT NULL", "'tag1,tag2'"),
    (2, "published", "INT NOT NULL", "1"),
    (3, "click", "TEXT NOT NULL", "'https://example.com'"),
    (3, "attachment_name", "TEXT NOT NULL", "'file.txt'"),
    (3, "attachment_type", "TEXT NOT NULL", "'text/plain'"),
    (3, "attachment_size", "INT NOT NULL", "100"),
    (3, "attachment_expires", "INT NOT NULL", "0"),
    (3, "attachment_url", "TEXT NOT NULL", "'https://example.com/file.txt'"),
    (3, "attachment_owner", "TEXT NOT NULL", "'A'"),
    (4, "encoding", "TEXT NOT NULL", "'base64'"),
];

/// Write a cache file laid out exactly as release `version` left it, holding
/// one message with id `legacy1` on topic `legacy`.
pub fn write_legacy_store(path: &Path, version: u32) {
    let conn = Connection::open(path).expect("open legacy");
    let cols: Vec<_> = LEGACY_COLUMNS.iter().filter(|c| c.0 <= version).collect();

    let defs: Vec<String> = cols.iter().map(|c| format!("{} {}", c.1, c.2)).collect();
    let names: Vec<&str> = cols.iter().map(|c| c.1).collect();
    let values: Vec<&str> = cols.iter().map(|c| c.3).collect();

    conn.execute_batch(&format!(
        "CREATE TABLE messages ({});
         CREATE INDEX idx_topic ON messages (topic);
         INSERT INTO messages ({}) VALUES ({});",
        defs.join(", "),
        names.join(", "),
        values.join(", "),
    ))
    .expect("legacy schema");

    if version >= 1 {
        write_version_record(&conn, Some(version as i64));
    }
}

/// Create the version table, optionally with its row.
pub fn write_version_record(conn: &Connection, version: Option<i64>) {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schemaVersion (id INT PRIMARY KEY, version INT NOT NULL);")
        .expect("version table");
    if let Some(v) = version {
        conn.execute("INSERT OR REPLACE INTO schemaVersion VALUES (1, ?1)", [v])
            .expect("version row");
    }
}
