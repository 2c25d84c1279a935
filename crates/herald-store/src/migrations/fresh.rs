//! Layout of a store created from scratch at [`CURRENT_VERSION`].
//!
//! Must stay equivalent to the result of walking the whole migration chain
//! from version 0.
//!
//! [`CURRENT_VERSION`]: super::CURRENT_VERSION

use rusqlite::Transaction;

const CREATE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id                 TEXT PRIMARY KEY,
    time               INT NOT NULL,      -- unix seconds; delivery time if scheduled
    topic              TEXT NOT NULL,
    message            TEXT NOT NULL,
    title              TEXT NOT NULL,
    priority           INT NOT NULL,
    tags               TEXT NOT NULL,     -- comma-joined
    click              TEXT NOT NULL,
    attachment_name    TEXT NOT NULL,
    attachment_type    TEXT NOT NULL,
    attachment_size    INT NOT NULL,
    attachment_expires INT NOT NULL,      -- 0 = never
    attachment_url     TEXT NOT NULL,
    attachment_owner   TEXT NOT NULL,
    encoding           TEXT NOT NULL,
    published          INT NOT NULL,      -- 0 = scheduled, 1 = published
    attachment_present INT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_topic ON messages (topic);
"#;

pub fn create(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(CREATE_SQL)
}
