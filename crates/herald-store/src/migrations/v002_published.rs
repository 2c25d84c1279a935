//! v002 -- Scheduled delivery.
//!
//! Everything stored before this version was delivered immediately, so
//! existing rows default to published.

use rusqlite::Transaction;

const UP_SQL: &str = r#"
ALTER TABLE messages ADD COLUMN published INT NOT NULL DEFAULT(1);
"#;

pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
