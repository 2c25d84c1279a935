//! v001 -- Message title, priority and tags.

use rusqlite::Transaction;

const UP_SQL: &str = r#"
ALTER TABLE messages ADD COLUMN title TEXT NOT NULL DEFAULT('');
ALTER TABLE messages ADD COLUMN priority INT NOT NULL DEFAULT(0);
ALTER TABLE messages ADD COLUMN tags TEXT NOT NULL DEFAULT('');
"#;

pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
